//! Reservation entity models and repository outcome types.

use serde::Serialize;
use sqlx::FromRow;
use stayhub_core::types::{DbId, Timestamp};

/// A row from the `reservations` table.
///
/// `owner_id` is a denormalized copy of the listing owner taken at creation
/// time; `accepted_at` is set exactly once, when the owner accepts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reservation {
    pub id: DbId,
    pub listing_id: DbId,
    pub requester_id: DbId,
    pub owner_id: DbId,
    pub status: String,
    pub accepted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Outcome of a reservation request transaction.
#[derive(Debug)]
pub enum RequestOutcome {
    /// No row existed for the pair; a new PENDING reservation was inserted.
    Created(Reservation),
    /// A DECLINED row existed and was revived back to PENDING (same id).
    Revived(Reservation),
    /// A PENDING or ACCEPTED reservation already exists for the pair.
    AlreadyLive,
}

/// Outcome of an accept transaction.
#[derive(Debug)]
pub enum AcceptOutcome {
    /// Reservation accepted; one listing slot was consumed atomically.
    Accepted(Reservation),
    /// No reservation with the given id.
    NotFound,
    /// Caller is not the owner recorded on the reservation.
    NotOwner,
    /// Reservation is not in the PENDING state.
    NotPending,
    /// The listing had no slots left at acceptance time.
    NoCapacity,
}

/// Outcome of a decline transaction.
#[derive(Debug)]
pub enum DeclineOutcome {
    /// Reservation declined; slot count untouched.
    Declined(Reservation),
    /// No reservation with the given id.
    NotFound,
    /// Caller is not the owner recorded on the reservation.
    NotOwner,
    /// Reservation is not in the PENDING state (ACCEPTED is terminal).
    NotPending,
}
