//! The reservation engine.
//!
//! Implements the per-(listing, requester) state machine: request,
//! accept, decline. All capacity invariants are enforced by
//! [`ReservationRepo`]'s transactions; this module owns the surrounding
//! policy (throttling, preconditions, event publication) and maps
//! repository outcomes onto the error taxonomy.
//!
//! Events are published only after the repository transaction has
//! committed, so subscribers never see an un-durable transition.

use serde_json::json;
use stayhub_core::error::CoreError;
use stayhub_core::rate_limit::ACTION_RESERVATION_REQUEST;
use stayhub_core::types::DbId;
use stayhub_core::{listing, reservation};
use stayhub_db::models::listing::Listing;
use stayhub_db::models::reservation::{
    AcceptOutcome, DeclineOutcome, RequestOutcome, Reservation,
};
use stayhub_db::repositories::{ListingRepo, ReservationRepo};
use stayhub_events::{
    DomainEvent, RESERVATION_ACCEPTED, RESERVATION_DECLINED, RESERVATION_REQUESTED,
};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request a reservation on a listing for the authenticated requester.
///
/// Preconditions: requester is under the request rate limit, the listing
/// exists, has passed moderation, is available with at least one slot, and
/// the requester is not its owner. A declined reservation for the pair is
/// revived (same row) instead of duplicated; a live one is a conflict.
pub async fn request(
    state: &AppState,
    requester_id: DbId,
    listing_id: DbId,
) -> AppResult<Reservation> {
    if !state
        .rate_limiter
        .check(requester_id, ACTION_RESERVATION_REQUEST)
        .await
    {
        return Err(AppError::Core(CoreError::RateLimited(
            "Too many reservation requests. Try again later.".into(),
        )));
    }

    let listing = find_listing(state, listing_id).await?;

    if listing.status != listing::STATUS_APPROVED {
        return Err(AppError::Core(CoreError::Conflict(
            "Listing is not open for reservations".into(),
        )));
    }
    if listing.owner_id == requester_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot reserve your own listing".into(),
        )));
    }
    if !listing.is_available || listing.slots_available <= 0 {
        return Err(AppError::Core(CoreError::Conflict(
            "Listing has no available slots".into(),
        )));
    }

    let outcome =
        ReservationRepo::request(&state.pool, listing.id, requester_id, listing.owner_id).await?;

    let reservation = match outcome {
        RequestOutcome::Created(r) | RequestOutcome::Revived(r) => r,
        RequestOutcome::AlreadyLive => {
            return Err(AppError::Core(CoreError::Conflict(
                "You already have an active reservation for this listing".into(),
            )));
        }
    };

    tracing::info!(
        reservation_id = reservation.id,
        listing_id = listing.id,
        requester_id,
        "Reservation requested"
    );
    state.event_bus.publish(
        DomainEvent::new(RESERVATION_REQUESTED)
            .with_listing(listing.id)
            .with_actor(requester_id)
            .with_target(listing.owner_id)
            .with_payload(json!({
                "reservation_id": reservation.id,
                "listing_title": listing.title,
            })),
    );

    Ok(reservation)
}

/// Accept a pending reservation as the listing owner.
///
/// The slot decrement and the status flip are a single repository
/// transaction: when two acceptances race for a listing's last slot,
/// exactly one succeeds and the other observes a conflict.
pub async fn accept(
    state: &AppState,
    caller_id: DbId,
    reservation_id: DbId,
) -> AppResult<Reservation> {
    let outcome = ReservationRepo::accept(&state.pool, reservation_id, caller_id).await?;

    let reservation = match outcome {
        AcceptOutcome::Accepted(r) => r,
        AcceptOutcome::NotFound => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Reservation",
                id: reservation_id,
            }));
        }
        AcceptOutcome::NotOwner => {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Only the listing owner can respond to this reservation".into(),
            )));
        }
        AcceptOutcome::NotPending => {
            return Err(AppError::Core(CoreError::Conflict(
                "Reservation is not pending".into(),
            )));
        }
        AcceptOutcome::NoCapacity => {
            return Err(AppError::Core(CoreError::Conflict(
                "Listing has no available slots".into(),
            )));
        }
    };

    debug_assert!(reservation::is_live(&reservation.status));
    tracing::info!(
        reservation_id = reservation.id,
        listing_id = reservation.listing_id,
        "Reservation accepted"
    );
    publish_decision(state, RESERVATION_ACCEPTED, &reservation).await;

    Ok(reservation)
}

/// Decline a pending reservation as the listing owner.
///
/// No slot-count change; the row stays behind for a possible revival.
pub async fn decline(
    state: &AppState,
    caller_id: DbId,
    reservation_id: DbId,
) -> AppResult<Reservation> {
    let outcome = ReservationRepo::decline(&state.pool, reservation_id, caller_id).await?;

    let reservation = match outcome {
        DeclineOutcome::Declined(r) => r,
        DeclineOutcome::NotFound => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Reservation",
                id: reservation_id,
            }));
        }
        DeclineOutcome::NotOwner => {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Only the listing owner can respond to this reservation".into(),
            )));
        }
        DeclineOutcome::NotPending => {
            return Err(AppError::Core(CoreError::Conflict(
                "Reservation is not pending".into(),
            )));
        }
    };

    tracing::info!(
        reservation_id = reservation.id,
        listing_id = reservation.listing_id,
        "Reservation declined"
    );
    publish_decision(state, RESERVATION_DECLINED, &reservation).await;

    Ok(reservation)
}

/// Publish an owner-decision event addressed to the renter.
///
/// The listing title is best-effort enrichment: a failed lookup degrades
/// the notification text, never the operation.
async fn publish_decision(state: &AppState, event_type: &str, reservation: &Reservation) {
    let listing_title = ListingRepo::find_by_id(&state.pool, reservation.listing_id)
        .await
        .ok()
        .flatten()
        .map(|l| l.title);

    state.event_bus.publish(
        DomainEvent::new(event_type)
            .with_listing(reservation.listing_id)
            .with_actor(reservation.owner_id)
            .with_target(reservation.requester_id)
            .with_payload(json!({
                "reservation_id": reservation.id,
                "listing_title": listing_title,
            })),
    );
}

/// Look up a listing or fail with `NotFound`.
async fn find_listing(state: &AppState, listing_id: DbId) -> AppResult<Listing> {
    ListingRepo::find_by_id(&state.pool, listing_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))
}
