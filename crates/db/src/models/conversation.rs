//! Conversation entity models.

use serde::Serialize;
use sqlx::FromRow;
use stayhub_core::types::{DbId, Timestamp};

/// A row from the `conversations` table.
///
/// Unique per (listing, renter, owner) triple; creation is idempotent.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Conversation {
    pub id: DbId,
    pub listing_id: DbId,
    pub renter_id: DbId,
    pub owner_id: DbId,
    pub created_at: Timestamp,
}

impl Conversation {
    /// Whether `user_id` is one of the two parties to this conversation.
    pub fn has_party(&self, user_id: DbId) -> bool {
        self.renter_id == user_id || self.owner_id == user_id
    }

    /// The other party relative to `user_id`.
    ///
    /// Callers must check [`has_party`](Self::has_party) first.
    pub fn other_party(&self, user_id: DbId) -> DbId {
        if self.renter_id == user_id {
            self.owner_id
        } else {
            self.renter_id
        }
    }
}
