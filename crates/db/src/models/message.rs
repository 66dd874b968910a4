//! Message entity models.

use serde::Serialize;
use sqlx::FromRow;
use stayhub_core::types::{DbId, Timestamp};

/// A row from the `messages` table.
///
/// Rows are append-only; only `is_delivered`/`is_seen` (and their
/// timestamps) are ever updated, by the receiver.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub conversation_id: DbId,
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub body: String,
    pub is_delivered: bool,
    pub delivered_at: Option<Timestamp>,
    pub is_seen: bool,
    pub seen_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
