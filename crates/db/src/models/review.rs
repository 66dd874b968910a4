//! Review entity models.

use serde::Serialize;
use sqlx::FromRow;
use stayhub_core::types::{DbId, Timestamp};

/// A row from the `reviews` table.
///
/// Keyed by (user, address) rather than listing id so a re-listed property
/// at the same address cannot be reviewed twice by the same user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub user_id: DbId,
    pub address: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}
