//! User entity models.

use serde::Serialize;
use sqlx::FromRow;
use stayhub_core::types::{DbId, Timestamp};

/// A row from the `users` table.
///
/// The password hash is deliberately excluded from serialization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
