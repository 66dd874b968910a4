//! Listing entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stayhub_core::types::{DbId, Timestamp};

/// A row from the `listings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: String,
    pub address: String,
    pub slots_available: i32,
    pub is_available: bool,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a listing.
#[derive(Debug, Deserialize)]
pub struct CreateListing {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub address: String,
    pub slots_available: i32,
}
