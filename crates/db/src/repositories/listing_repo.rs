//! Repository for the `listings` table.
//!
//! Slot-count mutations live in
//! [`ReservationRepo`](crate::repositories::ReservationRepo), which owns
//! the accept transaction; this repository covers creation, lookup,
//! moderation, and the owner-facing availability toggle.

use sqlx::PgPool;
use stayhub_core::listing::derive_is_available;
use stayhub_core::types::DbId;

use crate::models::listing::{CreateListing, Listing};

/// Column list for `listings` queries.
const COLUMNS: &str = "id, owner_id, title, description, address, slots_available, \
    is_available, status, created_at, updated_at";

/// Provides CRUD operations for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a new listing in the `pending` moderation status.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateListing,
    ) -> Result<Listing, sqlx::Error> {
        let query = format!(
            "INSERT INTO listings \
                (owner_id, title, description, address, slots_available, is_available) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.address)
            .bind(input.slots_available)
            .bind(derive_is_available(input.slots_available))
            .fetch_one(pool)
            .await
    }

    /// Find a listing by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all listings owned by a user, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a moderation decision, returning the updated row.
    ///
    /// Returns `None` if the listing does not exist.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET status = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Toggle the availability flag.
    ///
    /// Re-enabling is only possible while slots remain: the WHERE guard
    /// refuses `is_available = true` on a listing with zero slots, in which
    /// case `None` is returned and the caller maps it to a conflict.
    pub async fn set_availability(
        pool: &PgPool,
        id: DbId,
        available: bool,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET is_available = $2, updated_at = NOW() \
             WHERE id = $1 AND ($2 = false OR slots_available > 0) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(available)
            .fetch_optional(pool)
            .await
    }
}
