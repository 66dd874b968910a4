//! Repository for the `reviews` table.

use sqlx::PgPool;
use stayhub_core::types::DbId;

use crate::models::review::Review;

/// Column list for `reviews` queries.
const COLUMNS: &str = "id, user_id, address, rating, comment, created_at";

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review, returning the created row.
    ///
    /// A duplicate (user, address) pair violates `uq_reviews_user_address`
    /// and surfaces as a database error for the caller to classify.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        address: &str,
        rating: i32,
        comment: Option<&str>,
    ) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (user_id, address, rating, comment) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(user_id)
            .bind(address)
            .bind(rating)
            .bind(comment)
            .fetch_one(pool)
            .await
    }

    /// Whether the user has already reviewed this address.
    pub async fn exists_for(
        pool: &PgPool,
        user_id: DbId,
        address: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE user_id = $1 AND address = $2)",
        )
        .bind(user_id)
        .bind(address)
        .fetch_one(pool)
        .await
    }

    /// List reviews for an address, newest first.
    pub async fn list_for_address(
        pool: &PgPool,
        address: &str,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews WHERE address = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(address)
            .fetch_all(pool)
            .await
    }
}
