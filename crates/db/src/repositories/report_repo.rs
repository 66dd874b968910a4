//! Repository for the `reports` table.

use sqlx::PgPool;
use stayhub_core::types::DbId;

use crate::models::report::Report;

/// Column list for `reports` queries.
const COLUMNS: &str = "id, reporter_id, listing_id, reason, created_at";

/// Provides insert and lookup operations for listing reports.
pub struct ReportRepo;

impl ReportRepo {
    /// Insert a report, returning the created row.
    pub async fn create(
        pool: &PgPool,
        reporter_id: DbId,
        listing_id: DbId,
        reason: &str,
    ) -> Result<Report, sqlx::Error> {
        let query = format!(
            "INSERT INTO reports (reporter_id, listing_id, reason) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(reporter_id)
            .bind(listing_id)
            .bind(reason)
            .fetch_one(pool)
            .await
    }

    /// List reports filed against a listing, newest first.
    pub async fn list_for_listing(
        pool: &PgPool,
        listing_id: DbId,
    ) -> Result<Vec<Report>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports WHERE listing_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(listing_id)
            .fetch_all(pool)
            .await
    }
}
