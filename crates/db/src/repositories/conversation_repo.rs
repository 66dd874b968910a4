//! Repository for the `conversations` table.

use sqlx::PgPool;
use stayhub_core::types::DbId;

use crate::models::conversation::Conversation;

/// Column list for `conversations` queries.
const COLUMNS: &str = "id, listing_id, renter_id, owner_id, created_at";

/// Provides idempotent creation and lookups for conversations.
pub struct ConversationRepo;

impl ConversationRepo {
    /// Find or create the conversation for a (listing, renter, owner) triple.
    ///
    /// Idempotent: a second call with the same triple returns the existing
    /// row. The no-op DO UPDATE makes `RETURNING` yield the existing row on
    /// conflict instead of returning nothing.
    pub async fn find_or_create(
        pool: &PgPool,
        listing_id: DbId,
        renter_id: DbId,
        owner_id: DbId,
    ) -> Result<Conversation, sqlx::Error> {
        let query = format!(
            "INSERT INTO conversations (listing_id, renter_id, owner_id) \
             VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_conversations_triple \
             DO UPDATE SET listing_id = EXCLUDED.listing_id \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Conversation>(&query)
            .bind(listing_id)
            .bind(renter_id)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a conversation by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Conversation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM conversations WHERE id = $1");
        sqlx::query_as::<_, Conversation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List conversations the user participates in, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Conversation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM conversations \
             WHERE renter_id = $1 OR owner_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Conversation>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
