//! Repository for the `messages` table.
//!
//! Messages are append-only; the seen/delivered flags are the only mutable
//! fields and are flipped in batch by the receiver.

use sqlx::PgPool;
use stayhub_core::types::DbId;

use crate::models::message::Message;

/// Column list for `messages` queries.
const COLUMNS: &str = "id, conversation_id, sender_id, receiver_id, body, \
    is_delivered, delivered_at, is_seen, seen_at, created_at";

/// Provides append and flag operations for messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Append a message to a conversation, returning the created row.
    pub async fn create(
        pool: &PgPool,
        conversation_id: DbId,
        sender_id: DbId,
        receiver_id: DbId,
        body: &str,
    ) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (conversation_id, sender_id, receiver_id, body) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(conversation_id)
            .bind(sender_id)
            .bind(receiver_id)
            .bind(body)
            .fetch_one(pool)
            .await
    }

    /// List a conversation's messages, oldest first.
    pub async fn list_for_conversation(
        pool: &PgPool,
        conversation_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages \
             WHERE conversation_id = $1 \
             ORDER BY created_at ASC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(conversation_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark all of the receiver's unseen messages in a conversation as seen.
    ///
    /// Returns the number of rows updated; repeated calls are a no-op
    /// returning 0.
    pub async fn mark_seen(
        pool: &PgPool,
        conversation_id: DbId,
        receiver_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages \
             SET is_seen = true, seen_at = NOW() \
             WHERE conversation_id = $1 AND receiver_id = $2 AND is_seen = false",
        )
        .bind(conversation_id)
        .bind(receiver_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark all of the receiver's undelivered messages in a conversation as
    /// delivered. Returns the number of rows updated.
    pub async fn mark_delivered(
        pool: &PgPool,
        conversation_id: DbId,
        receiver_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages \
             SET is_delivered = true, delivered_at = NOW() \
             WHERE conversation_id = $1 AND receiver_id = $2 AND is_delivered = false",
        )
        .bind(conversation_id)
        .bind(receiver_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
