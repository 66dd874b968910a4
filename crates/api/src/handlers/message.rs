//! Handlers for messages within a conversation.
//!
//! Persistence happens here, synchronously; the live fan-out is the
//! relay's job and runs strictly after the rows are committed. A failed or
//! unobserved broadcast never affects what these handlers stored.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use stayhub_core::error::CoreError;
use stayhub_core::message::validate_message_body;
use stayhub_core::rate_limit::ACTION_MESSAGE_SEND;
use stayhub_core::types::DbId;
use stayhub_db::models::conversation::Conversation;
use stayhub_db::models::message::Message;
use stayhub_db::repositories::{ConversationRepo, MessageRepo};
use stayhub_events::{DomainEvent, MESSAGE_SEEN, MESSAGE_SENT};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /conversations/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    /// Maximum number of results. Defaults to 50, capped at 200.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Maximum page size for message listing.
const MAX_LIMIT: i64 = 200;

/// Default page size for message listing.
const DEFAULT_LIMIT: i64 = 50;

/// Request body for `POST /conversations/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub body: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/conversations/{id}/messages
///
/// List a conversation's messages, oldest first. Fetching as the receiver
/// also flips that side's undelivered messages to delivered: the client
/// session reading the thread is the delivery signal.
pub async fn list_messages(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(conversation_id): Path<DbId>,
    Query(params): Query<MessageQuery>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    let conversation = find_party_conversation(&state, conversation_id, auth.user_id).await?;

    let delivered =
        MessageRepo::mark_delivered(&state.pool, conversation.id, auth.user_id).await?;
    if delivered > 0 {
        tracing::debug!(conversation_id, delivered, "Marked messages delivered");
    }

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);
    let messages =
        MessageRepo::list_for_conversation(&state.pool, conversation.id, limit, offset).await?;

    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/v1/conversations/{id}/messages
///
/// Persist a message, then publish it for room broadcast. Rate-limited per
/// sender; a throttled send stores nothing.
pub async fn send_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(conversation_id): Path<DbId>,
    Json(input): Json<SendMessage>,
) -> AppResult<(StatusCode, Json<DataResponse<Message>>)> {
    if !state
        .rate_limiter
        .check(auth.user_id, ACTION_MESSAGE_SEND)
        .await
    {
        return Err(AppError::Core(CoreError::RateLimited(
            "Too many messages. Slow down.".into(),
        )));
    }

    validate_message_body(&input.body).map_err(AppError::Core)?;

    let conversation = find_party_conversation(&state, conversation_id, auth.user_id).await?;
    let receiver_id = conversation.other_party(auth.user_id);

    let message = MessageRepo::create(
        &state.pool,
        conversation.id,
        auth.user_id,
        receiver_id,
        &input.body,
    )
    .await?;

    // Persist before broadcast: the row is committed at this point.
    state.event_bus.publish(
        DomainEvent::new(MESSAGE_SENT)
            .with_conversation(conversation.id)
            .with_actor(auth.user_id)
            .with_target(receiver_id)
            .with_payload(serde_json::to_value(&message).unwrap_or_default()),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// POST /api/v1/conversations/{id}/seen
///
/// Mark all of the caller's unseen messages in the conversation as seen.
/// Returns the number of messages updated; repeated calls are a no-op.
pub async fn mark_seen(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(conversation_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let conversation = find_party_conversation(&state, conversation_id, auth.user_id).await?;

    let updated = MessageRepo::mark_seen(&state.pool, conversation.id, auth.user_id).await?;

    if updated > 0 {
        state.event_bus.publish(
            DomainEvent::new(MESSAGE_SEEN)
                .with_conversation(conversation.id)
                .with_actor(auth.user_id),
        );
    }

    Ok(Json(json!({
        "data": { "updated": updated }
    })))
}

/// Fetch a conversation and require the caller to be a party to it.
async fn find_party_conversation(
    state: &AppState,
    conversation_id: DbId,
    user_id: DbId,
) -> AppResult<Conversation> {
    let conversation = ConversationRepo::find_by_id(&state.pool, conversation_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Conversation",
            id: conversation_id,
        }))?;

    if !conversation.has_party(user_id) {
        return Err(AppError::Core(CoreError::Unauthorized(
            "You are not a party to this conversation".into(),
        )));
    }

    Ok(conversation)
}
