//! Handlers for the `/conversations` resource.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use stayhub_core::error::CoreError;
use stayhub_core::types::DbId;
use stayhub_db::models::conversation::Conversation;
use stayhub_db::repositories::{ConversationRepo, ListingRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /conversations`.
#[derive(Debug, Deserialize)]
pub struct OpenConversation {
    pub listing_id: DbId,
}

/// POST /api/v1/conversations
///
/// Open (or return) the conversation between the caller and a listing's
/// owner. Idempotent: repeated calls for the same listing return the same
/// conversation.
pub async fn open_conversation(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<OpenConversation>,
) -> AppResult<Json<DataResponse<Conversation>>> {
    let listing = ListingRepo::find_by_id(&state.pool, input.listing_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: input.listing_id,
        }))?;

    if listing.owner_id == auth.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot open a conversation with yourself".into(),
        )));
    }

    let conversation = ConversationRepo::find_or_create(
        &state.pool,
        listing.id,
        auth.user_id,
        listing.owner_id,
    )
    .await?;

    Ok(Json(DataResponse { data: conversation }))
}

/// GET /api/v1/conversations
///
/// List conversations the caller participates in.
pub async fn list_conversations(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Conversation>>>> {
    let items = ConversationRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: items }))
}
