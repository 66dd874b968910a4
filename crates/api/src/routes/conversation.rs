//! Route definitions for the `/conversations` resource and its messages.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{conversation, message};
use crate::state::AppState;

/// Routes mounted at `/conversations`.
///
/// ```text
/// GET    /                  -> list_conversations
/// POST   /                  -> open_conversation (idempotent)
/// GET    /{id}/messages     -> list_messages (marks delivered for receiver)
/// POST   /{id}/messages     -> send_message (rate limited)
/// POST   /{id}/seen         -> mark_seen (batch, idempotent)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(conversation::list_conversations).post(conversation::open_conversation),
        )
        .route(
            "/{id}/messages",
            get(message::list_messages).post(message::send_message),
        )
        .route("/{id}/seen", post(message::mark_seen))
}
