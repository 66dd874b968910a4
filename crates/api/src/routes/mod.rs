pub mod auth;
pub mod conversation;
pub mod health;
pub mod listing;
pub mod notification;
pub mod report;
pub mod reservation;
pub mod review;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                              WebSocket (?token=)
///
/// /auth/register                   register (public)
/// /auth/login                      login (public)
///
/// /listings                        list own, create
/// /listings/{id}                   get
/// /listings/{id}/availability      toggle availability (POST, rate limited)
/// /listings/{id}/moderate          moderation decision (POST, admin only)
///
/// /reservations                    list own, request (POST, rate limited)
/// /reservations/incoming           list incoming (owner view)
/// /reservations/{id}/accept        accept (POST, owner only)
/// /reservations/{id}/decline       decline (POST, owner only)
///
/// /conversations                   list, open (POST, idempotent)
/// /conversations/{id}/messages     list, send (POST, rate limited)
/// /conversations/{id}/seen         batch mark seen (POST)
///
/// /notifications                   list (?unread_only, limit, offset)
/// /notifications/read-all          mark all read (POST)
/// /notifications/unread-count      unread count (GET)
/// /notifications/{id}/read         mark read (POST)
///
/// /reviews                         list (?address=), submit (POST, rate limited)
///
/// /reports                         submit (POST, rate limited)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/listings", listing::router())
        .nest("/reservations", reservation::router())
        .nest("/conversations", conversation::router())
        .nest("/notifications", notification::router())
        .nest("/reviews", review::router())
        .nest("/reports", report::router())
}
