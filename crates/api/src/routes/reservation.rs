//! Route definitions for the `/reservations` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reservation;
use crate::state::AppState;

/// Routes mounted at `/reservations`.
///
/// ```text
/// GET    /               -> list_my_reservations
/// POST   /               -> request_reservation (rate limited)
/// GET    /incoming       -> list_incoming_reservations
/// POST   /{id}/accept    -> accept_reservation (owner only)
/// POST   /{id}/decline   -> decline_reservation (owner only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(reservation::list_my_reservations).post(reservation::request_reservation),
        )
        .route("/incoming", get(reservation::list_incoming_reservations))
        .route("/{id}/accept", post(reservation::accept_reservation))
        .route("/{id}/decline", post(reservation::decline_reservation))
}
