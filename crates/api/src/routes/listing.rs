//! Route definitions for the `/listings` resource.
//!
//! All endpoints require authentication; moderation additionally requires
//! the admin role.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::listing;
use crate::state::AppState;

/// Routes mounted at `/listings`.
///
/// ```text
/// GET    /                    -> list_my_listings
/// POST   /                    -> create_listing
/// GET    /{id}                -> get_listing
/// POST   /{id}/availability   -> set_availability (rate limited)
/// POST   /{id}/moderate       -> moderate_listing (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(listing::list_my_listings).post(listing::create_listing),
        )
        .route("/{id}", get(listing::get_listing))
        .route("/{id}/availability", post(listing::set_availability))
        .route("/{id}/moderate", post(listing::moderate_listing))
}
