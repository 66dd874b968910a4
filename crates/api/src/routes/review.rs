//! Route definitions for the `/reviews` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::review;
use crate::state::AppState;

/// Routes mounted at `/reviews`.
///
/// ```text
/// GET    /   -> list_reviews (?address=)
/// POST   /   -> submit_review (rate limited)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(review::list_reviews).post(review::submit_review))
}
