//! Route definitions for the `/reports` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::report;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// POST   /   -> submit_report (rate limited)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(report::submit_report))
}
