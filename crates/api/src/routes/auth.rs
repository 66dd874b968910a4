//! Route definitions for the `/auth` resource.
//!
//! Both endpoints are public; they issue the tokens everything else
//! requires.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /register   -> register
/// POST   /login      -> login
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}
