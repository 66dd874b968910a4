//! Shared helpers for API integration tests.
//!
//! `build_test_app` mirrors the router construction in `main.rs` so
//! integration tests exercise the same middleware stack (CORS, request ID,
//! timeout, tracing, panic recovery) and background services (messaging
//! relay, notification router) that production uses.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use stayhub_api::auth::jwt::JwtConfig;
use stayhub_api::config::ServerConfig;
use stayhub_api::notifications::NotificationRouter;
use stayhub_api::rate_limit::RateLimiter;
use stayhub_api::routes;
use stayhub_api::state::AppState;
use stayhub_api::ws::{MessagingRelay, RoomManager};
use stayhub_core::types::DbId;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// Also spawns the messaging relay and notification router against a fresh
/// event bus, like `main.rs` does. The returned `Router` is cheap to clone
/// and all clones share the same state (pool, rate limiter, room manager).
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let room_manager = Arc::new(RoomManager::new());
    let event_bus = Arc::new(stayhub_events::EventBus::default());
    let rate_limiter = Arc::new(RateLimiter::new());

    let relay = MessagingRelay::new(Arc::clone(&room_manager));
    tokio::spawn(relay.run(event_bus.subscribe()));

    let notification_router = NotificationRouter::new(pool.clone(), Arc::clone(&room_manager));
    tokio::spawn(notification_router.run(event_bus.subscribe()));

    let state = AppState {
        pool,
        config: Arc::new(config),
        room_manager,
        event_bus,
        rate_limiter,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request without authentication.
pub async fn get(app: Router, path: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a GET request with a Bearer token.
pub async fn get_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(path)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body, without authentication.
pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body and a Bearer token.
pub async fn post_json_auth(
    app: Router,
    path: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a bodyless POST request with a Bearer token (accept/decline/read).
pub async fn post_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// Register a user and return `(access_token, user_id)`.
pub async fn register(app: Router, email: &str, display_name: &str) -> (String, DbId) {
    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({
            "email": email,
            "password": "a-sufficiently-long-password",
            "display_name": display_name,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "register failed");

    let json = body_json(response).await;
    let token = json["access_token"].as_str().unwrap().to_string();
    let user_id = json["user"]["id"].as_i64().unwrap();
    (token, user_id)
}

/// Register a user, promote it to admin, and log in again so the token
/// carries the admin role.
pub async fn register_admin(app: Router, pool: &PgPool, email: &str) -> String {
    let (_, user_id) = register(app.clone(), email, "Admin").await;

    sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .expect("failed to promote admin");

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({
            "email": email,
            "password": "a-sufficiently-long-password",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "admin login failed");

    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Create a listing as `owner_token` and approve it as `admin_token`.
/// Returns the listing id.
pub async fn create_approved_listing(
    app: Router,
    owner_token: &str,
    admin_token: &str,
    title: &str,
    address: &str,
    slots: i32,
) -> DbId {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/listings",
        owner_token,
        serde_json::json!({
            "title": title,
            "address": address,
            "slots_available": slots,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "listing create failed");
    let listing_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app,
        &format!("/api/v1/listings/{listing_id}/moderate"),
        admin_token,
        serde_json::json!({"decision": "approved"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "listing approval failed");

    listing_id
}
