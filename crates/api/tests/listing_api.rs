//! HTTP-level integration tests for listings: creation, moderation, and the
//! availability toggle.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, register, register_admin};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: new listings start pending with availability derived from slots
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_listing_starts_pending(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner, owner_id) = register(app.clone(), "owner@example.com", "Owner").await;

    let response = post_json_auth(
        app,
        "/api/v1/listings",
        &owner,
        serde_json::json!({
            "title": "Garden Flat",
            "description": "Two rooms, one garden.",
            "address": "14 Green St",
            "slots_available": 3,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["owner_id"], owner_id);
    assert_eq!(json["data"]["slots_available"], 3);
    assert_eq!(json["data"]["is_available"], true);
}

// ---------------------------------------------------------------------------
// Test: zero-slot listings are rejected at the door
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn zero_slot_listing_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner, _) = register(app.clone(), "owner@example.com", "Owner").await;

    let response = post_json_auth(
        app,
        "/api/v1/listings",
        &owner,
        serde_json::json!({
            "title": "Empty",
            "address": "15 Void St",
            "slots_available": 0,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: moderation requires the admin role
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn moderation_is_admin_only(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (owner, _) = register(app.clone(), "owner@example.com", "Owner").await;
    let admin = register_admin(app.clone(), &pool, "admin@example.com").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/listings",
        &owner,
        serde_json::json!({
            "title": "Judge Me",
            "address": "16 Panel St",
            "slots_available": 1,
        }),
    )
    .await;
    let listing_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // A regular user (the owner included) cannot moderate.
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/listings/{listing_id}/moderate"),
        &owner,
        serde_json::json!({"decision": "approved"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // An unknown decision value is rejected.
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/listings/{listing_id}/moderate"),
        &admin,
        serde_json::json!({"decision": "maybe"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The admin can approve.
    let response = post_json_auth(
        app,
        &format!("/api/v1/listings/{listing_id}/moderate"),
        &admin,
        serde_json::json!({"decision": "approved"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "approved");
}

// ---------------------------------------------------------------------------
// Test: availability can be toggled off and on while slots remain
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn availability_toggle_respects_slots(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (owner, _) = register(app.clone(), "owner@example.com", "Owner").await;
    let (other, _) = register(app.clone(), "other@example.com", "Other").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/listings",
        &owner,
        serde_json::json!({
            "title": "Flip Flop",
            "address": "17 Toggle St",
            "slots_available": 2,
        }),
    )
    .await;
    let listing_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Only the owner may toggle.
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/listings/{listing_id}/availability"),
        &other,
        serde_json::json!({"available": false}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Off, then back on: both fine while slots remain.
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/listings/{listing_id}/availability"),
        &owner,
        serde_json::json!({"available": false}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_available"], false);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/listings/{listing_id}/availability"),
        &owner,
        serde_json::json!({"available": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_available"], true);

    // Drain the slots directly, then re-enabling must conflict.
    sqlx::query("UPDATE listings SET slots_available = 0, is_available = false WHERE id = $1")
        .bind(listing_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = post_json_auth(
        app,
        &format!("/api/v1/listings/{listing_id}/availability"),
        &owner,
        serde_json::json!({"available": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Test: the availability toggle is throttled per owner
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn availability_toggle_is_rate_limited(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner, _) = register(app.clone(), "owner@example.com", "Owner").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/listings",
        &owner,
        serde_json::json!({
            "title": "Busy",
            "address": "18 Churn St",
            "slots_available": 1,
        }),
    )
    .await;
    let listing_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Ten toggles inside the window are allowed, the eleventh is not.
    for i in 0..10 {
        let response = post_json_auth(
            app.clone(),
            &format!("/api/v1/listings/{listing_id}/availability"),
            &owner,
            serde_json::json!({"available": i % 2 == 0}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "toggle {i}");
    }

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/listings/{listing_id}/availability"),
        &owner,
        serde_json::json!({"available": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // The listing still reflects the last successful toggle.
    let response = get_auth(app, &format!("/api/v1/listings/{listing_id}"), &owner).await;
    assert_eq!(body_json(response).await["data"]["is_available"], false);
}
