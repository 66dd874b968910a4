//! Handlers for the `/reviews` resource.
//!
//! Eligibility is computed, never stored: the caller must hold an
//! ACCEPTED reservation on a listing at the reviewed address, accepted at
//! least 30 days ago.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use stayhub_core::error::CoreError;
use stayhub_core::rate_limit::ACTION_REVIEW_SUBMIT;
use stayhub_core::reservation::STATUS_ACCEPTED;
use stayhub_core::review::{is_review_eligible, validate_comment, validate_rating};
use stayhub_core::types::DbId;
use stayhub_db::models::review::Review;
use stayhub_db::repositories::{ListingRepo, ReservationRepo, ReviewRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /reviews`.
#[derive(Debug, Deserialize)]
pub struct SubmitReview {
    pub listing_id: DbId,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Query parameters for `GET /reviews`.
#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    pub address: String,
}

/// POST /api/v1/reviews
///
/// Submit a review for the address of a listing the caller stayed at.
pub async fn submit_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitReview>,
) -> AppResult<(StatusCode, Json<DataResponse<Review>>)> {
    validate_rating(input.rating).map_err(AppError::Core)?;
    if let Some(comment) = &input.comment {
        validate_comment(comment).map_err(AppError::Core)?;
    }

    let listing = ListingRepo::find_by_id(&state.pool, input.listing_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: input.listing_id,
        }))?;

    let reservation = ReservationRepo::find_by_pair(&state.pool, listing.id, auth.user_id)
        .await?
        .filter(|r| r.status == STATUS_ACCEPTED)
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Only guests with an accepted reservation can review this address".into(),
            ))
        })?;

    let accepted_at = reservation.accepted_at.ok_or_else(|| {
        AppError::Core(CoreError::Internal(
            "Accepted reservation missing accepted_at".into(),
        ))
    })?;
    if !is_review_eligible(accepted_at, chrono::Utc::now()) {
        return Err(AppError::Core(CoreError::Conflict(
            "You can review this address 30 days after your reservation was accepted".into(),
        )));
    }

    if ReviewRepo::exists_for(&state.pool, auth.user_id, &listing.address).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "You have already reviewed this address".into(),
        )));
    }

    // The throttle guards the insert itself, after the read-side checks:
    // a repeated submit reports its real failure (already reviewed, not
    // eligible) instead of a throttle error.
    if !state
        .rate_limiter
        .check(auth.user_id, ACTION_REVIEW_SUBMIT)
        .await
    {
        return Err(AppError::Core(CoreError::RateLimited(
            "Too many review submissions. Try again later.".into(),
        )));
    }

    // uq_reviews_user_address backstops a concurrent duplicate submit.
    let review = ReviewRepo::create(
        &state.pool,
        auth.user_id,
        &listing.address,
        input.rating,
        input.comment.as_deref(),
    )
    .await?;

    tracing::info!(review_id = review.id, user_id = auth.user_id, "Review submitted");

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// GET /api/v1/reviews?address=
///
/// List reviews for an address, newest first.
pub async fn list_reviews(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ReviewQuery>,
) -> AppResult<Json<DataResponse<Vec<Review>>>> {
    let reviews = ReviewRepo::list_for_address(&state.pool, &params.address).await?;
    Ok(Json(DataResponse { data: reviews }))
}
