//! Handlers for the `/listings` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use stayhub_core::error::CoreError;
use stayhub_core::listing::{validate_decision, STATUS_APPROVED};
use stayhub_core::rate_limit::ACTION_AVAILABILITY_TOGGLE;
use stayhub_core::types::DbId;
use stayhub_db::models::listing::{CreateListing, Listing};
use stayhub_db::repositories::ListingRepo;
use stayhub_events::{DomainEvent, LISTING_APPROVED, LISTING_REJECTED};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /listings`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateListingRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 10000, message = "Description is too long"))]
    pub description: String,
    #[validate(length(min = 1, max = 500, message = "Address must be 1-500 characters"))]
    pub address: String,
    #[validate(range(min = 1, max = 1000, message = "Slots must be between 1 and 1000"))]
    pub slots_available: i32,
}

/// Request body for `POST /listings/{id}/availability`.
#[derive(Debug, Deserialize)]
pub struct SetAvailabilityRequest {
    pub available: bool,
}

/// Request body for `POST /listings/{id}/moderate`.
#[derive(Debug, Deserialize)]
pub struct ModerateRequest {
    /// `"approved"` or `"rejected"`.
    pub decision: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/listings
///
/// Create a listing owned by the caller. New listings start in the
/// `pending` moderation status and do not accept reservations until
/// approved.
pub async fn create_listing(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateListingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Listing>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let create = CreateListing {
        title: input.title,
        description: input.description,
        address: input.address,
        slots_available: input.slots_available,
    };
    let listing = ListingRepo::create(&state.pool, auth.user_id, &create).await?;

    tracing::info!(listing_id = listing.id, owner_id = auth.user_id, "Listing created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: listing })))
}

/// GET /api/v1/listings/{id}
pub async fn get_listing(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Listing>>> {
    let listing = ListingRepo::find_by_id(&state.pool, listing_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;

    Ok(Json(DataResponse { data: listing }))
}

/// GET /api/v1/listings
///
/// List the caller's own listings.
pub async fn list_my_listings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Listing>>>> {
    let listings = ListingRepo::list_for_owner(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// POST /api/v1/listings/{id}/availability
///
/// Toggle the availability flag on an owned listing. Rate-limited.
/// Re-enabling requires at least one remaining slot; `slots_available`
/// stays authoritative.
pub async fn set_availability(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
    Json(input): Json<SetAvailabilityRequest>,
) -> AppResult<Json<DataResponse<Listing>>> {
    if !state
        .rate_limiter
        .check(auth.user_id, ACTION_AVAILABILITY_TOGGLE)
        .await
    {
        return Err(AppError::Core(CoreError::RateLimited(
            "Too many availability changes. Try again later.".into(),
        )));
    }

    let listing = ListingRepo::find_by_id(&state.pool, listing_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;
    if listing.owner_id != auth.user_id {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Only the owner can change a listing's availability".into(),
        )));
    }

    let updated = ListingRepo::set_availability(&state.pool, listing_id, input.available)
        .await?
        .ok_or_else(|| {
            // The WHERE guard refused: enabling with zero slots left.
            AppError::Core(CoreError::Conflict(
                "Listing has no slots left to make available".into(),
            ))
        })?;

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/listings/{id}/moderate
///
/// Apply a moderation decision (admin only). The owner is notified via the
/// event bus after the status is committed.
pub async fn moderate_listing(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
    Json(input): Json<ModerateRequest>,
) -> AppResult<Json<DataResponse<Listing>>> {
    auth.require_admin()?;
    validate_decision(&input.decision).map_err(AppError::Core)?;

    let listing = ListingRepo::set_status(&state.pool, listing_id, &input.decision)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;

    tracing::info!(listing_id, decision = %input.decision, "Listing moderated");

    let event_type = if listing.status == STATUS_APPROVED {
        LISTING_APPROVED
    } else {
        LISTING_REJECTED
    };
    state.event_bus.publish(
        DomainEvent::new(event_type)
            .with_listing(listing.id)
            .with_actor(auth.user_id)
            .with_target(listing.owner_id)
            .with_payload(json!({"listing_title": listing.title})),
    );

    Ok(Json(DataResponse { data: listing }))
}
