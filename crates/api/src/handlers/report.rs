//! Handlers for the `/reports` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use stayhub_core::error::CoreError;
use stayhub_core::rate_limit::ACTION_REPORT_SUBMIT;
use stayhub_core::types::DbId;
use stayhub_db::models::report::Report;
use stayhub_db::repositories::{ListingRepo, ReportRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum length for a report reason, in characters.
const MAX_REASON_LENGTH: usize = 2_000;

/// Request body for `POST /reports`.
#[derive(Debug, Deserialize)]
pub struct SubmitReport {
    pub listing_id: DbId,
    pub reason: String,
}

/// POST /api/v1/reports
///
/// Report a listing. Rate-limited per reporter.
pub async fn submit_report(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitReport>,
) -> AppResult<(StatusCode, Json<DataResponse<Report>>)> {
    if !state
        .rate_limiter
        .check(auth.user_id, ACTION_REPORT_SUBMIT)
        .await
    {
        return Err(AppError::Core(CoreError::RateLimited(
            "Too many reports. Try again tomorrow.".into(),
        )));
    }

    if input.reason.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Report reason must not be empty".into(),
        )));
    }
    if input.reason.chars().count() > MAX_REASON_LENGTH {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Report reason exceeds the maximum length of {MAX_REASON_LENGTH} characters"
        ))));
    }

    let listing = ListingRepo::find_by_id(&state.pool, input.listing_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: input.listing_id,
        }))?;

    let report =
        ReportRepo::create(&state.pool, auth.user_id, listing.id, input.reason.trim()).await?;

    tracing::info!(report_id = report.id, listing_id = listing.id, "Listing reported");

    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}
