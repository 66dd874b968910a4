//! Handlers for the `/reservations` resource.
//!
//! Thin adapters over the [`engine`](crate::engine::reservations): the
//! transport layer stays out of the state machine.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use stayhub_core::types::DbId;
use stayhub_db::models::reservation::Reservation;
use stayhub_db::repositories::ReservationRepo;

use crate::engine::reservations;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /reservations`.
#[derive(Debug, Deserialize)]
pub struct RequestReservation {
    pub listing_id: DbId,
}

/// POST /api/v1/reservations
///
/// Request a reservation on a listing.
pub async fn request_reservation(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RequestReservation>,
) -> AppResult<(StatusCode, Json<DataResponse<Reservation>>)> {
    let reservation = reservations::request(&state, auth.user_id, input.listing_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: reservation })))
}

/// GET /api/v1/reservations
///
/// List the caller's own reservation requests.
pub async fn list_my_reservations(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Reservation>>>> {
    let items = ReservationRepo::list_for_requester(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/reservations/incoming
///
/// List reservations targeting the caller's listings.
pub async fn list_incoming_reservations(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Reservation>>>> {
    let items = ReservationRepo::list_for_owner(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/reservations/{id}/accept
pub async fn accept_reservation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(reservation_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Reservation>>> {
    let reservation = reservations::accept(&state, auth.user_id, reservation_id).await?;
    Ok(Json(DataResponse { data: reservation }))
}

/// POST /api/v1/reservations/{id}/decline
pub async fn decline_reservation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(reservation_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Reservation>>> {
    let reservation = reservations::decline(&state, auth.user_id, reservation_id).await?;
    Ok(Json(DataResponse { data: reservation }))
}
