//! Handlers for day-worker bookings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use coverage_core::error::CoreError;
use coverage_core::types::DbId;
use coverage_db::models::booking::{
    CreateBookingRequest, DayWorkerBooking, TransitionBookingRequest,
};
use validator::Validate;

use crate::engine::occupancy;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/vacancy-marks/{id}/bookings
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Path(vacancy_mark_id): Path<DbId>,
    Json(input): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<DayWorkerBooking>>)> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let booking =
        occupancy::schedule_day_worker_booking(&state.pool, vacancy_mark_id, &input, user.user_id)
            .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

/// POST /api/v1/bookings/{id}/transition
pub async fn transition(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<TransitionBookingRequest>,
) -> AppResult<Json<DataResponse<DayWorkerBooking>>> {
    let booking = occupancy::transition_booking(&state.pool, id, input.status, user.user_id).await?;
    Ok(Json(DataResponse { data: booking }))
}
