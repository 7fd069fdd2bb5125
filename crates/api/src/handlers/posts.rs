//! Handlers for post-scoped writes under `/posts/{post_id}`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use coverage_core::types::DbId;
use coverage_db::models::movement::{ScheduleOccupationRequest, ScheduledMovement};
use coverage_db::models::post::Post;
use coverage_db::models::work_day::{MarkDayVacantRequest, WorkDay};

use crate::engine::occupancy;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/posts/{post_id}/vacancies
pub async fn mark_vacant(
    user: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<MarkDayVacantRequest>,
) -> AppResult<Json<DataResponse<WorkDay>>> {
    let work_day = occupancy::mark_day_vacant(
        &state.pool,
        post_id,
        &input,
        user.user_id,
        state.config.today(),
    )
    .await?;
    Ok(Json(DataResponse { data: work_day }))
}

/// POST /api/v1/posts/{post_id}/occupations
pub async fn schedule_occupation(
    user: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<ScheduleOccupationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ScheduledMovement>>)> {
    let movement = occupancy::schedule_collaborator_to_post(
        &state.pool,
        post_id,
        &input,
        user.user_id,
        state.config.today(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: movement })))
}

/// POST /api/v1/posts/{post_id}/refresh-status
pub async fn refresh_status(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Post>>> {
    let post = occupancy::refresh_post_status(&state.pool, post_id, state.config.today()).await?;
    Ok(Json(DataResponse { data: post }))
}
