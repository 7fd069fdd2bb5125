use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use coverage_core::types::DbId;
use coverage_db::models::movement::{ScheduleUnlinkRequest, ScheduledMovement};

use crate::engine::occupancy;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/collaborators/{id}/unlink
pub async fn schedule_unlink(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ScheduleUnlinkRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ScheduledMovement>>)> {
    let movement = occupancy::schedule_collaborator_unlink(
        &state.pool,
        id,
        &input,
        user.user_id,
        state.config.today(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: movement })))
}
