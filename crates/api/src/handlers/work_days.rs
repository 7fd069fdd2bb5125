use axum::extract::{Path, State};
use axum::Json;
use coverage_core::types::DbId;
use coverage_db::models::work_day::WorkDay;

use crate::engine::occupancy;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/work-days/{id}/confirm-presence
pub async fn confirm_presence(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkDay>>> {
    let work_day = occupancy::confirm_presence(&state.pool, id, user.user_id).await?;
    Ok(Json(DataResponse { data: work_day }))
}
