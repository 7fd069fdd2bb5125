//! Handlers for the movement ledger.

use axum::extract::{Path, State};
use axum::Json;
use coverage_core::types::DbId;
use coverage_db::models::movement::ScheduledMovement;
use coverage_db::repositories::MovementRepo;

use crate::engine::occupancy;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/movements/pending
pub async fn list_pending(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ScheduledMovement>>>> {
    let movements = MovementRepo::list_pending(&state.pool).await?;
    Ok(Json(DataResponse { data: movements }))
}

/// POST /api/v1/movements/{id}/cancel
pub async fn cancel(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ScheduledMovement>>> {
    let movement =
        occupancy::cancel_scheduled_movement(&state.pool, id, user.user_id, state.config.today())
            .await?;
    Ok(Json(DataResponse { data: movement }))
}
