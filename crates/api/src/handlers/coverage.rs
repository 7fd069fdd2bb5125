//! Handlers for the `/coverage` read endpoints.

use axum::extract::{Query, State};
use axum::Json;
use coverage_core::reason::VacancyReason;
use coverage_core::vacancy::VacancyRow;
use coverage_db::models::vacancy_mark::{VacantDay, VacantDaysParams};
use serde::Serialize;

use crate::engine::vacancy;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// One entry of the vacancy reason catalogue.
#[derive(Debug, Serialize)]
pub struct ReasonOption {
    pub value: &'static str,
    pub label: &'static str,
    pub structural: bool,
}

/// GET /api/v1/coverage/vacant-posts
pub async fn vacant_posts(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<VacancyRow>>>> {
    let rows = vacancy::list_vacant_posts(&state.pool).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/coverage/vacant-days?from=YYYY-MM-DD
///
/// `from` defaults to today on the business calendar.
pub async fn vacant_days(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<VacantDaysParams>,
) -> AppResult<Json<DataResponse<Vec<VacantDay>>>> {
    let from = params.from.unwrap_or_else(|| state.config.today());
    let days = vacancy::list_vacant_days(&state.pool, from).await?;
    Ok(Json(DataResponse { data: days }))
}

/// GET /api/v1/coverage/vacancy-reasons
pub async fn vacancy_reasons(_user: AuthUser) -> Json<DataResponse<Vec<ReasonOption>>> {
    let reasons = VacancyReason::ALL
        .iter()
        .map(|r| ReasonOption {
            value: r.as_str(),
            label: r.label(),
            structural: r.is_structural(),
        })
        .collect();
    Json(DataResponse { data: reasons })
}
