use axum::routing::post;
use axum::Router;

use crate::handlers::work_days;
use crate::state::AppState;

/// Routes mounted at `/work-days`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/confirm-presence", post(work_days::confirm_presence))
}
