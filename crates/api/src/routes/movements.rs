use axum::routing::{get, post};
use axum::Router;

use crate::handlers::movements;
use crate::state::AppState;

/// Routes mounted at `/movements`.
///
/// ```text
/// GET  /pending        -> list_pending
/// POST /{id}/cancel    -> cancel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pending", get(movements::list_pending))
        .route("/{id}/cancel", post(movements::cancel))
}
