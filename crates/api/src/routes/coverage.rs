use axum::routing::get;
use axum::Router;

use crate::handlers::coverage;
use crate::state::AppState;

/// Routes mounted at `/coverage`.
///
/// ```text
/// GET /vacant-posts      -> vacant_posts
/// GET /vacant-days       -> vacant_days
/// GET /vacancy-reasons   -> vacancy_reasons
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vacant-posts", get(coverage::vacant_posts))
        .route("/vacant-days", get(coverage::vacant_days))
        .route("/vacancy-reasons", get(coverage::vacancy_reasons))
}
