use axum::routing::post;
use axum::Router;

use crate::handlers::posts;
use crate::state::AppState;

/// Routes mounted at `/posts`.
///
/// ```text
/// POST /{post_id}/vacancies        -> mark_vacant
/// POST /{post_id}/occupations      -> schedule_occupation
/// POST /{post_id}/refresh-status   -> refresh_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{post_id}/vacancies", post(posts::mark_vacant))
        .route("/{post_id}/occupations", post(posts::schedule_occupation))
        .route("/{post_id}/refresh-status", post(posts::refresh_status))
}
