use axum::routing::post;
use axum::Router;

use crate::handlers::collaborators;
use crate::state::AppState;

/// Routes mounted at `/collaborators`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/unlink", post(collaborators::schedule_unlink))
}
