//! Route definitions for day-worker bookings.

use axum::routing::post;
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// Routes mounted at `/vacancy-marks`.
///
/// ```text
/// POST /{id}/bookings   -> create
/// ```
pub fn vacancy_mark_router() -> Router<AppState> {
    Router::new().route("/{id}/bookings", post(bookings::create))
}

/// Routes mounted at `/bookings`.
///
/// ```text
/// POST /{id}/transition   -> transition
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/transition", post(bookings::transition))
}
