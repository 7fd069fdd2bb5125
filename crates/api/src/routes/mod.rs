pub mod bookings;
pub mod collaborators;
pub mod coverage;
pub mod health;
pub mod movements;
pub mod posts;
pub mod work_days;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /coverage/vacant-posts                    understaffed posts (GET)
/// /coverage/vacant-days?from=               uncovered days (GET)
/// /coverage/vacancy-reasons                 reason catalogue (GET)
///
/// /posts/{post_id}/vacancies                mark a day vacant (POST)
/// /posts/{post_id}/occupations              schedule a collaborator (POST)
/// /posts/{post_id}/refresh-status           recompute derived status (POST)
///
/// /work-days/{id}/confirm-presence          confirm attendance (POST)
///
/// /vacancy-marks/{id}/bookings              book a day-worker (POST)
/// /bookings/{id}/transition                 advance/cancel a booking (POST)
///
/// /movements/pending                        scheduled movements (GET)
/// /movements/{id}/cancel                    cancel a movement (POST)
///
/// /collaborators/{id}/unlink                schedule an unlink (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/coverage", coverage::router())
        .nest("/posts", posts::router())
        .nest("/work-days", work_days::router())
        .nest("/vacancy-marks", bookings::vacancy_mark_router())
        .nest("/bookings", bookings::router())
        .nest("/movements", movements::router())
        .nest("/collaborators", collaborators::router())
}
