//! Day-worker bookings.

use chrono::NaiveDate;
use coverage_core::booking::BookingStatus;
use coverage_core::conflict::LiveBooking;
use coverage_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `day_worker_bookings` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct DayWorkerBooking {
    pub id: DbId,
    pub vacancy_mark_id: DbId,
    pub day_worker_id: DbId,
    /// Copy of the vacancy mark's date.
    pub work_date: NaiveDate,
    pub status: String,
    pub value_cents: i64,
    pub booked_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DayWorkerBooking {
    pub fn parsed_status(&self) -> Result<BookingStatus, String> {
        BookingStatus::from_str_value(&self.status)
    }
}

/// A live booking joined with the post of its vacancy mark.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct LiveBookingRow {
    pub id: DbId,
    pub day_worker_id: DbId,
    pub post_id: DbId,
    pub work_date: NaiveDate,
}

impl From<LiveBookingRow> for LiveBooking {
    fn from(row: LiveBookingRow) -> Self {
        LiveBooking {
            id: row.id,
            day_worker_id: row.day_worker_id,
            post_id: row.post_id,
            work_date: row.work_date,
        }
    }
}

/// Insert payload built by the booking operation.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub vacancy_mark_id: DbId,
    pub day_worker_id: DbId,
    pub work_date: NaiveDate,
    pub value_cents: i64,
    pub booked_by: DbId,
}

/// Body of `POST /vacancy-marks/{id}/bookings`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub day_worker_id: DbId,
    /// Defaults to the post's day rate when omitted.
    #[validate(range(min = 0))]
    pub value_cents: Option<i64>,
}

/// Body of `POST /bookings/{id}/transition`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionBookingRequest {
    pub status: BookingStatus,
}
