//! Repository for the `day_worker_bookings` table.
//!
//! A booking is "live" unless it is cancelled or rejected. Live bookings
//! hold their date for the day-worker and cover their vacancy mark.

use chrono::NaiveDate;
use coverage_core::booking::BookingStatus;
use coverage_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::booking::{DayWorkerBooking, LiveBookingRow, NewBooking};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, vacancy_mark_id, day_worker_id, work_date, status, value_cents, \
    booked_by, created_at, updated_at";

/// SQL predicate selecting live bookings.
const LIVE: &str = "status NOT IN ('cancelled', 'rejected')";

pub struct BookingRepo;

impl BookingRepo {
    /// Insert a booking in `awaiting_confirmation` status.
    pub async fn create(
        conn: &mut PgConnection,
        input: &NewBooking,
    ) -> Result<DayWorkerBooking, sqlx::Error> {
        let query = format!(
            "INSERT INTO day_worker_bookings
                (vacancy_mark_id, day_worker_id, work_date, status, value_cents, booked_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DayWorkerBooking>(&query)
            .bind(input.vacancy_mark_id)
            .bind(input.day_worker_id)
            .bind(input.work_date)
            .bind(BookingStatus::AwaitingConfirmation.as_str())
            .bind(input.value_cents)
            .bind(input.booked_by)
            .fetch_one(conn)
            .await
    }

    /// Find a booking by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DayWorkerBooking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM day_worker_bookings WHERE id = $1");
        sqlx::query_as::<_, DayWorkerBooking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a booking by ID and lock it.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<DayWorkerBooking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM day_worker_bookings WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, DayWorkerBooking>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Live bookings of a day-worker on a date, with the post each covers.
    pub async fn list_live_for_day_worker_on(
        conn: &mut PgConnection,
        day_worker_id: DbId,
        work_date: NaiveDate,
    ) -> Result<Vec<LiveBookingRow>, sqlx::Error> {
        sqlx::query_as::<_, LiveBookingRow>(
            "SELECT b.id, b.day_worker_id, m.post_id, b.work_date
             FROM day_worker_bookings b
             JOIN vacancy_marks m ON m.id = b.vacancy_mark_id
             WHERE b.day_worker_id = $1
               AND b.work_date = $2
               AND b.status NOT IN ('cancelled', 'rejected')
             ORDER BY b.id",
        )
        .bind(day_worker_id)
        .bind(work_date)
        .fetch_all(conn)
        .await
    }

    /// The live booking covering a vacancy mark, if any.
    pub async fn find_live_for_mark(
        conn: &mut PgConnection,
        vacancy_mark_id: DbId,
    ) -> Result<Option<DayWorkerBooking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM day_worker_bookings
             WHERE vacancy_mark_id = $1 AND {LIVE}"
        );
        sqlx::query_as::<_, DayWorkerBooking>(&query)
            .bind(vacancy_mark_id)
            .fetch_optional(conn)
            .await
    }

    /// Persist a new booking status.
    pub async fn update_status(
        conn: &mut PgConnection,
        id: DbId,
        status: BookingStatus,
    ) -> Result<DayWorkerBooking, sqlx::Error> {
        let query = format!(
            "UPDATE day_worker_bookings SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DayWorkerBooking>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(conn)
            .await
    }
}
