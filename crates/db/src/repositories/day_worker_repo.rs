//! Repository for the `day_workers` table.

use coverage_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::day_worker::{CreateDayWorker, DayWorker};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, is_active, created_at, updated_at";

pub struct DayWorkerRepo;

impl DayWorkerRepo {
    /// Insert a new day-worker, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateDayWorker) -> Result<DayWorker, sqlx::Error> {
        let query = format!(
            "INSERT INTO day_workers (name, is_active) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DayWorker>(&query)
            .bind(&input.name)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a day-worker and lock its row for the rest of the transaction.
    ///
    /// Locking serializes concurrent bookings of the same person.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<DayWorker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM day_workers WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, DayWorker>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}
