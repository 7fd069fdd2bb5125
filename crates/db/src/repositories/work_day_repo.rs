//! Repository for the `work_days` table.
//!
//! Writes go through upserts keyed on `uq_work_days_post_date` so a missing
//! pre-generated row never blocks an operation.

use chrono::NaiveDate;
use coverage_core::reason::VacancyReason;
use coverage_core::types::DbId;
use coverage_core::work_day::WorkDayStatus;
use sqlx::{PgConnection, PgPool};

use crate::models::work_day::{CreateWorkDay, WorkDay};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, post_id, work_date, status, collaborator_id, vacancy_reason, \
    confirmed_by, confirmed_at, created_at, updated_at";

pub struct WorkDayRepo;

impl WorkDayRepo {
    /// Insert a pre-generated work day.
    pub async fn create(pool: &PgPool, input: &CreateWorkDay) -> Result<WorkDay, sqlx::Error> {
        let query = format!(
            "INSERT INTO work_days (post_id, work_date, status, collaborator_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkDay>(&query)
            .bind(input.post_id)
            .bind(input.work_date)
            .bind(input.status.as_str())
            .bind(input.collaborator_id)
            .fetch_one(pool)
            .await
    }

    /// Find a work day by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkDay>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM work_days WHERE id = $1");
        sqlx::query_as::<_, WorkDay>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a work day by (post, date).
    pub async fn find_slot(
        pool: &PgPool,
        post_id: DbId,
        work_date: NaiveDate,
    ) -> Result<Option<WorkDay>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM work_days WHERE post_id = $1 AND work_date = $2");
        sqlx::query_as::<_, WorkDay>(&query)
            .bind(post_id)
            .bind(work_date)
            .fetch_optional(pool)
            .await
    }

    /// Find a work day by ID and lock it.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<WorkDay>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM work_days WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, WorkDay>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find the (post, date) work day and lock it.
    pub async fn find_slot_for_update(
        conn: &mut PgConnection,
        post_id: DbId,
        work_date: NaiveDate,
    ) -> Result<Option<WorkDay>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM work_days
             WHERE post_id = $1 AND work_date = $2
             FOR UPDATE"
        );
        sqlx::query_as::<_, WorkDay>(&query)
            .bind(post_id)
            .bind(work_date)
            .fetch_optional(conn)
            .await
    }

    /// Record an uncovered day: set status and reason, clear the collaborator.
    ///
    /// An existing row already in that state is not rewritten.
    pub async fn upsert_vacancy(
        conn: &mut PgConnection,
        post_id: DbId,
        work_date: NaiveDate,
        status: WorkDayStatus,
        reason: VacancyReason,
    ) -> Result<WorkDay, sqlx::Error> {
        let query = format!(
            "INSERT INTO work_days (post_id, work_date, status, vacancy_reason)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_work_days_post_date DO UPDATE SET
                status = EXCLUDED.status,
                vacancy_reason = EXCLUDED.vacancy_reason,
                collaborator_id = NULL,
                updated_at = NOW()
             WHERE (work_days.status, work_days.vacancy_reason, work_days.collaborator_id)
                IS DISTINCT FROM (EXCLUDED.status, EXCLUDED.vacancy_reason, NULL::BIGINT)
             RETURNING {COLUMNS}"
        );
        let written = sqlx::query_as::<_, WorkDay>(&query)
            .bind(post_id)
            .bind(work_date)
            .bind(status.as_str())
            .bind(reason.as_str())
            .fetch_optional(&mut *conn)
            .await?;

        match written {
            Some(work_day) => Ok(work_day),
            None => Self::find_slot_for_update(conn, post_id, work_date)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// Set only the status of a (post, date) work day, creating it if needed.
    ///
    /// The collaborator and vacancy reason of an existing row are kept.
    pub async fn upsert_status(
        conn: &mut PgConnection,
        post_id: DbId,
        work_date: NaiveDate,
        status: WorkDayStatus,
    ) -> Result<WorkDay, sqlx::Error> {
        let query = format!(
            "INSERT INTO work_days (post_id, work_date, status)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_work_days_post_date DO UPDATE SET
                status = EXCLUDED.status,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkDay>(&query)
            .bind(post_id)
            .bind(work_date)
            .bind(status.as_str())
            .fetch_one(conn)
            .await
    }

    /// Staff a (post, date) work day with a collaborator and clear its reason.
    pub async fn staff_slot(
        conn: &mut PgConnection,
        post_id: DbId,
        work_date: NaiveDate,
        collaborator_id: DbId,
    ) -> Result<WorkDay, sqlx::Error> {
        let query = format!(
            "INSERT INTO work_days (post_id, work_date, status, collaborator_id)
             VALUES ($1, $2, 'active', $3)
             ON CONFLICT ON CONSTRAINT uq_work_days_post_date DO UPDATE SET
                status = 'active',
                collaborator_id = EXCLUDED.collaborator_id,
                vacancy_reason = NULL,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkDay>(&query)
            .bind(post_id)
            .bind(work_date)
            .bind(collaborator_id)
            .fetch_one(conn)
            .await
    }

    /// Mark attendance for a work day as verified.
    pub async fn confirm_presence(
        conn: &mut PgConnection,
        id: DbId,
        confirmed_by: DbId,
    ) -> Result<WorkDay, sqlx::Error> {
        let query = format!(
            "UPDATE work_days SET
                status = 'presence_confirmed',
                confirmed_by = $2,
                confirmed_at = NOW(),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkDay>(&query)
            .bind(id)
            .bind(confirmed_by)
            .fetch_one(conn)
            .await
    }
}
