//! Repository for the `vacancy_marks` table.

use chrono::NaiveDate;
use coverage_core::reason::VacancyReason;
use coverage_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::vacancy_mark::{VacancyMark, VacantDay};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, post_id, work_date, reason, absent_collaborator_id, \
    marked_by, created_at, updated_at";

pub struct VacancyMarkRepo;

impl VacancyMarkRepo {
    /// Create or replace the mark for a (post, date).
    ///
    /// Marking the same post-day twice keeps a single row. A repeat with the
    /// same reason and absent collaborator leaves the row untouched, author
    /// and `updated_at` included.
    pub async fn upsert(
        conn: &mut PgConnection,
        post_id: DbId,
        work_date: NaiveDate,
        reason: VacancyReason,
        absent_collaborator_id: Option<DbId>,
        marked_by: DbId,
    ) -> Result<VacancyMark, sqlx::Error> {
        let query = format!(
            "INSERT INTO vacancy_marks (post_id, work_date, reason, absent_collaborator_id, marked_by)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_vacancy_marks_post_date DO UPDATE SET
                reason = EXCLUDED.reason,
                absent_collaborator_id = EXCLUDED.absent_collaborator_id,
                marked_by = EXCLUDED.marked_by,
                updated_at = NOW()
             WHERE (vacancy_marks.reason, vacancy_marks.absent_collaborator_id)
                IS DISTINCT FROM (EXCLUDED.reason, EXCLUDED.absent_collaborator_id)
             RETURNING {COLUMNS}"
        );
        let written = sqlx::query_as::<_, VacancyMark>(&query)
            .bind(post_id)
            .bind(work_date)
            .bind(reason.as_str())
            .bind(absent_collaborator_id)
            .bind(marked_by)
            .fetch_optional(&mut *conn)
            .await?;

        match written {
            Some(mark) => Ok(mark),
            None => Self::find_slot_for_update(conn, post_id, work_date)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// Find a vacancy mark by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<VacancyMark>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vacancy_marks WHERE id = $1");
        sqlx::query_as::<_, VacancyMark>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a vacancy mark by ID and lock it.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<VacancyMark>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vacancy_marks WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, VacancyMark>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// The mark for a (post, date), locked.
    pub async fn find_slot_for_update(
        conn: &mut PgConnection,
        post_id: DbId,
        work_date: NaiveDate,
    ) -> Result<Option<VacancyMark>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vacancy_marks
             WHERE post_id = $1 AND work_date = $2
             FOR UPDATE"
        );
        sqlx::query_as::<_, VacancyMark>(&query)
            .bind(post_id)
            .bind(work_date)
            .fetch_optional(conn)
            .await
    }

    /// Marks on or after `from` with no live booking, by date then post code.
    pub async fn list_uncovered_from(
        pool: &PgPool,
        from: NaiveDate,
    ) -> Result<Vec<VacantDay>, sqlx::Error> {
        sqlx::query_as::<_, VacantDay>(
            "SELECT m.id, m.post_id, p.code AS post_code, p.name AS post_name,
                    m.work_date, m.reason, m.absent_collaborator_id, m.marked_by, m.created_at
             FROM vacancy_marks m
             JOIN posts p ON p.id = m.post_id
             WHERE m.work_date >= $1
               AND NOT EXISTS (
                   SELECT 1 FROM day_worker_bookings b
                   WHERE b.vacancy_mark_id = m.id
                     AND b.status NOT IN ('cancelled', 'rejected')
               )
             ORDER BY m.work_date, p.code, m.id",
        )
        .bind(from)
        .fetch_all(pool)
        .await
    }
}
