//! Vacancy marks: why a specific post-day is uncovered.

use chrono::NaiveDate;
use coverage_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `vacancy_marks` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct VacancyMark {
    pub id: DbId,
    pub post_id: DbId,
    pub work_date: NaiveDate,
    /// Canonical reason (see `coverage_core::reason`).
    pub reason: String,
    /// `None` when the post itself is vacant.
    pub absent_collaborator_id: Option<DbId>,
    pub marked_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A vacancy mark with no live booking, joined with its post.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VacantDay {
    pub id: DbId,
    pub post_id: DbId,
    pub post_code: String,
    pub post_name: String,
    pub work_date: NaiveDate,
    pub reason: String,
    pub absent_collaborator_id: Option<DbId>,
    pub marked_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// Query parameters for `GET /coverage/vacant-days`.
#[derive(Debug, Clone, Deserialize)]
pub struct VacantDaysParams {
    /// First day to include. Defaults to today.
    pub from: Option<NaiveDate>,
}
