//! Per-(post, date) coverage records.

use chrono::NaiveDate;
use coverage_core::conflict::SlotSnapshot;
use coverage_core::types::{DbId, Timestamp};
use coverage_core::work_day::WorkDayStatus;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `work_days` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct WorkDay {
    pub id: DbId,
    pub post_id: DbId,
    pub work_date: NaiveDate,
    pub status: String,
    pub collaborator_id: Option<DbId>,
    pub vacancy_reason: Option<String>,
    pub confirmed_by: Option<DbId>,
    pub confirmed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WorkDay {
    /// Parse the stored status.
    pub fn parsed_status(&self) -> Result<WorkDayStatus, String> {
        WorkDayStatus::from_str_value(&self.status)
    }

    /// Guard-facing view of the row.
    pub fn snapshot(&self) -> Result<SlotSnapshot, String> {
        Ok(SlotSnapshot {
            status: self.parsed_status()?,
            collaborator_id: self.collaborator_id,
        })
    }
}

/// DTO for inserting a pre-generated work day.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkDay {
    pub post_id: DbId,
    pub work_date: NaiveDate,
    pub status: WorkDayStatus,
    pub collaborator_id: Option<DbId>,
}

/// Body of `POST /posts/{post_id}/vacancies`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkDayVacantRequest {
    pub date: NaiveDate,
    /// Free-form reason; normalized before it is stored.
    pub reason: String,
    /// Collaborator who is away. Derived from the day or the post when omitted.
    pub absent_collaborator_id: Option<DbId>,
}
