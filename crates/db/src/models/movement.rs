//! Scheduled collaborator movements (link/unlink ledger).

use chrono::NaiveDate;
use coverage_core::conflict::PendingMovement;
use coverage_core::movement::MovementStatus;
use coverage_core::types::{DbId, Timestamp};
use coverage_core::work_day::WorkDayStatus;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `scheduled_movements` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ScheduledMovement {
    pub id: DbId,
    pub collaborator_id: DbId,
    pub origin_post_id: Option<DbId>,
    pub destination_post_id: Option<DbId>,
    pub effective_date: NaiveDate,
    pub status: String,
    /// Work-day status restored when the movement is cancelled.
    pub work_day_prior_status: Option<String>,
    pub scheduled_by: Option<DbId>,
    pub cancelled_by: Option<DbId>,
    pub cancelled_at: Option<Timestamp>,
    pub executed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ScheduledMovement {
    pub fn parsed_status(&self) -> Result<MovementStatus, String> {
        MovementStatus::from_str_value(&self.status)
    }

    pub fn parsed_prior_status(&self) -> Result<Option<WorkDayStatus>, String> {
        self.work_day_prior_status
            .as_deref()
            .map(WorkDayStatus::from_str_value)
            .transpose()
    }

    pub fn pending(&self) -> PendingMovement {
        PendingMovement {
            id: self.id,
            collaborator_id: self.collaborator_id,
            destination_post_id: self.destination_post_id,
            effective_date: self.effective_date,
        }
    }
}

/// Insert payload built by the scheduling operations.
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub collaborator_id: DbId,
    pub origin_post_id: Option<DbId>,
    pub destination_post_id: Option<DbId>,
    pub effective_date: NaiveDate,
    pub work_day_prior_status: Option<WorkDayStatus>,
    pub scheduled_by: DbId,
}

/// Body of `POST /posts/{post_id}/occupations`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleOccupationRequest {
    pub collaborator_id: DbId,
    pub date: NaiveDate,
}

/// Body of `POST /collaborators/{id}/unlink`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleUnlinkRequest {
    pub date: NaiveDate,
}
