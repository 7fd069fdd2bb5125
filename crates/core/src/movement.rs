//! Scheduled collaborator movements.
//!
//! A movement records that a collaborator leaves an origin post and/or
//! starts at a destination post on an effective date. Movements are created
//! as `scheduled`; a separate batch marks them `effective` once their date
//! arrives.

use crate::error::CoreError;
use crate::types::{DbId, Day};

crate::define_text_status! {
    /// Lifecycle status of a scheduled movement.
    MovementStatus {
        Scheduled => "scheduled",
        Effective => "effective",
        Cancelled => "cancelled",
    }
}

impl MovementStatus {
    /// Check whether a transition from `self` to `to` is valid.
    pub fn can_transition(self, to: MovementStatus) -> bool {
        matches!(
            (self, to),
            (Self::Scheduled, Self::Effective) | (Self::Scheduled, Self::Cancelled)
        )
    }

    /// Validate a transition, returning a conflict for invalid ones.
    pub fn validate_transition(self, to: MovementStatus) -> Result<(), CoreError> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Movement is {self} and cannot become {to}"
            )))
        }
    }
}

/// Reject effective dates in the past.
pub fn validate_effective_date(date: Day, today: Day) -> Result<(), CoreError> {
    if date < today {
        return Err(CoreError::Validation(format!(
            "Effective date {date} is in the past (today is {today})"
        )));
    }
    Ok(())
}

/// A scheduled movement is due once its effective date has arrived.
pub fn is_due(status: MovementStatus, effective_date: Day, today: Day) -> bool {
    status == MovementStatus::Scheduled && effective_date <= today
}

/// Link changes produced by executing a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMovement {
    /// The collaborator's post after execution (`None` = reserve).
    pub new_post_id: Option<DbId>,
    /// Work day (destination post, effective date) that becomes staffed.
    pub staffed_slot: Option<(DbId, Day)>,
}

/// Compute the effect of executing a due movement.
pub fn apply_movement(destination_post_id: Option<DbId>, effective_date: Day) -> AppliedMovement {
    AppliedMovement {
        new_post_id: destination_post_id,
        staffed_slot: destination_post_id.map(|post_id| (post_id, effective_date)),
    }
}
