//! Planning for occupancy writes.
//!
//! Each function takes the rows an operation has loaded (and locked) and
//! either returns the exact changes to persist or the error that aborts the
//! operation. Nothing here touches storage, so a failed plan never leaves a
//! partial write behind.

use serde::Serialize;

use crate::booking::resolve_booking_value;
use crate::conflict::{
    check_collaborator_available, check_day_worker_available, check_slot_free,
    CollaboratorSnapshot, LiveBooking, PendingMovement, SlotSnapshot,
};
use crate::error::CoreError;
use crate::movement::{validate_effective_date, MovementStatus};
use crate::post_status::PostStatus;
use crate::reason::VacancyReason;
use crate::types::{DbId, Day};
use crate::work_day::WorkDayStatus;

// ---------------------------------------------------------------------------
// Collaborator -> post
// ---------------------------------------------------------------------------

/// Loaded state for scheduling a collaborator onto a post-day.
#[derive(Debug, Clone, Copy)]
pub struct OccupationRequest<'a> {
    pub post_id: DbId,
    pub post_status: PostStatus,
    pub collaborator: &'a CollaboratorSnapshot,
    pub date: Day,
    pub today: Day,
    /// Scheduled movements of the collaborator and of the target slot.
    pub pending: &'a [PendingMovement],
    /// Work day for (post, date), if the row exists.
    pub slot: Option<&'a SlotSnapshot>,
}

/// Changes to persist for a scheduled occupation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OccupationPlan {
    /// Post the collaborator will be unlinked from, if any.
    pub origin_post_id: Option<DbId>,
    /// Work-day status to restore if the movement is cancelled.
    pub prior_status: WorkDayStatus,
    /// The work day row does not exist yet and must be inserted.
    pub create_work_day: bool,
}

pub fn plan_occupation(req: &OccupationRequest<'_>) -> Result<OccupationPlan, CoreError> {
    validate_effective_date(req.date, req.today)?;

    if req.post_status.is_terminal() {
        return Err(CoreError::Validation(format!(
            "Post {} is {} and cannot receive collaborators",
            req.post_id, req.post_status
        )));
    }
    if !req.collaborator.is_active {
        return Err(CoreError::Validation(format!(
            "Collaborator {} is inactive",
            req.collaborator.id
        )));
    }

    check_collaborator_available(req.collaborator, req.pending, req.post_id, req.date)?;
    check_slot_free(req.post_id, req.date, req.slot, req.pending)?;

    let prior_status = req.slot.map_or(WorkDayStatus::Vacant, |s| s.status);
    prior_status.validate_transition(WorkDayStatus::OccupationScheduled)?;

    Ok(OccupationPlan {
        origin_post_id: req.collaborator.post_id,
        prior_status,
        create_work_day: req.slot.is_none(),
    })
}

// ---------------------------------------------------------------------------
// Collaborator unlink
// ---------------------------------------------------------------------------

/// Validate an unlink-only movement and return the post being left.
pub fn plan_unlink(
    collaborator: &CollaboratorSnapshot,
    pending: &[PendingMovement],
    date: Day,
    today: Day,
) -> Result<DbId, CoreError> {
    validate_effective_date(date, today)?;

    if !collaborator.is_active {
        return Err(CoreError::Validation(format!(
            "Collaborator {} is inactive",
            collaborator.id
        )));
    }
    let Some(origin) = collaborator.post_id else {
        return Err(CoreError::Validation(format!(
            "Collaborator {} is not assigned to any post",
            collaborator.id
        )));
    };
    if let Some(existing) = pending.iter().find(|m| m.collaborator_id == collaborator.id) {
        return Err(CoreError::Conflict(format!(
            "Collaborator {} already has a pending movement effective {}",
            collaborator.id, existing.effective_date
        )));
    }

    Ok(origin)
}

// ---------------------------------------------------------------------------
// Vacancy marking
// ---------------------------------------------------------------------------

/// Loaded state for marking a post-day vacant.
#[derive(Debug, Clone, Copy)]
pub struct VacancyMarkRequest<'a> {
    pub reason: VacancyReason,
    /// Absent collaborator named by the caller.
    pub explicit_absent: Option<DbId>,
    /// Absent collaborator on an existing mark for the same post-day.
    pub previous_absent: Option<DbId>,
    pub slot: Option<&'a SlotSnapshot>,
    /// Active collaborator currently linked to the post.
    pub incumbent: Option<DbId>,
}

/// Changes to persist for a vacancy mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VacancyPlan {
    pub status: WorkDayStatus,
    pub absent_collaborator_id: Option<DbId>,
}

pub fn plan_vacancy_mark(req: &VacancyMarkRequest<'_>) -> Result<VacancyPlan, CoreError> {
    if let Some(slot) = req.slot {
        if matches!(
            slot.status,
            WorkDayStatus::OccupationScheduled | WorkDayStatus::PresenceConfirmed
        ) {
            return Err(CoreError::Conflict(format!(
                "Work day is {} and cannot be marked vacant",
                slot.status
            )));
        }
    }

    let absent_collaborator_id = if req.reason.is_structural() {
        None
    } else {
        req.explicit_absent
            .or(req.previous_absent)
            .or(req.slot.and_then(|s| s.collaborator_id))
            .or(req.incumbent)
    };

    let status = if absent_collaborator_id.is_some() {
        WorkDayStatus::TemporarilyVacant
    } else {
        WorkDayStatus::Vacant
    };

    if let Some(slot) = req.slot {
        if slot.status != status {
            slot.status.validate_transition(status)?;
        }
    }

    Ok(VacancyPlan {
        status,
        absent_collaborator_id,
    })
}

// ---------------------------------------------------------------------------
// Movement cancellation
// ---------------------------------------------------------------------------

/// Validate a cancellation and return the status the work day reverts to.
///
/// `None` means the work day is left untouched (it no longer shows the
/// scheduled occupation, e.g. it was edited in the meantime).
pub fn plan_cancellation(
    movement_status: MovementStatus,
    current_slot_status: Option<WorkDayStatus>,
    prior_status: Option<WorkDayStatus>,
) -> Result<Option<WorkDayStatus>, CoreError> {
    movement_status.validate_transition(MovementStatus::Cancelled)?;

    if current_slot_status != Some(WorkDayStatus::OccupationScheduled) {
        return Ok(None);
    }

    let revert_to = prior_status
        .filter(|s| s.is_vacant())
        .unwrap_or(WorkDayStatus::Vacant);
    Ok(Some(revert_to))
}

// ---------------------------------------------------------------------------
// Day-worker booking
// ---------------------------------------------------------------------------

/// Loaded state for booking a day-worker onto a vacancy mark.
#[derive(Debug, Clone, Copy)]
pub struct BookingRequest<'a> {
    pub day_worker_id: DbId,
    pub day_worker_active: bool,
    pub work_date: Day,
    /// Live bookings of the day-worker (any post).
    pub live_bookings: &'a [LiveBooking],
    /// Live booking already attached to the vacancy mark, if any.
    pub mark_booking_id: Option<DbId>,
    pub value_cents: Option<i64>,
    pub post_day_rate_cents: Option<i64>,
}

/// Validate a booking and return its value in cents.
pub fn plan_booking(req: &BookingRequest<'_>) -> Result<i64, CoreError> {
    if !req.day_worker_active {
        return Err(CoreError::Validation(format!(
            "Day-worker {} is inactive",
            req.day_worker_id
        )));
    }

    check_day_worker_available(req.day_worker_id, req.work_date, req.live_bookings)?;

    if let Some(existing) = req.mark_booking_id {
        return Err(CoreError::Conflict(format!(
            "Vacancy is already covered by booking {existing}"
        )));
    }

    resolve_booking_value(req.value_cents, req.post_day_rate_cents)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    fn reserve(id: DbId) -> CollaboratorSnapshot {
        CollaboratorSnapshot {
            id,
            post_id: None,
            is_active: true,
        }
    }

    fn occupation<'a>(
        collaborator: &'a CollaboratorSnapshot,
        pending: &'a [PendingMovement],
        slot: Option<&'a SlotSnapshot>,
    ) -> OccupationRequest<'a> {
        OccupationRequest {
            post_id: 10,
            post_status: PostStatus::Vacant,
            collaborator,
            date: day("2024-06-01"),
            today: day("2024-05-20"),
            pending,
            slot,
        }
    }

    // -----------------------------------------------------------------------
    // plan_occupation
    // -----------------------------------------------------------------------

    #[test]
    fn reserve_onto_missing_work_day() {
        let r = reserve(1);
        let plan = plan_occupation(&occupation(&r, &[], None)).unwrap();
        assert_eq!(
            plan,
            OccupationPlan {
                origin_post_id: None,
                prior_status: WorkDayStatus::Vacant,
                create_work_day: true,
            }
        );
    }

    #[test]
    fn prior_temporarily_vacant_status_is_remembered() {
        let r = reserve(1);
        let slot = SlotSnapshot {
            status: WorkDayStatus::TemporarilyVacant,
            collaborator_id: None,
        };
        let plan = plan_occupation(&occupation(&r, &[], Some(&slot))).unwrap();
        assert_eq!(plan.prior_status, WorkDayStatus::TemporarilyVacant);
        assert!(!plan.create_work_day);
    }

    #[test]
    fn linked_collaborator_records_origin() {
        let c = CollaboratorSnapshot {
            post_id: Some(55),
            ..reserve(1)
        };
        let plan = plan_occupation(&occupation(&c, &[], None)).unwrap();
        assert_eq!(plan.origin_post_id, Some(55));
    }

    #[test]
    fn past_date_is_a_validation_error() {
        let r = reserve(1);
        let mut req = occupation(&r, &[], None);
        req.date = day("2024-05-19");
        assert_matches!(plan_occupation(&req), Err(CoreError::Validation(_)));
    }

    #[test]
    fn today_is_allowed() {
        let r = reserve(1);
        let mut req = occupation(&r, &[], None);
        req.date = req.today;
        assert!(plan_occupation(&req).is_ok());
    }

    #[test]
    fn inactive_post_or_collaborator_is_rejected() {
        let r = reserve(1);
        let mut req = occupation(&r, &[], None);
        req.post_status = PostStatus::Inactive;
        assert_matches!(plan_occupation(&req), Err(CoreError::Validation(_)));

        let inactive = CollaboratorSnapshot {
            is_active: false,
            ..reserve(1)
        };
        assert_matches!(
            plan_occupation(&occupation(&inactive, &[], None)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn repeated_schedule_conflicts_on_pending_movement() {
        let r = reserve(1);
        let first = PendingMovement {
            id: 9,
            collaborator_id: 1,
            destination_post_id: Some(10),
            effective_date: day("2024-06-01"),
        };
        let pending = [first];
        assert_matches!(
            plan_occupation(&occupation(&r, &pending, None)),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn staffed_active_day_cannot_be_scheduled() {
        let r = reserve(1);
        let slot = SlotSnapshot {
            status: WorkDayStatus::Active,
            collaborator_id: None,
        };
        assert_matches!(
            plan_occupation(&occupation(&r, &[], Some(&slot))),
            Err(CoreError::Conflict(_))
        );
    }

    // -----------------------------------------------------------------------
    // plan_unlink
    // -----------------------------------------------------------------------

    #[test]
    fn unlink_returns_current_post() {
        let c = CollaboratorSnapshot {
            post_id: Some(3),
            ..reserve(1)
        };
        assert_eq!(
            plan_unlink(&c, &[], day("2024-06-01"), day("2024-06-01")).unwrap(),
            3
        );
    }

    #[test]
    fn unlink_requires_a_link_and_no_pending_movement() {
        assert_matches!(
            plan_unlink(&reserve(1), &[], day("2024-06-01"), day("2024-05-01")),
            Err(CoreError::Validation(_))
        );

        let c = CollaboratorSnapshot {
            post_id: Some(3),
            ..reserve(1)
        };
        let pending = [PendingMovement {
            id: 2,
            collaborator_id: 1,
            destination_post_id: Some(4),
            effective_date: day("2024-07-01"),
        }];
        assert_matches!(
            plan_unlink(&c, &pending, day("2024-06-01"), day("2024-05-01")),
            Err(CoreError::Conflict(_))
        );
    }

    // -----------------------------------------------------------------------
    // plan_vacancy_mark
    // -----------------------------------------------------------------------

    fn mark(reason: VacancyReason) -> VacancyMarkRequest<'static> {
        VacancyMarkRequest {
            reason,
            explicit_absent: None,
            previous_absent: None,
            slot: None,
            incumbent: None,
        }
    }

    #[test]
    fn vacation_with_incumbent_is_temporarily_vacant() {
        let req = VacancyMarkRequest {
            incumbent: Some(4),
            ..mark(VacancyReason::Vacation)
        };
        let plan = plan_vacancy_mark(&req).unwrap();
        assert_eq!(plan.status, WorkDayStatus::TemporarilyVacant);
        assert_eq!(plan.absent_collaborator_id, Some(4));
    }

    #[test]
    fn work_day_collaborator_wins_over_incumbent() {
        let slot = SlotSnapshot {
            status: WorkDayStatus::Active,
            collaborator_id: Some(8),
        };
        let req = VacancyMarkRequest {
            slot: Some(&slot),
            incumbent: Some(4),
            ..mark(VacancyReason::JustifiedAbsence)
        };
        assert_eq!(plan_vacancy_mark(&req).unwrap().absent_collaborator_id, Some(8));
    }

    #[test]
    fn previous_mark_keeps_absent_collaborator_stable() {
        let slot = SlotSnapshot {
            status: WorkDayStatus::TemporarilyVacant,
            collaborator_id: None,
        };
        let req = VacancyMarkRequest {
            previous_absent: Some(8),
            slot: Some(&slot),
            incumbent: Some(4),
            ..mark(VacancyReason::Vacation)
        };
        let plan = plan_vacancy_mark(&req).unwrap();
        assert_eq!(plan.absent_collaborator_id, Some(8));
        assert_eq!(plan.status, WorkDayStatus::TemporarilyVacant);
    }

    #[test]
    fn structural_vacancy_has_no_absent_collaborator() {
        let req = VacancyMarkRequest {
            explicit_absent: Some(4),
            incumbent: Some(4),
            ..mark(VacancyReason::VacantPost)
        };
        let plan = plan_vacancy_mark(&req).unwrap();
        assert_eq!(plan.status, WorkDayStatus::Vacant);
        assert_eq!(plan.absent_collaborator_id, None);
    }

    #[test]
    fn absence_without_anyone_to_name_is_vacant() {
        let plan = plan_vacancy_mark(&mark(VacancyReason::Suspension)).unwrap();
        assert_eq!(plan.status, WorkDayStatus::Vacant);
    }

    #[test]
    fn scheduled_or_confirmed_day_cannot_be_marked() {
        for status in [WorkDayStatus::OccupationScheduled, WorkDayStatus::PresenceConfirmed] {
            let slot = SlotSnapshot {
                status,
                collaborator_id: None,
            };
            let req = VacancyMarkRequest {
                slot: Some(&slot),
                ..mark(VacancyReason::Vacation)
            };
            assert_matches!(plan_vacancy_mark(&req), Err(CoreError::Conflict(_)));
        }
    }

    #[test]
    fn same_status_remark_is_accepted() {
        let slot = SlotSnapshot {
            status: WorkDayStatus::Vacant,
            collaborator_id: None,
        };
        let req = VacancyMarkRequest {
            slot: Some(&slot),
            ..mark(VacancyReason::VacantPost)
        };
        assert_eq!(plan_vacancy_mark(&req).unwrap().status, WorkDayStatus::Vacant);
    }

    // -----------------------------------------------------------------------
    // plan_cancellation
    // -----------------------------------------------------------------------

    #[test]
    fn cancellation_reverts_to_prior_vacant_status() {
        let revert = plan_cancellation(
            MovementStatus::Scheduled,
            Some(WorkDayStatus::OccupationScheduled),
            Some(WorkDayStatus::TemporarilyVacant),
        )
        .unwrap();
        assert_eq!(revert, Some(WorkDayStatus::TemporarilyVacant));
    }

    #[test]
    fn cancellation_without_prior_defaults_to_vacant() {
        let revert = plan_cancellation(
            MovementStatus::Scheduled,
            Some(WorkDayStatus::OccupationScheduled),
            None,
        )
        .unwrap();
        assert_eq!(revert, Some(WorkDayStatus::Vacant));
    }

    #[test]
    fn cancellation_leaves_edited_day_alone() {
        let revert = plan_cancellation(
            MovementStatus::Scheduled,
            Some(WorkDayStatus::Active),
            Some(WorkDayStatus::Vacant),
        )
        .unwrap();
        assert_eq!(revert, None);
    }

    #[test]
    fn only_scheduled_movements_can_be_cancelled() {
        for status in [MovementStatus::Effective, MovementStatus::Cancelled] {
            assert_matches!(
                plan_cancellation(status, None, None),
                Err(CoreError::Conflict(_))
            );
        }
    }

    // -----------------------------------------------------------------------
    // plan_booking
    // -----------------------------------------------------------------------

    fn booking<'a>(live: &'a [LiveBooking]) -> BookingRequest<'a> {
        BookingRequest {
            day_worker_id: 7,
            day_worker_active: true,
            work_date: day("2024-05-01"),
            live_bookings: live,
            mark_booking_id: None,
            value_cents: None,
            post_day_rate_cents: Some(12_000),
        }
    }

    #[test]
    fn booking_uses_day_rate_by_default() {
        assert_eq!(plan_booking(&booking(&[])).unwrap(), 12_000);
    }

    #[test]
    fn booking_same_worker_same_day_other_post_conflicts() {
        let live = [LiveBooking {
            id: 1,
            day_worker_id: 7,
            post_id: 200,
            work_date: day("2024-05-01"),
        }];
        assert_matches!(plan_booking(&booking(&live)), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn booking_covered_mark_conflicts() {
        let req = BookingRequest {
            mark_booking_id: Some(3),
            ..booking(&[])
        };
        assert_matches!(plan_booking(&req), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn inactive_day_worker_is_rejected() {
        let req = BookingRequest {
            day_worker_active: false,
            ..booking(&[])
        };
        assert_matches!(plan_booking(&req), Err(CoreError::Validation(_)));
    }
}
