//! Double-booking checks for collaborators, day-workers and post slots.
//!
//! Every check is a pure function over rows the caller has just loaded
//! (normally inside the transaction that will perform the write). The
//! storage layer's unique indexes remain the authority; these checks exist
//! to fail fast with a readable message.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Day};
use crate::work_day::WorkDayStatus;

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// The fields of a collaborator that the guard needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollaboratorSnapshot {
    pub id: DbId,
    /// Post the collaborator is currently linked to (`None` = reserve).
    pub post_id: Option<DbId>,
    pub is_active: bool,
}

/// A movement in `scheduled` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingMovement {
    pub id: DbId,
    pub collaborator_id: DbId,
    pub destination_post_id: Option<DbId>,
    pub effective_date: Day,
}

/// Current state of a (post, date) work day, if the row exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotSnapshot {
    pub status: WorkDayStatus,
    pub collaborator_id: Option<DbId>,
}

/// A day-worker booking that still holds its date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LiveBooking {
    pub id: DbId,
    pub day_worker_id: DbId,
    pub post_id: DbId,
    pub work_date: Day,
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Can `collaborator` be scheduled onto `target_post_id` on `date`?
///
/// Fails when the collaborator already has a pending movement (on the same
/// date or any other, since only one may be pending at a time) or is
/// already linked to the target post. A link to a different post is fine:
/// the new movement records it as the origin to unlink from.
pub fn check_collaborator_available(
    collaborator: &CollaboratorSnapshot,
    pending: &[PendingMovement],
    target_post_id: DbId,
    date: Day,
) -> Result<(), CoreError> {
    let mut own_pending = pending
        .iter()
        .filter(|m| m.collaborator_id == collaborator.id);

    if own_pending.clone().any(|m| m.effective_date == date) {
        return Err(CoreError::Conflict(format!(
            "Collaborator {} already has a movement scheduled for {date}",
            collaborator.id
        )));
    }

    if let Some(movement) = own_pending.next() {
        return Err(CoreError::Conflict(format!(
            "Collaborator {} already has a pending movement effective {}",
            collaborator.id, movement.effective_date
        )));
    }

    if collaborator.post_id == Some(target_post_id) {
        return Err(CoreError::Conflict(format!(
            "Collaborator {} is already assigned to post {target_post_id}",
            collaborator.id
        )));
    }

    Ok(())
}

/// Is `day_worker_id` free on `date`, across every post?
pub fn check_day_worker_available(
    day_worker_id: DbId,
    date: Day,
    live_bookings: &[LiveBooking],
) -> Result<(), CoreError> {
    match live_bookings
        .iter()
        .find(|b| b.day_worker_id == day_worker_id && b.work_date == date)
    {
        Some(existing) => Err(CoreError::Conflict(format!(
            "Duplicate booking for this date: day-worker {day_worker_id} is already booked \
             on {date} (booking {} at post {})",
            existing.id, existing.post_id
        ))),
        None => Ok(()),
    }
}

/// Is the (post, date) slot free for a scheduled occupation?
pub fn check_slot_free(
    post_id: DbId,
    date: Day,
    slot: Option<&SlotSnapshot>,
    pending: &[PendingMovement],
) -> Result<(), CoreError> {
    if let Some(collaborator_id) = slot.and_then(|s| s.collaborator_id) {
        return Err(CoreError::Conflict(format!(
            "Post {post_id} on {date} is already covered by collaborator {collaborator_id}"
        )));
    }

    if let Some(existing) = pending
        .iter()
        .find(|m| m.destination_post_id == Some(post_id) && m.effective_date == date)
    {
        return Err(CoreError::Conflict(format!(
            "Post {post_id} on {date} already has movement {} scheduled",
            existing.id
        )));
    }

    Ok(())
}
