//! Transactional occupancy writes.
//!
//! Each operation follows the same shape: begin a transaction, lock the rows
//! the decision depends on (`FOR UPDATE`), hand them to the planner in
//! `coverage_core::occupancy`, persist the plan, recompute the derived post
//! status, commit. A planner error returns before anything is written, and
//! dropping the transaction rolls back any partial write.
//!
//! Lock order is post, then collaborator or day-worker, then work day, then
//! mark or movement. Several posts are locked lowest id first. Rows needed
//! only to find what to lock (a mark's post, a movement's posts) are read
//! before the transaction; those columns never change after insert.

use coverage_core::booking::BookingStatus;
use coverage_core::conflict::LiveBooking;
use coverage_core::error::CoreError;
use coverage_core::movement::validate_effective_date;
use coverage_core::occupancy::{
    plan_booking, plan_cancellation, plan_occupation, plan_unlink, plan_vacancy_mark,
    BookingRequest, OccupationRequest, VacancyMarkRequest,
};
use coverage_core::post_status::PostStatus;
use coverage_core::reason::normalize_reason;
use coverage_core::types::{DbId, Day};
use coverage_core::work_day::WorkDayStatus;
use coverage_db::models::booking::{CreateBookingRequest, DayWorkerBooking, NewBooking};
use coverage_db::models::movement::{
    NewMovement, ScheduleOccupationRequest, ScheduleUnlinkRequest, ScheduledMovement,
};
use coverage_db::models::post::Post;
use coverage_db::models::work_day::{MarkDayVacantRequest, WorkDay};
use coverage_db::repositories::{
    BookingRepo, CollaboratorRepo, DayWorkerRepo, MovementRepo, PostRepo, VacancyMarkRepo,
    WorkDayRepo,
};
use coverage_db::DbPool;

use crate::error::{conflict_on_unique, AppResult};

fn not_found(entity: &'static str, id: DbId) -> CoreError {
    CoreError::NotFound { entity, id }
}

/// Message for a unique violation raised while inserting a movement.
fn movement_conflict(constraint: &str) -> String {
    match constraint {
        "uq_scheduled_movements_pending_collaborator" => {
            "Collaborator already has a pending movement".to_string()
        }
        "uq_scheduled_movements_pending_slot" => {
            "Post already has an occupation scheduled for this date".to_string()
        }
        other => format!("Movement conflicts with {other}"),
    }
}

// ---------------------------------------------------------------------------
// Collaborator -> post
// ---------------------------------------------------------------------------

/// Schedule a reserve (or reassigned) collaborator onto a post from a date.
///
/// Creates a `scheduled` movement and moves the work day for (post, date) to
/// `occupation_scheduled`, inserting the row first if it does not exist.
pub async fn schedule_collaborator_to_post(
    pool: &DbPool,
    post_id: DbId,
    input: &ScheduleOccupationRequest,
    actor: DbId,
    today: Day,
) -> AppResult<ScheduledMovement> {
    validate_effective_date(input.date, today)?;

    let mut tx = pool.begin().await?;

    let post = PostRepo::find_for_update(&mut *tx, post_id)
        .await?
        .ok_or_else(|| not_found("Post", post_id))?;
    let post_status = PostStatus::from_str_value(&post.status).map_err(CoreError::Internal)?;

    let collaborator = CollaboratorRepo::find_for_update(&mut *tx, input.collaborator_id)
        .await?
        .ok_or_else(|| not_found("Collaborator", input.collaborator_id))?;

    let pending: Vec<_> =
        MovementRepo::list_pending_for(&mut *tx, collaborator.id, post_id, input.date)
            .await?
            .iter()
            .map(ScheduledMovement::pending)
            .collect();

    let slot = WorkDayRepo::find_slot_for_update(&mut *tx, post_id, input.date)
        .await?
        .map(|wd| wd.snapshot())
        .transpose()
        .map_err(CoreError::Internal)?;

    let snapshot = collaborator.snapshot();
    let plan = plan_occupation(&OccupationRequest {
        post_id,
        post_status,
        collaborator: &snapshot,
        date: input.date,
        today,
        pending: &pending,
        slot: slot.as_ref(),
    })?;

    let movement = MovementRepo::create(
        &mut *tx,
        &NewMovement {
            collaborator_id: collaborator.id,
            origin_post_id: plan.origin_post_id,
            destination_post_id: Some(post_id),
            effective_date: input.date,
            work_day_prior_status: Some(plan.prior_status),
            scheduled_by: actor,
        },
    )
    .await
    .map_err(|e| conflict_on_unique(e, movement_conflict))?;

    WorkDayRepo::upsert_status(
        &mut *tx,
        post_id,
        input.date,
        WorkDayStatus::OccupationScheduled,
    )
    .await?;

    PostRepo::refresh_status(&mut *tx, post_id, today).await?;

    tx.commit().await?;

    tracing::info!(
        movement_id = movement.id,
        post_id,
        collaborator_id = collaborator.id,
        origin_post_id = ?plan.origin_post_id,
        effective_date = %input.date,
        work_day_created = plan.create_work_day,
        actor,
        "Occupation scheduled"
    );

    Ok(movement)
}

/// Schedule a collaborator to leave their post (to the reserve) from a date.
pub async fn schedule_collaborator_unlink(
    pool: &DbPool,
    collaborator_id: DbId,
    input: &ScheduleUnlinkRequest,
    actor: DbId,
    today: Day,
) -> AppResult<ScheduledMovement> {
    validate_effective_date(input.date, today)?;

    let mut tx = pool.begin().await?;

    let collaborator = CollaboratorRepo::find_for_update(&mut *tx, collaborator_id)
        .await?
        .ok_or_else(|| not_found("Collaborator", collaborator_id))?;

    let pending: Vec<_> = MovementRepo::list_pending_for_collaborator(&mut *tx, collaborator_id)
        .await?
        .iter()
        .map(ScheduledMovement::pending)
        .collect();

    let origin = plan_unlink(&collaborator.snapshot(), &pending, input.date, today)?;

    let movement = MovementRepo::create(
        &mut *tx,
        &NewMovement {
            collaborator_id,
            origin_post_id: Some(origin),
            destination_post_id: None,
            effective_date: input.date,
            work_day_prior_status: None,
            scheduled_by: actor,
        },
    )
    .await
    .map_err(|e| conflict_on_unique(e, movement_conflict))?;

    tx.commit().await?;

    tracing::info!(
        movement_id = movement.id,
        collaborator_id,
        origin_post_id = origin,
        effective_date = %input.date,
        actor,
        "Unlink scheduled"
    );

    Ok(movement)
}

/// Cancel a scheduled movement and restore the work day it had reserved.
pub async fn cancel_scheduled_movement(
    pool: &DbPool,
    movement_id: DbId,
    actor: DbId,
    today: Day,
) -> AppResult<ScheduledMovement> {
    let unlocked = MovementRepo::find_by_id(pool, movement_id)
        .await?
        .ok_or_else(|| not_found("ScheduledMovement", movement_id))?;
    let posts: Vec<DbId> = [unlocked.origin_post_id, unlocked.destination_post_id]
        .into_iter()
        .flatten()
        .collect();

    let mut tx = pool.begin().await?;

    PostRepo::lock_in_order(&mut *tx, &posts).await?;

    let slot_status = match unlocked.destination_post_id {
        Some(post_id) => {
            WorkDayRepo::find_slot_for_update(&mut *tx, post_id, unlocked.effective_date)
                .await?
                .map(|wd| wd.parsed_status())
                .transpose()
                .map_err(CoreError::Internal)?
        }
        None => None,
    };

    let movement = MovementRepo::find_for_update(&mut *tx, movement_id)
        .await?
        .ok_or_else(|| not_found("ScheduledMovement", movement_id))?;
    let status = movement.parsed_status().map_err(CoreError::Internal)?;
    let prior = movement
        .parsed_prior_status()
        .map_err(CoreError::Internal)?;

    let revert_to = plan_cancellation(status, slot_status, prior)?;

    let cancelled = MovementRepo::mark_cancelled(&mut *tx, movement_id, actor).await?;

    if let (Some(post_id), Some(to)) = (movement.destination_post_id, revert_to) {
        WorkDayRepo::upsert_status(&mut *tx, post_id, movement.effective_date, to).await?;
    }

    for post_id in posts {
        PostRepo::refresh_status(&mut *tx, post_id, today).await?;
    }

    tx.commit().await?;

    tracing::info!(
        movement_id,
        collaborator_id = movement.collaborator_id,
        destination_post_id = ?movement.destination_post_id,
        reverted_to = ?revert_to,
        actor,
        "Movement cancelled"
    );

    Ok(cancelled)
}

// ---------------------------------------------------------------------------
// Vacancy marking
// ---------------------------------------------------------------------------

/// Record that a post-day is uncovered and why.
///
/// Repeating the call with the same arguments leaves the same state behind.
pub async fn mark_day_vacant(
    pool: &DbPool,
    post_id: DbId,
    input: &MarkDayVacantRequest,
    actor: DbId,
    today: Day,
) -> AppResult<WorkDay> {
    let reason = normalize_reason(&input.reason)?;

    let mut tx = pool.begin().await?;

    PostRepo::find_for_update(&mut *tx, post_id)
        .await?
        .ok_or_else(|| not_found("Post", post_id))?;

    if let Some(absent_id) = input.absent_collaborator_id {
        CollaboratorRepo::find_for_update(&mut *tx, absent_id)
            .await?
            .ok_or_else(|| not_found("Collaborator", absent_id))?;
    }

    let slot = WorkDayRepo::find_slot_for_update(&mut *tx, post_id, input.date)
        .await?
        .map(|wd| wd.snapshot())
        .transpose()
        .map_err(CoreError::Internal)?;
    let previous = VacancyMarkRepo::find_slot_for_update(&mut *tx, post_id, input.date).await?;
    let incumbent = CollaboratorRepo::find_incumbent(&mut *tx, post_id).await?;

    let plan = plan_vacancy_mark(&VacancyMarkRequest {
        reason,
        explicit_absent: input.absent_collaborator_id,
        previous_absent: previous.and_then(|m| m.absent_collaborator_id),
        slot: slot.as_ref(),
        incumbent,
    })?;

    let work_day =
        WorkDayRepo::upsert_vacancy(&mut *tx, post_id, input.date, plan.status, reason).await?;
    let mark = VacancyMarkRepo::upsert(
        &mut *tx,
        post_id,
        input.date,
        reason,
        plan.absent_collaborator_id,
        actor,
    )
    .await?;

    PostRepo::refresh_status(&mut *tx, post_id, today).await?;

    tx.commit().await?;

    tracing::info!(
        post_id,
        work_date = %input.date,
        vacancy_mark_id = mark.id,
        reason = %reason.as_str(),
        absent_collaborator_id = ?plan.absent_collaborator_id,
        status = %plan.status,
        actor,
        "Day marked vacant"
    );

    Ok(work_day)
}

/// Verify attendance on an active work day.
pub async fn confirm_presence(pool: &DbPool, work_day_id: DbId, actor: DbId) -> AppResult<WorkDay> {
    let mut tx = pool.begin().await?;

    let work_day = WorkDayRepo::find_for_update(&mut *tx, work_day_id)
        .await?
        .ok_or_else(|| not_found("WorkDay", work_day_id))?;
    let status = work_day.parsed_status().map_err(CoreError::Internal)?;
    status.validate_transition(WorkDayStatus::PresenceConfirmed)?;

    let confirmed = WorkDayRepo::confirm_presence(&mut *tx, work_day_id, actor).await?;

    tx.commit().await?;

    tracing::info!(
        work_day_id,
        post_id = confirmed.post_id,
        work_date = %confirmed.work_date,
        actor,
        "Presence confirmed"
    );

    Ok(confirmed)
}

// ---------------------------------------------------------------------------
// Day-worker bookings
// ---------------------------------------------------------------------------

/// Book a day-worker onto a vacancy mark.
///
/// The work day's status is left unchanged.
pub async fn schedule_day_worker_booking(
    pool: &DbPool,
    vacancy_mark_id: DbId,
    input: &CreateBookingRequest,
    actor: DbId,
) -> AppResult<DayWorkerBooking> {
    // A mark's post never changes, so it can be read before locking.
    let post_id = VacancyMarkRepo::find_by_id(pool, vacancy_mark_id)
        .await?
        .ok_or_else(|| not_found("VacancyMark", vacancy_mark_id))?
        .post_id;

    let mut tx = pool.begin().await?;

    let post = PostRepo::find_for_update(&mut *tx, post_id)
        .await?
        .ok_or_else(|| not_found("Post", post_id))?;

    let day_worker = DayWorkerRepo::find_for_update(&mut *tx, input.day_worker_id)
        .await?
        .ok_or_else(|| not_found("DayWorker", input.day_worker_id))?;

    let mark = VacancyMarkRepo::find_for_update(&mut *tx, vacancy_mark_id)
        .await?
        .ok_or_else(|| not_found("VacancyMark", vacancy_mark_id))?;

    let live_bookings: Vec<LiveBooking> =
        BookingRepo::list_live_for_day_worker_on(&mut *tx, day_worker.id, mark.work_date)
            .await?
            .into_iter()
            .map(LiveBooking::from)
            .collect();
    let mark_booking = BookingRepo::find_live_for_mark(&mut *tx, mark.id).await?;

    let value_cents = plan_booking(&BookingRequest {
        day_worker_id: day_worker.id,
        day_worker_active: day_worker.is_active,
        work_date: mark.work_date,
        live_bookings: &live_bookings,
        mark_booking_id: mark_booking.map(|b| b.id),
        value_cents: input.value_cents,
        post_day_rate_cents: post.day_rate_cents,
    })?;

    let booking = BookingRepo::create(
        &mut *tx,
        &NewBooking {
            vacancy_mark_id: mark.id,
            day_worker_id: day_worker.id,
            work_date: mark.work_date,
            value_cents,
            booked_by: actor,
        },
    )
    .await
    .map_err(|e| {
        conflict_on_unique(e, |constraint| match constraint {
            "uq_day_worker_bookings_worker_date" => format!(
                "Duplicate booking for this date: day-worker {} is already booked on {}",
                day_worker.id, mark.work_date
            ),
            "uq_day_worker_bookings_mark" => "Vacancy is already covered by a booking".to_string(),
            other => format!("Booking conflicts with {other}"),
        })
    })?;

    tx.commit().await?;

    tracing::info!(
        booking_id = booking.id,
        vacancy_mark_id,
        post_id = post.id,
        day_worker_id = day_worker.id,
        work_date = %mark.work_date,
        value_cents,
        actor,
        "Day-worker booked"
    );

    Ok(booking)
}

/// Move a booking along its pipeline, or cancel/reject it.
pub async fn transition_booking(
    pool: &DbPool,
    booking_id: DbId,
    target: BookingStatus,
    actor: DbId,
) -> AppResult<DayWorkerBooking> {
    let mut tx = pool.begin().await?;

    let booking = BookingRepo::find_for_update(&mut *tx, booking_id)
        .await?
        .ok_or_else(|| not_found("DayWorkerBooking", booking_id))?;
    let current = booking.parsed_status().map_err(CoreError::Internal)?;
    current.validate_transition(target)?;

    let updated = BookingRepo::update_status(&mut *tx, booking_id, target).await?;

    tx.commit().await?;

    tracing::info!(
        booking_id,
        from = %current,
        to = %target,
        actor,
        "Booking transitioned"
    );

    Ok(updated)
}

// ---------------------------------------------------------------------------
// Post status
// ---------------------------------------------------------------------------

/// Recompute a post's derived status on demand.
pub async fn refresh_post_status(pool: &DbPool, post_id: DbId, today: Day) -> AppResult<Post> {
    let mut tx = pool.begin().await?;

    PostRepo::refresh_status(&mut *tx, post_id, today)
        .await?
        .ok_or_else(|| not_found("Post", post_id))?;
    let post = PostRepo::find_for_update(&mut *tx, post_id)
        .await?
        .ok_or_else(|| not_found("Post", post_id))?;

    tx.commit().await?;

    Ok(post)
}
