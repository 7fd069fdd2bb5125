//! Repository-level tests against a real Postgres database.
//!
//! Focus on what the SQL itself guarantees: partial unique indexes, the
//! uncovered-day query, derived post status and due-movement execution.

use std::time::Duration;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use coverage_core::booking::BookingStatus;
use coverage_core::post_status::PostStatus;
use coverage_core::reason::VacancyReason;
use coverage_core::types::DbId;
use coverage_core::work_day::WorkDayStatus;
use coverage_db::models::booking::NewBooking;
use coverage_db::models::collaborator::CreateCollaborator;
use coverage_db::models::day_worker::CreateDayWorker;
use coverage_db::models::movement::NewMovement;
use coverage_db::models::post::CreatePost;
use coverage_db::repositories::{
    BookingRepo, CollaboratorRepo, DayWorkerRepo, MovementRepo, PostRepo, VacancyMarkRepo,
    WorkDayRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

async fn seed_post(pool: &PgPool, code: &str, pattern: &str, planned: i32) -> DbId {
    PostRepo::create(
        pool,
        &CreatePost {
            unit_id: None,
            code: code.to_string(),
            name: format!("Post {code}"),
            function: Some("Guard".to_string()),
            schedule_pattern: pattern.to_string(),
            planned_headcount: planned,
            day_rate_cents: Some(15_000),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_collaborator(pool: &PgPool, post_id: Option<DbId>) -> DbId {
    CollaboratorRepo::create(
        pool,
        &CreateCollaborator {
            name: "Ana".to_string(),
            post_id,
            is_active: true,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_day_worker(pool: &PgPool) -> DbId {
    DayWorkerRepo::create(
        pool,
        &CreateDayWorker {
            name: "Bruno".to_string(),
            is_active: true,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_mark(pool: &PgPool, post_id: DbId, date: &str) -> DbId {
    let mut conn = pool.acquire().await.unwrap();
    VacancyMarkRepo::upsert(&mut conn, post_id, day(date), VacancyReason::Vacation, None, 1)
        .await
        .unwrap()
        .id
}

async fn book(
    pool: &PgPool,
    mark_id: DbId,
    day_worker_id: DbId,
    date: &str,
) -> Result<DbId, sqlx::Error> {
    let mut conn = pool.acquire().await.unwrap();
    BookingRepo::create(
        &mut conn,
        &NewBooking {
            vacancy_mark_id: mark_id,
            day_worker_id,
            work_date: day(date),
            value_cents: 15_000,
            booked_by: 1,
        },
    )
    .await
    .map(|b| b.id)
}

fn unique_constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            db.constraint().map(str::to_string)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Unique indexes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn day_worker_cannot_hold_two_live_bookings_on_one_date(pool: PgPool) {
    let post_a = seed_post(&pool, "A-01", "12x36", 1).await;
    let post_b = seed_post(&pool, "B-01", "12x36", 1).await;
    let mark_a = seed_mark(&pool, post_a, "2024-05-01").await;
    let mark_b = seed_mark(&pool, post_b, "2024-05-01").await;
    let worker = seed_day_worker(&pool).await;

    let first = book(&pool, mark_a, worker, "2024-05-01").await.unwrap();
    let err = book(&pool, mark_b, worker, "2024-05-01").await.unwrap_err();
    assert_eq!(
        unique_constraint(&err).as_deref(),
        Some("uq_day_worker_bookings_worker_date")
    );

    // Cancelling the first booking releases the date.
    let mut conn = pool.acquire().await.unwrap();
    BookingRepo::update_status(&mut conn, first, BookingStatus::Cancelled)
        .await
        .unwrap();
    assert!(book(&pool, mark_b, worker, "2024-05-01").await.is_ok());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_holds_at_most_one_live_booking(pool: PgPool) {
    let post = seed_post(&pool, "A-01", "12x36", 1).await;
    let mark = seed_mark(&pool, post, "2024-05-01").await;
    let first = seed_day_worker(&pool).await;
    let second = seed_day_worker(&pool).await;

    book(&pool, mark, first, "2024-05-01").await.unwrap();
    let err = book(&pool, mark, second, "2024-05-01").await.unwrap_err();
    assert_eq!(unique_constraint(&err).as_deref(), Some("uq_day_worker_bookings_mark"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn collaborator_holds_at_most_one_pending_movement(pool: PgPool) {
    let post_a = seed_post(&pool, "A-01", "5x2", 1).await;
    let post_b = seed_post(&pool, "B-01", "5x2", 1).await;
    let collaborator = seed_collaborator(&pool, None).await;
    let mut conn = pool.acquire().await.unwrap();

    let movement = |post_id, date: &str| NewMovement {
        collaborator_id: collaborator,
        origin_post_id: None,
        destination_post_id: Some(post_id),
        effective_date: day(date),
        work_day_prior_status: Some(WorkDayStatus::Vacant),
        scheduled_by: 1,
    };

    MovementRepo::create(&mut conn, &movement(post_a, "2024-06-01"))
        .await
        .unwrap();
    let err = MovementRepo::create(&mut conn, &movement(post_b, "2024-07-01"))
        .await
        .unwrap_err();
    assert_eq!(
        unique_constraint(&err).as_deref(),
        Some("uq_scheduled_movements_pending_collaborator")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn vacancy_mark_upsert_keeps_one_row_per_post_day(pool: PgPool) {
    let post = seed_post(&pool, "A-01", "12x36", 1).await;
    let mut conn = pool.acquire().await.unwrap();

    let first = VacancyMarkRepo::upsert(
        &mut conn,
        post,
        day("2024-05-10"),
        VacancyReason::Vacation,
        None,
        1,
    )
    .await
    .unwrap();
    let second = VacancyMarkRepo::upsert(
        &mut conn,
        post,
        day("2024-05-10"),
        VacancyReason::Suspension,
        None,
        2,
    )
    .await
    .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.reason, "suspension");
    assert_eq!(second.marked_by, Some(2));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeating_an_identical_mark_leaves_the_rows_untouched(pool: PgPool) {
    let post = seed_post(&pool, "A-01", "12x36", 1).await;
    let absent = seed_collaborator(&pool, Some(post)).await;
    let date = day("2024-05-10");
    let mut conn = pool.acquire().await.unwrap();

    let first_mark =
        VacancyMarkRepo::upsert(&mut conn, post, date, VacancyReason::Vacation, Some(absent), 1)
            .await
            .unwrap();
    let first_day = WorkDayRepo::upsert_vacancy(
        &mut conn,
        post,
        date,
        WorkDayStatus::TemporarilyVacant,
        VacancyReason::Vacation,
    )
    .await
    .unwrap();

    // Another actor repeats the same mark.
    let second_mark =
        VacancyMarkRepo::upsert(&mut conn, post, date, VacancyReason::Vacation, Some(absent), 2)
            .await
            .unwrap();
    let second_day = WorkDayRepo::upsert_vacancy(
        &mut conn,
        post,
        date,
        WorkDayStatus::TemporarilyVacant,
        VacancyReason::Vacation,
    )
    .await
    .unwrap();

    assert_eq!(first_mark, second_mark);
    assert_eq!(second_mark.marked_by, Some(1));
    assert_eq!(first_day.updated_at, second_day.updated_at);
    assert_eq!(first_day.id, second_day.id);
}

// ---------------------------------------------------------------------------
// Uncovered days
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn uncovered_days_are_filtered_and_ordered(pool: PgPool) {
    let post_b = seed_post(&pool, "B-02", "12x36", 1).await;
    let post_a = seed_post(&pool, "A-01", "12x36", 1).await;

    seed_mark(&pool, post_a, "2024-04-30").await; // before `from`
    seed_mark(&pool, post_b, "2024-05-02").await;
    seed_mark(&pool, post_b, "2024-05-01").await;
    seed_mark(&pool, post_a, "2024-05-01").await;
    let covered = seed_mark(&pool, post_a, "2024-05-03").await;

    let worker = seed_day_worker(&pool).await;
    book(&pool, covered, worker, "2024-05-03").await.unwrap();

    let days = VacancyMarkRepo::list_uncovered_from(&pool, day("2024-05-01"))
        .await
        .unwrap();
    let got: Vec<_> = days
        .iter()
        .map(|d| (d.work_date.to_string(), d.post_code.as_str()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("2024-05-01".to_string(), "A-01"),
            ("2024-05-01".to_string(), "B-02"),
            ("2024-05-02".to_string(), "B-02"),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejected_booking_uncovers_the_day_again(pool: PgPool) {
    let post = seed_post(&pool, "A-01", "12x36", 1).await;
    let mark = seed_mark(&pool, post, "2024-05-01").await;
    let worker = seed_day_worker(&pool).await;
    let booking = book(&pool, mark, worker, "2024-05-01").await.unwrap();

    let before = VacancyMarkRepo::list_uncovered_from(&pool, day("2024-05-01"))
        .await
        .unwrap();
    assert!(before.is_empty());

    let mut conn = pool.acquire().await.unwrap();
    BookingRepo::update_status(&mut conn, booking, BookingStatus::Rejected)
        .await
        .unwrap();

    let after = VacancyMarkRepo::list_uncovered_from(&pool, day("2024-05-01"))
        .await
        .unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id, mark);
}

// ---------------------------------------------------------------------------
// Derived post status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_status_follows_staffing(pool: PgPool) {
    let post = seed_post(&pool, "A-01", "12x36", 1).await;
    let today = day("2024-05-10");
    let mut conn = pool.acquire().await.unwrap();

    // Requires 2; one collaborator is not enough.
    seed_collaborator(&pool, Some(post)).await;
    let status = PostRepo::refresh_status(&mut conn, post, today).await.unwrap();
    assert_eq!(status, Some(PostStatus::Vacant));

    seed_collaborator(&pool, Some(post)).await;
    let status = PostRepo::refresh_status(&mut conn, post, today).await.unwrap();
    assert_eq!(status, Some(PostStatus::Occupied));

    WorkDayRepo::upsert_vacancy(
        &mut conn,
        post,
        today,
        WorkDayStatus::TemporarilyVacant,
        VacancyReason::Vacation,
    )
    .await
    .unwrap();
    let status = PostRepo::refresh_status(&mut conn, post, today).await.unwrap();
    assert_eq!(status, Some(PostStatus::TemporarilyVacant));

    let stored = PostRepo::find_by_id(&pool, post).await.unwrap().unwrap();
    assert_eq!(stored.status, "temporarily_vacant");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inactive_post_is_never_recomputed(pool: PgPool) {
    let post = seed_post(&pool, "A-01", "5x2", 1).await;
    seed_collaborator(&pool, Some(post)).await;
    PostRepo::set_status(&pool, post, PostStatus::Inactive)
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let status = PostRepo::refresh_status(&mut conn, post, day("2024-05-10"))
        .await
        .unwrap();
    assert_eq!(status, Some(PostStatus::Inactive));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_status_of_unknown_post_is_none(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let status = PostRepo::refresh_status(&mut conn, 999_999, day("2024-05-10"))
        .await
        .unwrap();
    assert_matches!(status, None);
}

// ---------------------------------------------------------------------------
// Due movements
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn apply_due_links_collaborator_and_staffs_the_day(pool: PgPool) {
    let origin = seed_post(&pool, "A-01", "5x2", 1).await;
    let destination = seed_post(&pool, "B-01", "5x2", 1).await;
    let collaborator = seed_collaborator(&pool, Some(origin)).await;
    let other = seed_collaborator(&pool, None).await;

    let mut conn = pool.acquire().await.unwrap();
    let due = MovementRepo::create(
        &mut conn,
        &NewMovement {
            collaborator_id: collaborator,
            origin_post_id: Some(origin),
            destination_post_id: Some(destination),
            effective_date: day("2024-06-01"),
            work_day_prior_status: Some(WorkDayStatus::Vacant),
            scheduled_by: 1,
        },
    )
    .await
    .unwrap();
    WorkDayRepo::upsert_status(
        &mut conn,
        destination,
        day("2024-06-01"),
        WorkDayStatus::OccupationScheduled,
    )
    .await
    .unwrap();
    let future = MovementRepo::create(
        &mut conn,
        &NewMovement {
            collaborator_id: other,
            origin_post_id: None,
            destination_post_id: Some(origin),
            effective_date: day("2024-06-10"),
            work_day_prior_status: None,
            scheduled_by: 1,
        },
    )
    .await
    .unwrap();
    drop(conn);

    let applied = MovementRepo::apply_due(&pool, day("2024-06-01")).await.unwrap();
    assert_eq!(applied, 1);

    let moved = CollaboratorRepo::find_by_id(&pool, collaborator)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(moved.post_id, Some(destination));

    let work_day = WorkDayRepo::find_slot(&pool, destination, day("2024-06-01"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(work_day.status, "active");
    assert_eq!(work_day.collaborator_id, Some(collaborator));
    assert_eq!(work_day.vacancy_reason, None);

    let executed = MovementRepo::find_by_id(&pool, due.id).await.unwrap().unwrap();
    assert_eq!(executed.status, "effective");
    assert!(executed.executed_at.is_some());

    let untouched = MovementRepo::find_by_id(&pool, future.id).await.unwrap().unwrap();
    assert_eq!(untouched.status, "scheduled");

    let destination_post = PostRepo::find_by_id(&pool, destination).await.unwrap().unwrap();
    assert_eq!(destination_post.status, "occupied");
    // Origin lost its only collaborator but still has the future link pending.
    let origin_post = PostRepo::find_by_id(&pool, origin).await.unwrap().unwrap();
    assert_eq!(origin_post.status, "occupation_scheduled");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn apply_due_is_idempotent(pool: PgPool) {
    let origin = seed_post(&pool, "A-01", "5x2", 1).await;
    let collaborator = seed_collaborator(&pool, Some(origin)).await;

    let mut conn = pool.acquire().await.unwrap();
    MovementRepo::create(
        &mut conn,
        &NewMovement {
            collaborator_id: collaborator,
            origin_post_id: Some(origin),
            destination_post_id: None,
            effective_date: day("2024-06-01"),
            work_day_prior_status: None,
            scheduled_by: 1,
        },
    )
    .await
    .unwrap();
    drop(conn);

    let today = day("2024-06-05");
    assert_eq!(MovementRepo::apply_due(&pool, today).await.unwrap(), 1);
    assert_eq!(MovementRepo::apply_due(&pool, today).await.unwrap(), 0);

    let unlinked = CollaboratorRepo::find_by_id(&pool, collaborator)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unlinked.post_id, None);
    assert!(MovementRepo::list_pending(&pool).await.unwrap().is_empty());
}

async fn seed_unlink(pool: &PgPool, collaborator: DbId, origin: DbId, date: &str) -> DbId {
    let mut conn = pool.acquire().await.unwrap();
    MovementRepo::create(
        &mut conn,
        &NewMovement {
            collaborator_id: collaborator,
            origin_post_id: Some(origin),
            destination_post_id: None,
            effective_date: day(date),
            work_day_prior_status: None,
            scheduled_by: 1,
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn apply_due_waits_on_posts_before_locking_the_collaborator(pool: PgPool) {
    let origin = seed_post(&pool, "A-01", "5x2", 1).await;
    let collaborator = seed_collaborator(&pool, Some(origin)).await;
    let movement = seed_unlink(&pool, collaborator, origin, "2024-06-01").await;

    // Hold the post the way a request transaction does, before anything else.
    let mut tx = pool.begin().await.unwrap();
    PostRepo::find_for_update(&mut *tx, origin).await.unwrap();

    let worker = tokio::spawn({
        let pool = pool.clone();
        async move { MovementRepo::apply_due(&pool, day("2024-06-05")).await }
    });
    tokio::time::sleep(Duration::from_millis(300)).await;

    // The worker must not be holding the collaborator or the movement yet.
    CollaboratorRepo::find_for_update(&mut *tx, collaborator)
        .await
        .unwrap();
    MovementRepo::find_for_update(&mut *tx, movement).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(worker.await.unwrap().unwrap(), 1);
    let unlinked = CollaboratorRepo::find_by_id(&pool, collaborator)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unlinked.post_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn apply_due_skips_a_movement_held_elsewhere(pool: PgPool) {
    let origin = seed_post(&pool, "A-01", "5x2", 1).await;
    let collaborator = seed_collaborator(&pool, Some(origin)).await;
    let movement = seed_unlink(&pool, collaborator, origin, "2024-06-01").await;

    let mut tx = pool.begin().await.unwrap();
    MovementRepo::find_for_update(&mut *tx, movement).await.unwrap();

    assert_eq!(MovementRepo::apply_due(&pool, day("2024-06-05")).await.unwrap(), 0);

    tx.rollback().await.unwrap();
    assert_eq!(MovementRepo::apply_due(&pool, day("2024-06-05")).await.unwrap(), 1);
}
