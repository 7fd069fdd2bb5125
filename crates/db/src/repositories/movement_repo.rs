//! Repository for the `scheduled_movements` table.
//!
//! Besides CRUD, this module executes due movements. Each one is applied in
//! its own transaction: its posts, collaborator and work day are locked
//! first, then the movement is claimed with `FOR UPDATE SKIP LOCKED`, so
//! several workers can run at once and a failure only rolls back the
//! movement it happened on.

use chrono::NaiveDate;
use coverage_core::movement::{apply_movement, MovementStatus};
use coverage_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::movement::{NewMovement, ScheduledMovement};
use crate::repositories::{CollaboratorRepo, PostRepo, WorkDayRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, collaborator_id, origin_post_id, destination_post_id, effective_date, \
    status, work_day_prior_status, scheduled_by, cancelled_by, cancelled_at, executed_at, \
    created_at, updated_at";

pub struct MovementRepo;

impl MovementRepo {
    /// Insert a movement in `scheduled` status.
    pub async fn create(
        conn: &mut PgConnection,
        input: &NewMovement,
    ) -> Result<ScheduledMovement, sqlx::Error> {
        let query = format!(
            "INSERT INTO scheduled_movements
                (collaborator_id, origin_post_id, destination_post_id, effective_date,
                 status, work_day_prior_status, scheduled_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduledMovement>(&query)
            .bind(input.collaborator_id)
            .bind(input.origin_post_id)
            .bind(input.destination_post_id)
            .bind(input.effective_date)
            .bind(MovementStatus::Scheduled.as_str())
            .bind(input.work_day_prior_status.map(|s| s.as_str()))
            .bind(input.scheduled_by)
            .fetch_one(conn)
            .await
    }

    /// Find a movement by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ScheduledMovement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scheduled_movements WHERE id = $1");
        sqlx::query_as::<_, ScheduledMovement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a movement by ID and lock it.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<ScheduledMovement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scheduled_movements WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, ScheduledMovement>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Scheduled movements of a collaborator, or targeting (post, date).
    pub async fn list_pending_for(
        conn: &mut PgConnection,
        collaborator_id: DbId,
        post_id: DbId,
        effective_date: NaiveDate,
    ) -> Result<Vec<ScheduledMovement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scheduled_movements
             WHERE status = 'scheduled'
               AND (collaborator_id = $1
                    OR (destination_post_id = $2 AND effective_date = $3))
             ORDER BY id"
        );
        sqlx::query_as::<_, ScheduledMovement>(&query)
            .bind(collaborator_id)
            .bind(post_id)
            .bind(effective_date)
            .fetch_all(conn)
            .await
    }

    /// Scheduled movements of one collaborator.
    pub async fn list_pending_for_collaborator(
        conn: &mut PgConnection,
        collaborator_id: DbId,
    ) -> Result<Vec<ScheduledMovement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scheduled_movements
             WHERE status = 'scheduled' AND collaborator_id = $1
             ORDER BY id"
        );
        sqlx::query_as::<_, ScheduledMovement>(&query)
            .bind(collaborator_id)
            .fetch_all(conn)
            .await
    }

    /// Every scheduled movement, soonest first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<ScheduledMovement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scheduled_movements
             WHERE status = 'scheduled'
             ORDER BY effective_date, id"
        );
        sqlx::query_as::<_, ScheduledMovement>(&query)
            .fetch_all(pool)
            .await
    }

    /// Set a movement to `cancelled`, recording who cancelled it.
    pub async fn mark_cancelled(
        conn: &mut PgConnection,
        id: DbId,
        cancelled_by: DbId,
    ) -> Result<ScheduledMovement, sqlx::Error> {
        let query = format!(
            "UPDATE scheduled_movements SET
                status = 'cancelled',
                cancelled_by = $2,
                cancelled_at = NOW(),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduledMovement>(&query)
            .bind(id)
            .bind(cancelled_by)
            .fetch_one(conn)
            .await
    }

    /// Scheduled movements due on or before `today`, oldest first. No locks.
    pub async fn list_due(
        pool: &PgPool,
        today: NaiveDate,
    ) -> Result<Vec<ScheduledMovement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scheduled_movements
             WHERE status = 'scheduled' AND effective_date <= $1
             ORDER BY effective_date, id"
        );
        sqlx::query_as::<_, ScheduledMovement>(&query)
            .bind(today)
            .fetch_all(pool)
            .await
    }

    /// Lock a due movement unless another transaction holds it.
    ///
    /// Returns `None` when the row is locked elsewhere or is no longer due.
    pub async fn claim_due(
        conn: &mut PgConnection,
        id: DbId,
        today: NaiveDate,
    ) -> Result<Option<ScheduledMovement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scheduled_movements
             WHERE id = $1 AND status = 'scheduled' AND effective_date <= $2
             FOR UPDATE SKIP LOCKED"
        );
        sqlx::query_as::<_, ScheduledMovement>(&query)
            .bind(id)
            .bind(today)
            .fetch_optional(conn)
            .await
    }

    /// Set a movement to `effective`.
    pub async fn mark_effective(conn: &mut PgConnection, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE scheduled_movements SET
                status = 'effective', executed_at = NOW(), updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Execute every movement whose effective date is on or before `today`.
    ///
    /// Returns how many movements were applied. Running it again without
    /// new due movements applies nothing. Movements held by a concurrent
    /// run are skipped and left to it.
    pub async fn apply_due(pool: &PgPool, today: NaiveDate) -> Result<usize, sqlx::Error> {
        let mut applied = 0;

        for candidate in Self::list_due(pool, today).await? {
            let mut tx = pool.begin().await?;

            // Posts and collaborator first, then the work day, then the movement.
            let posts: Vec<DbId> = [candidate.origin_post_id, candidate.destination_post_id]
                .into_iter()
                .flatten()
                .collect();
            PostRepo::lock_in_order(&mut *tx, &posts).await?;
            CollaboratorRepo::find_for_update(&mut *tx, candidate.collaborator_id).await?;
            if let Some(post_id) = candidate.destination_post_id {
                WorkDayRepo::find_slot_for_update(&mut *tx, post_id, candidate.effective_date)
                    .await?;
            }

            let Some(movement) = Self::claim_due(&mut *tx, candidate.id, today).await? else {
                tx.rollback().await?;
                continue;
            };

            let effect = apply_movement(movement.destination_post_id, movement.effective_date);

            CollaboratorRepo::set_post(&mut *tx, movement.collaborator_id, effect.new_post_id)
                .await?;
            if let Some((post_id, date)) = effect.staffed_slot {
                WorkDayRepo::staff_slot(&mut *tx, post_id, date, movement.collaborator_id).await?;
            }
            Self::mark_effective(&mut *tx, movement.id).await?;

            for post_id in posts {
                PostRepo::refresh_status(&mut *tx, post_id, today).await?;
            }

            tx.commit().await?;
            applied += 1;

            tracing::info!(
                movement_id = movement.id,
                collaborator_id = movement.collaborator_id,
                origin_post_id = ?movement.origin_post_id,
                destination_post_id = ?movement.destination_post_id,
                effective_date = %movement.effective_date,
                "Movement applied"
            );
        }

        Ok(applied)
    }
}
