//! Repository for the `posts` table.

use chrono::NaiveDate;
use coverage_core::headcount::adjusted_headcount;
use coverage_core::post_status::{derive_post_status, PostCoverage, PostStatus};
use coverage_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::post::{CreatePost, Post, PostStaffingRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, unit_id, code, name, function, schedule_pattern, \
    planned_headcount, day_rate_cents, status, created_at, updated_at";

/// Provides CRUD operations and status derivation for posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a new post, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePost) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts
                (unit_id, code, name, function, schedule_pattern, planned_headcount, day_rate_cents)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(input.unit_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.function)
            .bind(&input.schedule_pattern)
            .bind(input.planned_headcount)
            .bind(input.day_rate_cents)
            .fetch_one(pool)
            .await
    }

    /// Find a post by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a post and lock its row for the rest of the transaction.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Lock several posts, lowest id first. Duplicates are locked once.
    pub async fn lock_in_order(
        conn: &mut PgConnection,
        post_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut ids = post_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        for id in ids {
            sqlx::query("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
                .bind(id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// Manually set a post's status (e.g. deactivate it).
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: PostStatus,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Every post with its count of active linked collaborators, by code.
    pub async fn list_staffing(pool: &PgPool) -> Result<Vec<PostStaffingRow>, sqlx::Error> {
        sqlx::query_as::<_, PostStaffingRow>(
            "SELECT p.id, p.code, p.name, p.schedule_pattern, p.planned_headcount, p.status,
                    COUNT(c.id) AS active_collaborators
             FROM posts p
             LEFT JOIN collaborators c ON c.post_id = p.id AND c.is_active
             GROUP BY p.id
             ORDER BY p.code",
        )
        .fetch_all(pool)
        .await
    }

    /// Recompute the derived status of a post and persist it if it changed.
    ///
    /// Must run inside the transaction that changed the post's coverage so
    /// the stored status never lags a committed write. Returns the post's
    /// status after the update, or `None` if the post does not exist.
    pub async fn refresh_status(
        conn: &mut PgConnection,
        post_id: DbId,
        today: NaiveDate,
    ) -> Result<Option<PostStatus>, sqlx::Error> {
        let Some(post) = Self::find_for_update(&mut *conn, post_id).await? else {
            return Ok(None);
        };
        let current = PostStatus::from_str_value(&post.status)
            .map_err(|e| sqlx::Error::Decode(e.into()))?;

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM collaborators WHERE post_id = $1 AND is_active",
        )
        .bind(post_id)
        .fetch_one(&mut *conn)
        .await?;

        let pending_links: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM scheduled_movements
             WHERE destination_post_id = $1 AND status = 'scheduled'",
        )
        .bind(post_id)
        .fetch_one(&mut *conn)
        .await?;

        let temporarily_vacant_today: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM work_days
                WHERE post_id = $1 AND work_date = $2 AND status = 'temporarily_vacant'
             )",
        )
        .bind(post_id)
        .bind(today)
        .fetch_one(&mut *conn)
        .await?;

        let derived = derive_post_status(&PostCoverage {
            current,
            required: adjusted_headcount(&post.schedule_pattern, post.planned_headcount),
            active_collaborators: u32::try_from(active).unwrap_or(u32::MAX),
            pending_links: u32::try_from(pending_links).unwrap_or(u32::MAX),
            temporarily_vacant_today,
        });

        if derived != current {
            sqlx::query("UPDATE posts SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(post_id)
                .bind(derived.as_str())
                .execute(&mut *conn)
                .await?;
            tracing::debug!(
                post_id,
                from = %current,
                to = %derived,
                "Post status recomputed"
            );
        }

        Ok(Some(derived))
    }
}
