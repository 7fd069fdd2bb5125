//! Repository for the `collaborators` table.

use coverage_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::collaborator::{Collaborator, CreateCollaborator};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, post_id, is_active, created_at, updated_at";

/// Reads collaborators and maintains their post link.
pub struct CollaboratorRepo;

impl CollaboratorRepo {
    /// Insert a new collaborator, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCollaborator,
    ) -> Result<Collaborator, sqlx::Error> {
        let query = format!(
            "INSERT INTO collaborators (name, post_id, is_active)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Collaborator>(&query)
            .bind(&input.name)
            .bind(input.post_id)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a collaborator by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Collaborator>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collaborators WHERE id = $1");
        sqlx::query_as::<_, Collaborator>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a collaborator and lock its row for the rest of the transaction.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Collaborator>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM collaborators WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Collaborator>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// The lowest-id active collaborator linked to a post, if any.
    pub async fn find_incumbent(
        conn: &mut PgConnection,
        post_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM collaborators
             WHERE post_id = $1 AND is_active
             ORDER BY id
             LIMIT 1",
        )
        .bind(post_id)
        .fetch_optional(conn)
        .await
    }

    /// Change a collaborator's post link (`None` moves them to the reserve).
    pub async fn set_post(
        conn: &mut PgConnection,
        id: DbId,
        post_id: Option<DbId>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE collaborators SET post_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(post_id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
