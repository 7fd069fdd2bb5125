use coverage_core::conflict::CollaboratorSnapshot;
use coverage_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `collaborators` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collaborator {
    pub id: DbId,
    pub name: String,
    /// Current post link; `None` for reserve collaborators.
    pub post_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Collaborator {
    pub fn snapshot(&self) -> CollaboratorSnapshot {
        CollaboratorSnapshot {
            id: self.id,
            post_id: self.post_id,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollaborator {
    pub name: String,
    pub post_id: Option<DbId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
