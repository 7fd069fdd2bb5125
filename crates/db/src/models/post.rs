//! Staffing post models.

use coverage_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub unit_id: Option<DbId>,
    pub code: String,
    pub name: String,
    pub function: Option<String>,
    pub schedule_pattern: String,
    pub planned_headcount: i32,
    pub day_rate_cents: Option<i64>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a post (directory import and tests).
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub unit_id: Option<DbId>,
    pub code: String,
    pub name: String,
    pub function: Option<String>,
    pub schedule_pattern: String,
    pub planned_headcount: i32,
    pub day_rate_cents: Option<i64>,
}

/// A post with its count of active linked collaborators.
#[derive(Debug, Clone, FromRow)]
pub struct PostStaffingRow {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub schedule_pattern: String,
    pub planned_headcount: i32,
    pub status: String,
    pub active_collaborators: i64,
}
