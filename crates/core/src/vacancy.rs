//! Understaffed-post computation.
//!
//! The caller loads every post with its count of active linked
//! collaborators; this module compares the count against the adjusted
//! headcount and reports the gap.

use serde::Serialize;

use crate::headcount::adjusted_headcount;
use crate::post_status::PostStatus;
use crate::types::DbId;

/// Staffing figures for one post, as loaded from the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostStaffing {
    pub post_id: DbId,
    pub code: String,
    pub name: String,
    pub schedule_pattern: String,
    pub planned_headcount: i32,
    pub status: PostStatus,
    pub active_collaborators: i64,
}

/// One understaffed post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VacancyRow {
    pub post_id: DbId,
    pub code: String,
    pub name: String,
    pub schedule_pattern: String,
    pub current_active: u32,
    pub required: u32,
    pub deficit: u32,
}

/// Missing collaborators, or `None` when the post is fully staffed.
pub fn deficit(required: u32, current_active: u32) -> Option<u32> {
    (current_active < required).then(|| required - current_active)
}

/// Posts whose active collaborators fall short of the adjusted headcount.
///
/// Inactive posts are skipped. The result is ordered by post code.
pub fn list_vacant_posts(posts: &[PostStaffing]) -> Vec<VacancyRow> {
    let mut rows: Vec<VacancyRow> = posts
        .iter()
        .filter(|p| !p.status.is_terminal())
        .filter_map(|p| {
            let required = adjusted_headcount(&p.schedule_pattern, p.planned_headcount);
            let current_active = u32::try_from(p.active_collaborators).unwrap_or(0);
            deficit(required, current_active).map(|deficit| VacancyRow {
                post_id: p.post_id,
                code: p.code.clone(),
                name: p.name.clone(),
                schedule_pattern: p.schedule_pattern.clone(),
                current_active,
                required,
                deficit,
            })
        })
        .collect();

    rows.sort_by(|a, b| a.code.cmp(&b.code).then(a.post_id.cmp(&b.post_id)));
    rows
}
