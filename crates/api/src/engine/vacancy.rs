//! Read-side queries: understaffed posts and uncovered days.

use chrono::NaiveDate;
use coverage_core::error::CoreError;
use coverage_core::post_status::PostStatus;
use coverage_core::vacancy::{list_vacant_posts as compute_vacant_posts, PostStaffing, VacancyRow};
use coverage_db::models::vacancy_mark::VacantDay;
use coverage_db::repositories::{PostRepo, VacancyMarkRepo};
use coverage_db::DbPool;

use crate::error::AppResult;

/// Posts whose active collaborators fall short of the adjusted headcount.
pub async fn list_vacant_posts(pool: &DbPool) -> AppResult<Vec<VacancyRow>> {
    let rows = PostRepo::list_staffing(pool).await?;

    let posts = rows
        .into_iter()
        .map(|row| {
            Ok(PostStaffing {
                status: PostStatus::from_str_value(&row.status).map_err(CoreError::Internal)?,
                post_id: row.id,
                code: row.code,
                name: row.name,
                schedule_pattern: row.schedule_pattern,
                planned_headcount: row.planned_headcount,
                active_collaborators: row.active_collaborators,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    Ok(compute_vacant_posts(&posts))
}

/// Vacancy marks from `from` onwards that no live booking covers.
pub async fn list_vacant_days(pool: &DbPool, from: NaiveDate) -> AppResult<Vec<VacantDay>> {
    Ok(VacancyMarkRepo::list_uncovered_from(pool, from).await?)
}
