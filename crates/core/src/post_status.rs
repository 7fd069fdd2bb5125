//! Derived post status.
//!
//! A post's status is recomputed from its staffing counts whenever coverage
//! changes. Only `inactive` is set by hand, and it is never overwritten.

crate::define_text_status! {
    /// Lifecycle status of a staffing post.
    PostStatus {
        Vacant => "vacant",
        OccupationScheduled => "occupation_scheduled",
        Occupied => "occupied",
        TemporarilyVacant => "temporarily_vacant",
        Inactive => "inactive",
    }
}

impl PostStatus {
    /// Manually set states that derivation must leave alone.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Inactive)
    }
}

/// Inputs for [`derive_post_status`], loaded by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostCoverage {
    pub current: PostStatus,
    /// Adjusted headcount (see [`crate::headcount::adjusted_headcount`]).
    pub required: u32,
    /// Active collaborators currently linked to the post.
    pub active_collaborators: u32,
    /// Scheduled (not yet effective) movements that link someone to the post.
    pub pending_links: u32,
    /// Whether any of the post's work days for today is temporarily vacant.
    pub temporarily_vacant_today: bool,
}

/// Compute the status a post should carry given its coverage.
pub fn derive_post_status(coverage: &PostCoverage) -> PostStatus {
    if coverage.current.is_terminal() {
        return coverage.current;
    }

    if coverage.active_collaborators >= coverage.required {
        if coverage.temporarily_vacant_today {
            PostStatus::TemporarilyVacant
        } else {
            PostStatus::Occupied
        }
    } else if coverage.pending_links > 0 {
        PostStatus::OccupationScheduled
    } else {
        PostStatus::Vacant
    }
}
