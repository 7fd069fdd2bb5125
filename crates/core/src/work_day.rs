//! Work-day coverage status and its state machine.
//!
//! One work day exists per (post, calendar date). The status tracks whether
//! the day is staffed, uncovered, or waiting for a scheduled movement.

use crate::error::CoreError;

crate::define_text_status! {
    /// Coverage status of a single post-day.
    WorkDayStatus {
        /// Staffed as planned.
        Active => "active",
        /// Attendance for the day has been verified.
        PresenceConfirmed => "presence_confirmed",
        /// The incumbent is away (absence, leave, suspension).
        TemporarilyVacant => "temporarily_vacant",
        /// The post has no incumbent for the day.
        Vacant => "vacant",
        /// A collaborator movement will cover the day once it becomes effective.
        OccupationScheduled => "occupation_scheduled",
    }
}

impl WorkDayStatus {
    /// Statuses that mean nobody covers the day yet.
    pub fn is_vacant(self) -> bool {
        matches!(self, Self::TemporarilyVacant | Self::Vacant)
    }

    /// Returns the statuses reachable from `self`.
    pub fn valid_transitions(self) -> &'static [WorkDayStatus] {
        match self {
            Self::Active => &[Self::TemporarilyVacant, Self::Vacant, Self::PresenceConfirmed],
            Self::TemporarilyVacant => &[Self::Active, Self::Vacant, Self::OccupationScheduled],
            Self::Vacant => &[Self::Active, Self::TemporarilyVacant, Self::OccupationScheduled],
            Self::OccupationScheduled => &[Self::Active, Self::Vacant, Self::TemporarilyVacant],
            Self::PresenceConfirmed => &[],
        }
    }

    /// Check whether a transition from `self` to `to` is valid.
    pub fn can_transition(self, to: WorkDayStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Validate a transition, returning a conflict for invalid ones.
    pub fn validate_transition(self, to: WorkDayStatus) -> Result<(), CoreError> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Work day cannot move from {self} to {to}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::WorkDayStatus::*;
    use super::*;

    #[test]
    fn absence_and_restoration() {
        assert!(Active.can_transition(TemporarilyVacant));
        assert!(Active.can_transition(Vacant));
        assert!(TemporarilyVacant.can_transition(Active));
        assert!(Vacant.can_transition(Active));
    }

    #[test]
    fn vacant_days_can_be_scheduled() {
        assert!(Vacant.can_transition(OccupationScheduled));
        assert!(TemporarilyVacant.can_transition(OccupationScheduled));
        assert!(!Active.can_transition(OccupationScheduled));
    }

    #[test]
    fn scheduled_day_becomes_active_or_reverts() {
        assert!(OccupationScheduled.can_transition(Active));
        assert!(OccupationScheduled.can_transition(Vacant));
        assert!(OccupationScheduled.can_transition(TemporarilyVacant));
    }

    #[test]
    fn presence_confirmation_only_from_active() {
        assert!(Active.can_transition(PresenceConfirmed));
        assert!(!Vacant.can_transition(PresenceConfirmed));
        assert!(!OccupationScheduled.can_transition(PresenceConfirmed));
        assert!(PresenceConfirmed.valid_transitions().is_empty());
    }

    #[test]
    fn invalid_transition_is_a_conflict() {
        let err = PresenceConfirmed.validate_transition(Vacant).unwrap_err();
        assert_matches!(&err, CoreError::Conflict(msg) if msg.contains("presence_confirmed"));
    }

    #[test]
    fn vacant_statuses() {
        assert!(Vacant.is_vacant());
        assert!(TemporarilyVacant.is_vacant());
        assert!(!OccupationScheduled.is_vacant());
        assert!(!Active.is_vacant());
    }
}
