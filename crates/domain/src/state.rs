//! Explicit cleaning state derived from the remote capability flags.
//!
//! The cloud reports raw capability booleans (`can_pause`, `can_resume`,
//! `can_start`, `can_go_to_base`) whose combinations are not documented.
//! Instead of branching on those booleans all over the sequencer, the
//! combinations collapse into one enumerated state via a fixed priority
//! table.

use serde::{Deserialize, Serialize};

use crate::robot::RobotState;

/// High-level activity of a robot, derived from its capability flags.
///
/// Derivation table, first match wins:
///
/// | flags | state |
/// |---|---|
/// | `can_pause` | [`Cleaning`](Self::Cleaning) |
/// | `can_resume` | [`Paused`](Self::Paused) |
/// | `is_docked` | [`Docked`](Self::Docked) |
/// | `can_start` | [`Idle`](Self::Idle) |
/// | none of the above | [`Docking`](Self::Docking) |
///
/// The fall-through row covers a robot in transit: nothing can be
/// started, paused, or resumed, and it has not reached the dock yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningState {
    /// Off the dock, not moving, ready to start.
    Idle,
    /// Actively cleaning (whole house, a region, or a spot).
    Cleaning,
    /// A cleaning run is suspended and can be resumed.
    Paused,
    /// On its way back to the base.
    Docking,
    /// Sitting on the base.
    Docked,
}

impl CleaningState {
    /// Derive the state from a snapshot of the capability flags.
    #[must_use]
    pub fn derive(state: &RobotState) -> Self {
        if state.can_pause {
            Self::Cleaning
        } else if state.can_resume {
            Self::Paused
        } else if state.is_docked {
            Self::Docked
        } else if state.can_start {
            Self::Idle
        } else {
            Self::Docking
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(
        can_pause: bool,
        can_resume: bool,
        can_start: bool,
        is_docked: bool,
    ) -> RobotState {
        RobotState {
            can_pause,
            can_resume,
            can_start,
            is_docked,
            ..RobotState::default()
        }
    }

    #[test]
    fn should_derive_cleaning_when_pause_is_possible() {
        assert_eq!(
            CleaningState::derive(&state(true, false, false, false)),
            CleaningState::Cleaning
        );
    }

    #[test]
    fn should_derive_paused_when_resume_is_possible() {
        assert_eq!(
            CleaningState::derive(&state(false, true, false, false)),
            CleaningState::Paused
        );
    }

    #[test]
    fn should_derive_docked_when_on_base() {
        assert_eq!(
            CleaningState::derive(&state(false, false, true, true)),
            CleaningState::Docked
        );
    }

    #[test]
    fn should_derive_idle_when_off_base_and_startable() {
        assert_eq!(
            CleaningState::derive(&state(false, false, true, false)),
            CleaningState::Idle
        );
    }

    #[test]
    fn should_derive_docking_when_nothing_is_possible() {
        assert_eq!(
            CleaningState::derive(&state(false, false, false, false)),
            CleaningState::Docking
        );
    }

    #[test]
    fn should_prefer_cleaning_over_docked_when_flags_conflict() {
        // The cloud occasionally reports stale dock flags mid-run; the
        // pause capability is authoritative.
        assert_eq!(
            CleaningState::derive(&state(true, false, false, true)),
            CleaningState::Cleaning
        );
    }

    #[test]
    fn should_prefer_paused_over_idle_when_flags_conflict() {
        assert_eq!(
            CleaningState::derive(&state(false, true, true, false)),
            CleaningState::Paused
        );
    }
}
