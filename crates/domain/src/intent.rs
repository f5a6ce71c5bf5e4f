//! Intents — transient control requests against one robot.
//!
//! An intent is created per incoming control request and consumed by a
//! single sequencer decision. It never outlives that decision; the only
//! thing that survives is the deferred room slot the sequencer may arm.

use serde::{Deserialize, Serialize};

use crate::id::BoundaryId;
use crate::robot::{NavigationMode, RobotState};

/// A requested action against one robot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Begin or resume cleaning; region-scoped when `region` is set.
    Start { region: Option<BoundaryId> },
    /// Suspend the current cleaning run.
    Stop,
    /// Return to the charging base.
    GoToDock,
    EnableSchedule,
    DisableSchedule,
    /// Make the robot chirp so it can be located.
    FindMe,
    /// Clean a spot around the robot's current position.
    SpotClean { spot: SpotParams },
}

impl Intent {
    /// Short operation name for log lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Stop => "stop",
            Self::GoToDock => "go_to_dock",
            Self::EnableSchedule => "enable_schedule",
            Self::DisableSchedule => "disable_schedule",
            Self::FindMe => "find_me",
            Self::SpotClean { .. } => "spot_clean",
        }
    }
}

/// Spot-clean parameters as exposed on the toggle surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotParams {
    /// Spot width in centimeters.
    pub width: u16,
    /// Spot height in centimeters.
    pub height: u16,
    /// Run the spot twice.
    pub repeat: bool,
}

/// Options attached to every clean-start call, read from the main
/// representation's toggles at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanOptions {
    pub eco: bool,
    pub navigation: NavigationMode,
    pub no_go_lines: bool,
}

impl CleanOptions {
    /// Capture the current toggle values from a snapshot.
    #[must_use]
    pub fn from_snapshot(state: &RobotState) -> Self {
        Self {
            eco: state.eco,
            navigation: state.navigation_mode,
            no_go_lines: state.no_go_lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_capture_toggle_values_from_snapshot() {
        let state = RobotState {
            eco: true,
            navigation_mode: NavigationMode::ExtraCare,
            no_go_lines: true,
            ..RobotState::default()
        };

        let options = CleanOptions::from_snapshot(&state);
        assert!(options.eco);
        assert_eq!(options.navigation, NavigationMode::ExtraCare);
        assert!(options.no_go_lines);
    }

    #[test]
    fn should_name_intents_for_logging() {
        let intent = Intent::Start {
            region: Some(BoundaryId::new("b-1")),
        };
        assert_eq!(intent.name(), "start");
        assert_eq!(Intent::GoToDock.name(), "go_to_dock");
    }
}
