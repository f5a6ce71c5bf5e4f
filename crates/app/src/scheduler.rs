//! Refresh scheduler — background polling policy and per-robot timers.
//!
//! After every refresh cycle the policy decides when the next cycle runs:
//! a fixed configured interval always reschedules; `auto` polls every
//! minute but only while the robot is actually cleaning; otherwise polling
//! stops until something external (a control request) triggers a refresh.
//!
//! Each robot has at most one outstanding timer. Arming a new one aborts
//! the previous handle, so a manual refresh interleaving with a scheduled
//! one can never fan out twice.

use tokio::sync::mpsc;
use tokio::time::Duration;

use robovac_domain::id::Serial;
use robovac_domain::robot::RobotState;
use robovac_domain::state::CleaningState;

use crate::registry::RobotUnit;

/// Lowest accepted fixed refresh interval, in seconds.
pub const REFRESH_FLOOR_SECS: u64 = 60;

/// Polling interval used by `auto` mode while the robot is cleaning.
pub const AUTO_REFRESH_SECS: u64 = 60;

/// Configured background-refresh behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Poll every minute, but only while cleaning.
    Auto,
    /// Poll unconditionally every `n` seconds.
    Every(u64),
    /// Never poll in the background.
    Off,
}

impl RefreshMode {
    /// Build a fixed-interval mode from a configured number of seconds.
    ///
    /// Zero disables background polling. Values below the floor are
    /// clamped up to it; negative values fall back to the floor. Both
    /// cases log a warning.
    #[must_use]
    pub fn from_secs(secs: i64) -> Self {
        match u64::try_from(secs) {
            Ok(0) => Self::Off,
            Ok(n) if n < REFRESH_FLOOR_SECS => {
                tracing::warn!(
                    configured = n,
                    "minimum refresh time is 60 seconds to not overload the cloud"
                );
                Self::Every(REFRESH_FLOOR_SECS)
            }
            Ok(n) => Self::Every(n),
            Err(_) => {
                tracing::warn!(
                    configured = secs,
                    "refresh must be a positive number of seconds, using 60"
                );
                Self::Every(REFRESH_FLOOR_SECS)
            }
        }
    }
}

/// Per-robot refresh timer driver.
pub struct RefreshScheduler {
    mode: RefreshMode,
}

impl RefreshScheduler {
    #[must_use]
    pub fn new(mode: RefreshMode) -> Self {
        Self { mode }
    }

    #[must_use]
    pub fn mode(&self) -> RefreshMode {
        self.mode
    }

    /// When the next background refresh should run, given the current
    /// snapshot. `None` stops background polling.
    #[must_use]
    pub fn next_delay(&self, state: &RobotState) -> Option<Duration> {
        match self.mode {
            RefreshMode::Every(secs) => Some(Duration::from_secs(secs)),
            RefreshMode::Auto if CleaningState::derive(state) == CleaningState::Cleaning => {
                Some(Duration::from_secs(AUTO_REFRESH_SECS))
            }
            RefreshMode::Auto | RefreshMode::Off => None,
        }
    }

    /// Apply the policy after a refresh cycle: arm the next timer or stop.
    pub fn schedule(&self, unit: &mut RobotUnit, tick_tx: &mpsc::UnboundedSender<Serial>) {
        match self.next_delay(&unit.snapshot) {
            Some(delay) => {
                tracing::debug!(
                    robot = %unit.robot.name,
                    delay_secs = delay.as_secs(),
                    "next background update scheduled"
                );
                self.arm(unit, delay, tick_tx);
            }
            None => {
                if let Some(timer) = unit.timer.take() {
                    timer.abort();
                }
                tracing::debug!(robot = %unit.robot.name, "stopped background updates");
            }
        }
    }

    /// Arm a one-shot timer that sends the robot's serial on the tick
    /// channel after `delay`. Any previously armed timer is aborted first.
    pub fn arm(
        &self,
        unit: &mut RobotUnit,
        delay: Duration,
        tick_tx: &mpsc::UnboundedSender<Serial>,
    ) {
        if let Some(previous) = unit.timer.take() {
            previous.abort();
        }

        let serial = unit.robot.serial.clone();
        let tx = tick_tx.clone();
        unit.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(serial);
        }));
    }
}
