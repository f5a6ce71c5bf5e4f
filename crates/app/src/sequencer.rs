//! Action sequencer — turns one intent into exactly one remote operation.
//!
//! The cloud only accepts an operation while the matching capability flag
//! is up, and the flags move under our feet. The sequencer therefore works
//! on a snapshot refreshed immediately beforehand, picks exactly one
//! operation per intent, and never retries: a rejected operation is
//! reported to the caller and the next refresh shows what actually
//! happened.
//!
//! The one multi-step move is switching rooms mid-run: pause, queue the
//! new room, send the robot home. The queued room starts on dock arrival
//! (see [`RoomQueue`](crate::room_queue::RoomQueue)).

use tokio::time::Duration;

use robovac_domain::error::{GatewayError, RobovacError};
use robovac_domain::id::BoundaryId;
use robovac_domain::intent::{CleanOptions, Intent, SpotParams};
use robovac_domain::state::CleaningState;

use crate::ports::{RobotGateway, SpotRequest};
use crate::registry::RobotUnit;

/// Delay between pausing and sending the robot to base, letting the pause
/// take effect on the robot before the next command arrives.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// What a dispatched intent ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing to do in the current state.
    NoOp,
    /// A fresh cleaning run was started.
    Started,
    /// A paused run was resumed.
    Resumed,
    /// The active run was paused.
    Paused,
    /// The robot is on its way back to the base.
    ReturningToBase,
    ScheduleEnabled,
    ScheduleDisabled,
    /// The find-me chirp fired; the switch reverts locally shortly after.
    FindMeFired,
}

/// Decision logic mapping intents onto gateway operations.
pub struct ActionSequencer {
    settle_delay: Duration,
}

impl Default for ActionSequencer {
    fn default() -> Self {
        Self {
            settle_delay: SETTLE_DELAY,
        }
    }
}

impl ActionSequencer {
    #[must_use]
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }

    /// Dispatch one intent against one robot.
    ///
    /// The caller must have refreshed the snapshot first; decisions here
    /// read the capability flags as-is.
    ///
    /// # Errors
    ///
    /// Returns [`RobovacError::RemoteOperation`] when the chosen remote
    /// operation fails. The snapshot is never mutated on failure; the next
    /// refresh reveals whatever the robot actually did.
    pub async fn dispatch<G: RobotGateway>(
        &self,
        gateway: &G,
        unit: &mut RobotUnit,
        intent: Intent,
    ) -> Result<DispatchOutcome, RobovacError> {
        match intent {
            Intent::Start { region } => self.start(gateway, unit, region).await,
            Intent::Stop => Self::stop(gateway, unit).await,
            Intent::GoToDock => self.go_to_dock(gateway, unit).await,
            Intent::SpotClean { spot } => Self::spot_clean(gateway, unit, spot).await,
            Intent::EnableSchedule => {
                tracing::debug!(robot = %unit.robot.name, "enabling schedule");
                gateway
                    .enable_schedule(&unit.robot.serial)
                    .await
                    .map_err(|err| remote_failure(unit, "enable_schedule", err))?;
                Ok(DispatchOutcome::ScheduleEnabled)
            }
            Intent::DisableSchedule => {
                tracing::debug!(robot = %unit.robot.name, "disabling schedule");
                gateway
                    .disable_schedule(&unit.robot.serial)
                    .await
                    .map_err(|err| remote_failure(unit, "disable_schedule", err))?;
                Ok(DispatchOutcome::ScheduleDisabled)
            }
            Intent::FindMe => {
                tracing::debug!(robot = %unit.robot.name, "find me");
                gateway
                    .find_me(&unit.robot.serial)
                    .await
                    .map_err(|err| remote_failure(unit, "find_me", err))?;
                Ok(DispatchOutcome::FindMeFired)
            }
        }
    }

    async fn start<G: RobotGateway>(
        &self,
        gateway: &G,
        unit: &mut RobotUnit,
        region: Option<BoundaryId>,
    ) -> Result<DispatchOutcome, RobovacError> {
        match region {
            Some(target) if unit.snapshot.cleaning_boundary.as_ref() != Some(&target) => {
                self.switch_region(gateway, unit, target).await
            }
            region => Self::start_current(gateway, unit, region).await,
        }
    }

    /// Start intent aimed at the active run (no region, or the region
    /// already being cleaned).
    async fn start_current<G: RobotGateway>(
        gateway: &G,
        unit: &mut RobotUnit,
        region: Option<BoundaryId>,
    ) -> Result<DispatchOutcome, RobovacError> {
        match unit.state() {
            CleaningState::Paused => {
                tracing::debug!(robot = %unit.robot.name, "resuming cleaning");
                gateway
                    .resume_cleaning(&unit.robot.serial)
                    .await
                    .map_err(|err| remote_failure(unit, "resume", err))?;
                Ok(DispatchOutcome::Resumed)
            }
            _ if unit.snapshot.can_start => Self::begin_clean(gateway, unit, region).await,
            _ => {
                tracing::debug!(
                    robot = %unit.robot.name,
                    "cannot start, probably already cleaning"
                );
                Ok(DispatchOutcome::NoOp)
            }
        }
    }

    /// Issue the actual clean-start, whole-house or region-scoped, with
    /// the main toggles captured at call time.
    async fn begin_clean<G: RobotGateway>(
        gateway: &G,
        unit: &mut RobotUnit,
        region: Option<BoundaryId>,
    ) -> Result<DispatchOutcome, RobovacError> {
        let options = CleanOptions::from_snapshot(&unit.snapshot);
        match region {
            None => {
                tracing::debug!(
                    robot = %unit.robot.name,
                    eco = options.eco,
                    no_go_lines = options.no_go_lines,
                    "starting cleaning"
                );
                gateway
                    .start_cleaning(&unit.robot.serial, &options)
                    .await
                    .map_err(|err| remote_failure(unit, "start", err))?;
            }
            Some(target) => {
                tracing::debug!(
                    robot = %unit.robot.name,
                    region = %target,
                    "starting room cleaning"
                );
                gateway
                    .start_boundary_cleaning(&unit.robot.serial, &target, &options)
                    .await
                    .map_err(|err| remote_failure(unit, "start_boundary", err))?;
            }
        }
        Ok(DispatchOutcome::Started)
    }

    /// Start intent aimed at a region other than the one being cleaned:
    /// interrupt the run, queue the room, send the robot home. If the
    /// robot is not running at all, just start the new region directly.
    async fn switch_region<G: RobotGateway>(
        &self,
        gateway: &G,
        unit: &mut RobotUnit,
        target: BoundaryId,
    ) -> Result<DispatchOutcome, RobovacError> {
        match unit.state() {
            CleaningState::Cleaning => {
                tracing::debug!(
                    robot = %unit.robot.name,
                    region = %target,
                    "returning to dock to start cleaning of new room"
                );
                gateway
                    .pause_cleaning(&unit.robot.serial)
                    .await
                    .map_err(|err| remote_failure(unit, "pause", err))?;
                // Queued before the dock send on purpose: dock arrival,
                // however it happens, triggers the queued clean.
                unit.queue.arm(target);
                tokio::time::sleep(self.settle_delay).await;
                gateway
                    .send_to_base(&unit.robot.serial)
                    .await
                    .map_err(|err| remote_failure(unit, "send_to_base", err))?;
                Ok(DispatchOutcome::ReturningToBase)
            }
            CleaningState::Paused => {
                tracing::debug!(
                    robot = %unit.robot.name,
                    region = %target,
                    "returning to dock to start cleaning of new room"
                );
                unit.queue.arm(target);
                if unit.snapshot.can_go_to_base {
                    gateway
                        .send_to_base(&unit.robot.serial)
                        .await
                        .map_err(|err| remote_failure(unit, "send_to_base", err))?;
                } else {
                    tracing::warn!(
                        robot = %unit.robot.name,
                        "cannot return to base right now, room stays queued"
                    );
                }
                Ok(DispatchOutcome::ReturningToBase)
            }
            _ => Self::begin_clean(gateway, unit, Some(target)).await,
        }
    }

    async fn stop<G: RobotGateway>(
        gateway: &G,
        unit: &mut RobotUnit,
    ) -> Result<DispatchOutcome, RobovacError> {
        match unit.state() {
            CleaningState::Cleaning => {
                tracing::debug!(robot = %unit.robot.name, "pausing cleaning");
                gateway
                    .pause_cleaning(&unit.robot.serial)
                    .await
                    .map_err(|err| remote_failure(unit, "pause", err))?;
                Ok(DispatchOutcome::Paused)
            }
            _ => {
                tracing::debug!(robot = %unit.robot.name, "already paused");
                Ok(DispatchOutcome::NoOp)
            }
        }
    }

    async fn go_to_dock<G: RobotGateway>(
        &self,
        gateway: &G,
        unit: &mut RobotUnit,
    ) -> Result<DispatchOutcome, RobovacError> {
        match unit.state() {
            CleaningState::Cleaning => {
                tracing::debug!(robot = %unit.robot.name, "pausing cleaning to go to dock");
                gateway
                    .pause_cleaning(&unit.robot.serial)
                    .await
                    .map_err(|err| remote_failure(unit, "pause", err))?;
                tokio::time::sleep(self.settle_delay).await;
                tracing::debug!(robot = %unit.robot.name, "going to dock");
                gateway
                    .send_to_base(&unit.robot.serial)
                    .await
                    .map_err(|err| remote_failure(unit, "send_to_base", err))?;
                unit.dock_requested = true;
                Ok(DispatchOutcome::ReturningToBase)
            }
            _ if unit.snapshot.can_go_to_base => {
                tracing::debug!(robot = %unit.robot.name, "going to dock");
                gateway
                    .send_to_base(&unit.robot.serial)
                    .await
                    .map_err(|err| remote_failure(unit, "send_to_base", err))?;
                unit.dock_requested = true;
                Ok(DispatchOutcome::ReturningToBase)
            }
            _ => {
                tracing::warn!(robot = %unit.robot.name, "cannot go to dock at the moment");
                Ok(DispatchOutcome::NoOp)
            }
        }
    }

    async fn spot_clean<G: RobotGateway>(
        gateway: &G,
        unit: &mut RobotUnit,
        spot: SpotParams,
    ) -> Result<DispatchOutcome, RobovacError> {
        match unit.state() {
            CleaningState::Paused => {
                tracing::debug!(robot = %unit.robot.name, "resuming spot cleaning");
                gateway
                    .resume_cleaning(&unit.robot.serial)
                    .await
                    .map_err(|err| remote_failure(unit, "resume", err))?;
                Ok(DispatchOutcome::Resumed)
            }
            _ if unit.snapshot.can_start => {
                let options = CleanOptions::from_snapshot(&unit.snapshot);
                let request = SpotRequest::for_robot(&unit.robot, spot);
                tracing::debug!(
                    robot = %unit.robot.name,
                    repeat = request.repeat,
                    "starting spot cleaning"
                );
                gateway
                    .start_spot_cleaning(&unit.robot.serial, &request, &options)
                    .await
                    .map_err(|err| remote_failure(unit, "start_spot", err))?;
                Ok(DispatchOutcome::Started)
            }
            _ => {
                tracing::debug!(
                    robot = %unit.robot.name,
                    "cannot start spot cleaning, probably already cleaning"
                );
                Ok(DispatchOutcome::NoOp)
            }
        }
    }
}

/// Log and wrap a failed remote operation.
fn remote_failure(
    unit: &RobotUnit,
    operation: &'static str,
    source: GatewayError,
) -> RobovacError {
    tracing::error!(
        robot = %unit.robot.name,
        operation,
        %source,
        "remote operation failed"
    );
    RobovacError::RemoteOperation {
        serial: unit.robot.serial.clone(),
        operation,
        source,
    }
}
