//! Deferred room queue — a single "clean this room next" slot.
//!
//! The slot is armed by the sequencer's room-switch path and consumed the
//! first time the robot is observed on its dock. Dock *arrival* is the
//! trigger, not the success of the dock command: a robot carried home by
//! hand still starts the queued room.

use robovac_domain::id::BoundaryId;
use robovac_domain::robot::RobotState;

/// Single-slot deferred-intent queue, one per robot.
#[derive(Debug, Default)]
pub struct RoomQueue {
    pending: Option<BoundaryId>,
}

impl RoomQueue {
    /// Arm the slot. An already-armed slot is overwritten; only the most
    /// recent switch request survives.
    pub fn arm(&mut self, region: BoundaryId) {
        if let Some(previous) = self.pending.replace(region) {
            tracing::debug!(%previous, "replacing queued room");
        }
    }

    /// The currently queued region, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&BoundaryId> {
        self.pending.as_ref()
    }

    /// Consume the slot if the robot has arrived on its dock.
    ///
    /// Consume-once: the slot is cleared regardless of what the caller does
    /// with the returned region.
    pub fn take_if_docked(&mut self, state: &RobotState) -> Option<BoundaryId> {
        if state.is_docked {
            self.pending.take()
        } else {
            None
        }
    }
}
