//! State cache — debounced refresh of a robot's remote snapshot.
//!
//! The cloud is slow and rate-limited; every read path funnels through
//! here. A fetch only goes out when the cached snapshot is older than the
//! debounce window. The refresh instant is stamped *before* the fetch is
//! awaited, so a second caller arriving during a slow in-flight fetch is
//! debounced against the fetch start rather than triggering its own.

use tokio::time::{Duration, Instant};

use crate::ports::RobotGateway;
use crate::registry::RobotUnit;

/// Minimum age of the snapshot before another fetch goes out.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(2000);

/// Freshness-gated cache of the last fetched robot state.
#[derive(Debug, Clone)]
pub struct StateCache {
    min_interval: Duration,
}

impl Default for StateCache {
    fn default() -> Self {
        Self {
            min_interval: DEBOUNCE_WINDOW,
        }
    }
}

impl StateCache {
    /// Create a cache with a custom debounce window.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval }
    }

    /// Refresh the unit's snapshot if it is stale.
    ///
    /// A failed fetch is logged and leaves the previous snapshot in place;
    /// readers keep working with stale-but-present data rather than
    /// failing the interaction.
    pub async fn refresh<G: RobotGateway>(&self, gateway: &G, unit: &mut RobotUnit) {
        let now = Instant::now();
        if let Some(last) = unit.last_refresh {
            if now.duration_since(last) < self.min_interval {
                return;
            }
        }

        unit.last_refresh = Some(now);
        tracing::debug!(robot = %unit.robot.name, "updating robot state");

        match gateway.get_state(&unit.robot.serial).await {
            Ok(snapshot) => unit.snapshot = snapshot,
            Err(err) => {
                tracing::error!(
                    robot = %unit.robot.name,
                    %err,
                    "cannot update robot state, check if the robot is online; serving cached snapshot"
                );
            }
        }
    }
}
