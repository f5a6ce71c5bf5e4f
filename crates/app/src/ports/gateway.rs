//! Robot gateway port — the opaque device-cloud boundary.
//!
//! Every operation is fallible and asynchronous. Mutating operations change
//! remote state that is observable only through a subsequent
//! [`get_state`](RobotGateway::get_state); the gateway itself never pushes
//! updates. Implementations live in adapter crates (e.g. the virtual
//! simulator) — the core only sees this trait.

use std::future::Future;

use robovac_domain::boundary::BoundaryRegion;
use robovac_domain::error::GatewayError;
use robovac_domain::id::{BoundaryId, MapId, Serial};
use robovac_domain::intent::{CleanOptions, SpotParams};
use robovac_domain::robot::{Robot, RobotState};

/// Spot-clean request as it goes over the wire.
///
/// Width and height are carried only for robots that reported sized spot
/// cleaning at discovery; other robots accept just the repeat flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotRequest {
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub repeat: bool,
}

impl SpotRequest {
    /// Build the wire request for a specific robot from the toggle-surface
    /// parameters.
    #[must_use]
    pub fn for_robot(robot: &Robot, spot: SpotParams) -> Self {
        Self {
            width: robot.spot_plus.then_some(spot.width),
            height: robot.spot_plus.then_some(spot.height),
            repeat: spot.repeat,
        }
    }
}

/// Async operations on the remote device cloud.
pub trait RobotGateway: Send + Sync {
    /// Log in with account credentials. Must be called before anything else.
    fn authorize(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// List the robots associated with the account.
    fn list_robots(&self) -> impl Future<Output = Result<Vec<Robot>, GatewayError>> + Send;

    /// List the persisted floor maps of one robot.
    fn list_maps(
        &self,
        serial: &Serial,
    ) -> impl Future<Output = Result<Vec<MapId>, GatewayError>> + Send;

    /// List the boundary regions drawn on one map.
    fn list_boundaries(
        &self,
        serial: &Serial,
        map: &MapId,
    ) -> impl Future<Output = Result<Vec<BoundaryRegion>, GatewayError>> + Send;

    /// Fetch the current remote state of one robot.
    fn get_state(
        &self,
        serial: &Serial,
    ) -> impl Future<Output = Result<RobotState, GatewayError>> + Send;

    /// Start a whole-house cleaning run.
    fn start_cleaning(
        &self,
        serial: &Serial,
        options: &CleanOptions,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Start cleaning a single boundary region.
    fn start_boundary_cleaning(
        &self,
        serial: &Serial,
        region: &BoundaryId,
        options: &CleanOptions,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Start a spot clean around the robot's current position.
    fn start_spot_cleaning(
        &self,
        serial: &Serial,
        request: &SpotRequest,
        options: &CleanOptions,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    fn pause_cleaning(
        &self,
        serial: &Serial,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    fn resume_cleaning(
        &self,
        serial: &Serial,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Send the robot back to its charging base.
    fn send_to_base(
        &self,
        serial: &Serial,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    fn enable_schedule(
        &self,
        serial: &Serial,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    fn disable_schedule(
        &self,
        serial: &Serial,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Make the robot chirp so it can be located.
    fn find_me(&self, serial: &Serial) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn robot(spot_plus: bool) -> Robot {
        Robot::builder()
            .serial("OPS32917-1D3C9FE88A21")
            .name("Rosie")
            .spot_plus(spot_plus)
            .build()
            .unwrap()
    }

    #[test]
    fn should_carry_spot_size_for_spot_plus_robots() {
        let request = SpotRequest::for_robot(
            &robot(true),
            SpotParams {
                width: 200,
                height: 150,
                repeat: true,
            },
        );
        assert_eq!(request.width, Some(200));
        assert_eq!(request.height, Some(150));
        assert!(request.repeat);
    }

    #[test]
    fn should_drop_spot_size_for_basic_robots() {
        let request = SpotRequest::for_robot(
            &robot(false),
            SpotParams {
                width: 200,
                height: 150,
                repeat: false,
            },
        );
        assert_eq!(request.width, None);
        assert_eq!(request.height, None);
        assert!(!request.repeat);
    }
}
