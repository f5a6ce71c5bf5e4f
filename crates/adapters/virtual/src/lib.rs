//! # robovac-adapter-virtual
//!
//! Virtual/demo gateway that simulates a cloud-connected vacuum robot.
//!
//! ## Provided fleet
//!
//! | Robot | Serial | Rooms |
//! |-------|--------|-------|
//! | Virtual Robot | `VR01-SIMULATED000001` | Kitchen, Living Room |
//!
//! The simulated robot honors the cloud's capability contract: commands
//! are rejected unless the matching capability flag is up, and every
//! accepted command is observable only through the next `get_state`.
//! Travel time is collapsed — `send_to_base` lands the robot on its dock
//! immediately.
//!
//! ## Dependency rule
//!
//! Depends on `robovac-app` (port traits) and `robovac-domain` only.

use std::collections::HashMap;
use std::sync::Mutex;

use robovac_app::ports::{RobotGateway, SpotRequest};
use robovac_domain::boundary::{BoundaryKind, BoundaryRegion, FloorMap};
use robovac_domain::error::GatewayError;
use robovac_domain::id::{BoundaryId, MapId, Serial};
use robovac_domain::intent::CleanOptions;
use robovac_domain::robot::{Robot, RobotState};

/// Serial of the built-in demo robot.
pub const DEMO_SERIAL: &str = "VR01-SIMULATED000001";

struct SimRobot {
    robot: Robot,
    state: RobotState,
    maps: Vec<FloorMap>,
}

/// Simulated device cloud holding one or more virtual robots.
pub struct VirtualGateway {
    authorized: Mutex<bool>,
    robots: Mutex<HashMap<Serial, SimRobot>>,
}

impl Default for VirtualGateway {
    fn default() -> Self {
        let gateway = Self::empty();
        gateway.add_robot(demo_robot(), demo_maps());
        gateway
    }
}

impl VirtualGateway {
    /// A gateway with no robots; populate with [`add_robot`](Self::add_robot).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            authorized: Mutex::new(false),
            robots: Mutex::new(HashMap::new()),
        }
    }

    /// Add a robot sitting on its dock, fully charged.
    pub fn add_robot(&self, robot: Robot, maps: Vec<FloorMap>) {
        let serial = robot.serial.clone();
        let sim = SimRobot {
            robot,
            state: docked_state(),
            maps,
        };
        self.robots.lock().unwrap().insert(serial, sim);
    }

    /// Inspect a robot's simulated state (test helper).
    #[must_use]
    pub fn state_of(&self, serial: &Serial) -> Option<RobotState> {
        self.robots
            .lock()
            .unwrap()
            .get(serial)
            .map(|sim| sim.state.clone())
    }

    fn ensure_authorized(&self) -> Result<(), GatewayError> {
        if *self.authorized.lock().unwrap() {
            Ok(())
        } else {
            Err(GatewayError::Unauthorized)
        }
    }

    fn with_robot<T>(
        &self,
        serial: &Serial,
        apply: impl FnOnce(&mut SimRobot) -> Result<T, GatewayError>,
    ) -> Result<T, GatewayError> {
        self.ensure_authorized()?;
        let mut robots = self.robots.lock().unwrap();
        let sim = robots.get_mut(serial).ok_or(GatewayError::Unreachable)?;
        apply(sim)
    }
}

fn demo_robot() -> Robot {
    Robot {
        serial: Serial::new(DEMO_SERIAL),
        name: "Virtual Robot".to_string(),
        model: Some("VR-1".to_string()),
        firmware: Some("1.0.0".to_string()),
        spot_plus: true,
    }
}

fn demo_maps() -> Vec<FloorMap> {
    vec![FloorMap {
        id: MapId::new("vmap-1"),
        boundaries: vec![
            BoundaryRegion::new("vb-kitchen", "Kitchen", BoundaryKind::Polygon),
            BoundaryRegion::new("vb-living", "Living Room", BoundaryKind::Polygon),
            BoundaryRegion::new("vb-nogo", "Cat corner", BoundaryKind::Polyline),
        ],
    }]
}

fn docked_state() -> RobotState {
    RobotState {
        can_start: true,
        is_docked: true,
        is_charging: false,
        dock_has_been_seen: true,
        charge: 95,
        spot_width: 100,
        spot_height: 100,
        ..RobotState::default()
    }
}

fn apply_cleaning_flags(state: &mut RobotState, cleaning_boundary: Option<BoundaryId>) {
    state.can_pause = true;
    state.can_resume = false;
    state.can_start = false;
    state.can_go_to_base = false;
    state.is_docked = false;
    state.is_charging = false;
    state.dock_has_been_seen = false;
    state.cleaning_boundary = cleaning_boundary;
}

impl RobotGateway for VirtualGateway {
    async fn authorize(&self, email: &str, _password: &str) -> Result<(), GatewayError> {
        tracing::debug!(email, "virtual cloud login");
        *self.authorized.lock().unwrap() = true;
        Ok(())
    }

    async fn list_robots(&self) -> Result<Vec<Robot>, GatewayError> {
        self.ensure_authorized()?;
        Ok(self
            .robots
            .lock()
            .unwrap()
            .values()
            .map(|sim| sim.robot.clone())
            .collect())
    }

    async fn list_maps(&self, serial: &Serial) -> Result<Vec<MapId>, GatewayError> {
        self.with_robot(serial, |sim| {
            Ok(sim.maps.iter().map(|map| map.id.clone()).collect())
        })
    }

    async fn list_boundaries(
        &self,
        serial: &Serial,
        map: &MapId,
    ) -> Result<Vec<BoundaryRegion>, GatewayError> {
        self.with_robot(serial, |sim| {
            sim.maps
                .iter()
                .find(|candidate| candidate.id == *map)
                .map(|found| found.boundaries.clone())
                .ok_or_else(|| GatewayError::Rejected("unknown map".to_string()))
        })
    }

    async fn get_state(&self, serial: &Serial) -> Result<RobotState, GatewayError> {
        self.with_robot(serial, |sim| Ok(sim.state.clone()))
    }

    async fn start_cleaning(
        &self,
        serial: &Serial,
        options: &CleanOptions,
    ) -> Result<(), GatewayError> {
        self.with_robot(serial, |sim| {
            if !sim.state.can_start {
                return Err(GatewayError::Rejected("cannot start now".to_string()));
            }
            sim.state.eco = options.eco;
            sim.state.navigation_mode = options.navigation;
            sim.state.no_go_lines = options.no_go_lines;
            apply_cleaning_flags(&mut sim.state, None);
            Ok(())
        })
    }

    async fn start_boundary_cleaning(
        &self,
        serial: &Serial,
        region: &BoundaryId,
        options: &CleanOptions,
    ) -> Result<(), GatewayError> {
        self.with_robot(serial, |sim| {
            if !sim.state.can_start {
                return Err(GatewayError::Rejected("cannot start now".to_string()));
            }
            let known = sim
                .maps
                .iter()
                .flat_map(|map| map.boundaries.iter())
                .any(|boundary| boundary.id == *region);
            if !known {
                return Err(GatewayError::Rejected("unknown boundary".to_string()));
            }
            sim.state.eco = options.eco;
            sim.state.navigation_mode = options.navigation;
            apply_cleaning_flags(&mut sim.state, Some(region.clone()));
            Ok(())
        })
    }

    async fn start_spot_cleaning(
        &self,
        serial: &Serial,
        request: &SpotRequest,
        options: &CleanOptions,
    ) -> Result<(), GatewayError> {
        self.with_robot(serial, |sim| {
            if !sim.state.can_start {
                return Err(GatewayError::Rejected("cannot start now".to_string()));
            }
            sim.state.eco = options.eco;
            sim.state.navigation_mode = options.navigation;
            sim.state.spot_repeat = request.repeat;
            if let Some(width) = request.width {
                sim.state.spot_width = width;
            }
            if let Some(height) = request.height {
                sim.state.spot_height = height;
            }
            apply_cleaning_flags(&mut sim.state, None);
            Ok(())
        })
    }

    async fn pause_cleaning(&self, serial: &Serial) -> Result<(), GatewayError> {
        self.with_robot(serial, |sim| {
            if !sim.state.can_pause {
                return Err(GatewayError::Rejected("nothing to pause".to_string()));
            }
            sim.state.can_pause = false;
            sim.state.can_resume = true;
            sim.state.can_go_to_base = true;
            Ok(())
        })
    }

    async fn resume_cleaning(&self, serial: &Serial) -> Result<(), GatewayError> {
        self.with_robot(serial, |sim| {
            if !sim.state.can_resume {
                return Err(GatewayError::Rejected("nothing to resume".to_string()));
            }
            let boundary = sim.state.cleaning_boundary.clone();
            apply_cleaning_flags(&mut sim.state, boundary);
            Ok(())
        })
    }

    async fn send_to_base(&self, serial: &Serial) -> Result<(), GatewayError> {
        self.with_robot(serial, |sim| {
            if !sim.state.can_go_to_base {
                return Err(GatewayError::Rejected("cannot go to base now".to_string()));
            }
            // Travel time is collapsed in the simulation.
            sim.state = RobotState {
                eco: sim.state.eco,
                no_go_lines: sim.state.no_go_lines,
                navigation_mode: sim.state.navigation_mode,
                spot_width: sim.state.spot_width,
                spot_height: sim.state.spot_height,
                spot_repeat: sim.state.spot_repeat,
                is_schedule_enabled: sim.state.is_schedule_enabled,
                charge: sim.state.charge,
                is_charging: true,
                ..docked_state()
            };
            Ok(())
        })
    }

    async fn enable_schedule(&self, serial: &Serial) -> Result<(), GatewayError> {
        self.with_robot(serial, |sim| {
            sim.state.is_schedule_enabled = true;
            Ok(())
        })
    }

    async fn disable_schedule(&self, serial: &Serial) -> Result<(), GatewayError> {
        self.with_robot(serial, |sim| {
            sim.state.is_schedule_enabled = false;
            Ok(())
        })
    }

    async fn find_me(&self, serial: &Serial) -> Result<(), GatewayError> {
        self.with_robot(serial, |sim| {
            tracing::debug!(robot = %sim.robot.name, "virtual robot chirps");
            Ok(())
        })
    }
}
