//! Shared test support — a scriptable in-memory gateway and unit builders.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use robovac_domain::boundary::BoundaryRegion;
use robovac_domain::error::GatewayError;
use robovac_domain::id::{BoundaryId, MapId, Serial};
use robovac_domain::intent::CleanOptions;
use robovac_domain::robot::{Robot, RobotState};

use crate::ports::{RobotGateway, SpotRequest};
use crate::registry::{Registry, RobotUnit};
use crate::representation::{HiddenServices, MainRepresentation};
use crate::room_queue::RoomQueue;

pub(crate) const SERIAL: &str = "OPS32917-1D3C9FE88A21";

/// Gateway fake that records every call and can be scripted to fail
/// specific operations.
#[derive(Default)]
pub(crate) struct FakeGateway {
    pub state: Mutex<RobotState>,
    pub robots: Mutex<Vec<Robot>>,
    pub maps: Mutex<Vec<MapId>>,
    pub boundaries: Mutex<HashMap<MapId, Vec<BoundaryRegion>>>,
    calls: Mutex<Vec<&'static str>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl FakeGateway {
    pub fn with_state(state: RobotState) -> Self {
        Self {
            state: Mutex::new(state),
            ..Self::default()
        }
    }

    /// Script the named operation to fail with a rejected-command error.
    pub fn fail_on(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    fn record(&self, operation: &'static str) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(operation);
        if self.failing.lock().unwrap().contains(operation) {
            Err(GatewayError::Rejected("scripted failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl RobotGateway for FakeGateway {
    async fn authorize(&self, _email: &str, _password: &str) -> Result<(), GatewayError> {
        self.record("authorize")
    }

    async fn list_robots(&self) -> Result<Vec<Robot>, GatewayError> {
        self.record("list_robots")?;
        Ok(self.robots.lock().unwrap().clone())
    }

    async fn list_maps(&self, _serial: &Serial) -> Result<Vec<MapId>, GatewayError> {
        self.record("list_maps")?;
        Ok(self.maps.lock().unwrap().clone())
    }

    async fn list_boundaries(
        &self,
        _serial: &Serial,
        map: &MapId,
    ) -> Result<Vec<BoundaryRegion>, GatewayError> {
        self.record("list_boundaries")?;
        Ok(self
            .boundaries
            .lock()
            .unwrap()
            .get(map)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_state(&self, _serial: &Serial) -> Result<RobotState, GatewayError> {
        self.record("get_state")?;
        Ok(self.state.lock().unwrap().clone())
    }

    async fn start_cleaning(
        &self,
        _serial: &Serial,
        _options: &CleanOptions,
    ) -> Result<(), GatewayError> {
        self.record("start_cleaning")
    }

    async fn start_boundary_cleaning(
        &self,
        _serial: &Serial,
        _region: &BoundaryId,
        _options: &CleanOptions,
    ) -> Result<(), GatewayError> {
        self.record("start_boundary_cleaning")
    }

    async fn start_spot_cleaning(
        &self,
        _serial: &Serial,
        _request: &SpotRequest,
        _options: &CleanOptions,
    ) -> Result<(), GatewayError> {
        self.record("start_spot_cleaning")
    }

    async fn pause_cleaning(&self, _serial: &Serial) -> Result<(), GatewayError> {
        self.record("pause_cleaning")
    }

    async fn resume_cleaning(&self, _serial: &Serial) -> Result<(), GatewayError> {
        self.record("resume_cleaning")
    }

    async fn send_to_base(&self, _serial: &Serial) -> Result<(), GatewayError> {
        self.record("send_to_base")
    }

    async fn enable_schedule(&self, _serial: &Serial) -> Result<(), GatewayError> {
        self.record("enable_schedule")
    }

    async fn disable_schedule(&self, _serial: &Serial) -> Result<(), GatewayError> {
        self.record("disable_schedule")
    }

    async fn find_me(&self, _serial: &Serial) -> Result<(), GatewayError> {
        self.record("find_me")
    }
}

/// A registry holding one robot with the given snapshot and regions.
pub(crate) fn registry_with(state: RobotState, regions: Vec<BoundaryRegion>) -> Registry {
    let robot = Robot::builder()
        .serial(SERIAL)
        .name("Rosie")
        .spot_plus(true)
        .build()
        .unwrap();

    let mut registry = Registry::default();
    registry.register(robot, regions, &HiddenServices::default());
    registry
        .get_mut(&Serial::new(SERIAL))
        .unwrap()
        .snapshot = state;
    registry
}

/// A standalone unit with the given snapshot, no rooms.
pub(crate) fn unit_with(state: RobotState) -> RobotUnit {
    let robot = Robot::builder()
        .serial(SERIAL)
        .name("Rosie")
        .spot_plus(true)
        .build()
        .unwrap();
    let main = MainRepresentation::new(robot.name.clone(), HiddenServices::default());

    RobotUnit {
        robot,
        snapshot: state,
        last_refresh: None,
        queue: RoomQueue::default(),
        dock_requested: false,
        main,
        rooms: Vec::new(),
        timer: None,
    }
}
