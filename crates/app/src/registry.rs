//! Robot registry — owns discovered robots and their representations.
//!
//! One [`RobotUnit`] per discovered robot: identity, the mutable snapshot,
//! the deferred room slot, the refresh-timer handle, and the main/room
//! representations. The registry also enforces the global uniqueness of
//! room display names and drives the notify fan-out in a fixed order
//! (main first, then rooms).

use std::collections::HashMap;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use robovac_domain::boundary::BoundaryRegion;
use robovac_domain::event::{Event, EventType};
use robovac_domain::id::{BoundaryId, Serial};
use robovac_domain::robot::{Robot, RobotState};
use robovac_domain::state::CleaningState;

use crate::representation::{HiddenServices, MainRepresentation, RoomRepresentation};
use crate::room_queue::RoomQueue;

/// A discovered robot and everything the engine tracks about it.
pub struct RobotUnit {
    pub robot: Robot,
    /// Last fetched remote state. Local toggle writes land here too.
    pub snapshot: RobotState,
    /// Start instant of the last state fetch (debounce reference point).
    pub last_refresh: Option<Instant>,
    /// Deferred "clean this room next" slot.
    pub queue: RoomQueue,
    /// The go-to-dock switch was turned on and the robot has not located
    /// its dock since.
    pub dock_requested: bool,
    pub main: MainRepresentation,
    pub rooms: Vec<RoomRepresentation>,
    /// At most one outstanding refresh timer; arming a new one aborts this.
    pub(crate) timer: Option<JoinHandle<()>>,
}

impl RobotUnit {
    /// The robot's current high-level activity.
    #[must_use]
    pub fn state(&self) -> CleaningState {
        CleaningState::derive(&self.snapshot)
    }
}

/// Result of one notify fan-out, in publish order.
pub struct NotifyOutcome {
    /// Main representation update (published first).
    pub main: Event,
    /// Region released by the room queue, if the robot was seen docked.
    pub queued: Option<BoundaryId>,
    /// Room representation updates (published after the main pass).
    pub rooms: Vec<Event>,
}

/// Owned collection of discovered robots.
#[derive(Default)]
pub struct Registry {
    units: Vec<RobotUnit>,
    /// Collision key → last assigned display name. The key is always the
    /// *originally requested* boundary name.
    names: HashMap<String, String>,
}

impl Registry {
    /// Register a robot and its cleanable regions.
    ///
    /// Room display names are made unique across all robots: a repeated
    /// name gets a numeric suffix ("Kitchen", "Kitchen 2", "Kitchen 3", …).
    pub fn register(
        &mut self,
        robot: Robot,
        boundaries: Vec<BoundaryRegion>,
        hidden: &HiddenServices,
    ) {
        let main = MainRepresentation::new(robot.name.clone(), hidden.clone());
        tracing::info!(robot = %robot.name, "added cleaning device");

        let mut rooms = Vec::with_capacity(boundaries.len());
        for mut region in boundaries {
            region.name = self.assign_name(&region.name);
            let room = RoomRepresentation::new(&robot.name, region);
            tracing::info!(room = %room.display_name, "added cleaning device");
            rooms.push(room);
        }

        self.units.push(RobotUnit {
            robot,
            snapshot: RobotState::default(),
            last_refresh: None,
            queue: RoomQueue::default(),
            dock_requested: false,
            main,
            rooms,
            timer: None,
        });
    }

    /// Allocate a unique display name for a requested boundary name.
    fn assign_name(&mut self, requested: &str) -> String {
        let assigned = match self.names.get(requested) {
            None => requested.to_string(),
            Some(last) => bump_suffix(last),
        };
        self.names.insert(requested.to_string(), assigned.clone());
        assigned
    }

    #[must_use]
    pub fn get(&self, serial: &Serial) -> Option<&RobotUnit> {
        self.units.iter().find(|unit| unit.robot.serial == *serial)
    }

    pub fn get_mut(&mut self, serial: &Serial) -> Option<&mut RobotUnit> {
        self.units
            .iter_mut()
            .find(|unit| unit.robot.serial == *serial)
    }

    /// Serials of all registered robots.
    #[must_use]
    pub fn serials(&self) -> Vec<Serial> {
        self.units
            .iter()
            .map(|unit| unit.robot.serial.clone())
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RobotUnit> {
        self.units.iter()
    }

    /// Run the notify fan-out for one robot.
    ///
    /// The main pass runs first: it clears the dock-switch shadow once the
    /// dock has been seen, derives the main toggles, and releases the room
    /// queue when the robot is docked. Room passes follow in registration
    /// order. Returns `None` for unknown serials.
    pub fn notify(&mut self, serial: &Serial) -> Option<NotifyOutcome> {
        let unit = self.get_mut(serial)?;

        if unit.dock_requested && unit.snapshot.dock_has_been_seen {
            unit.dock_requested = false;
        }

        let toggles = unit
            .main
            .derive(&unit.robot, &unit.snapshot, unit.dock_requested);
        let main = Event::new(
            EventType::MainUpdated,
            unit.robot.serial.clone(),
            toggles.to_payload(unit.main.hidden()),
        );

        let queued = unit.queue.take_if_docked(&unit.snapshot);

        let rooms = unit
            .rooms
            .iter()
            .map(|room| {
                Event::new(
                    EventType::RoomUpdated,
                    unit.robot.serial.clone(),
                    room.payload(&unit.snapshot),
                )
            })
            .collect();

        Some(NotifyOutcome {
            main,
            queued,
            rooms,
        })
    }
}

/// Derive the next display name from the last one assigned for the same
/// requested name: increment a trailing number, else append " 2".
fn bump_suffix(name: &str) -> String {
    let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &name[stem.len()..];
    match digits.parse::<u64>() {
        Ok(n) => format!("{stem}{}", n + 1),
        Err(_) => format!("{name} 2"),
    }
}
