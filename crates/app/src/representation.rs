//! Accessory representations — the toggle surface derived from a snapshot.
//!
//! A robot is exposed twice: once as a whole device (main representation)
//! and once per cleanable region (room representations). Representations
//! hold no state of their own; every derived value reads through the
//! owning robot's snapshot. What they produce is a plain value object the
//! fan-out publishes — rendering it into any particular accessory protocol
//! is somebody else's job.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::json;

use robovac_domain::boundary::BoundaryRegion;
use robovac_domain::robot::{Robot, RobotState};
use robovac_domain::state::CleaningState;

/// Optional toggle categories that can be hidden through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceCategory {
    Spot,
    Dock,
    DockState,
    Eco,
    NoGoLines,
    ExtraCare,
    Schedule,
    Find,
}

impl ServiceCategory {
    /// Parse a configuration name; `None` for unknown names.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "spot" => Some(Self::Spot),
            "dock" => Some(Self::Dock),
            "dockstate" => Some(Self::DockState),
            "eco" => Some(Self::Eco),
            "nogolines" => Some(Self::NoGoLines),
            "extracare" => Some(Self::ExtraCare),
            "schedule" => Some(Self::Schedule),
            "find" => Some(Self::Find),
            _ => None,
        }
    }
}

/// The set of toggle categories excluded from published payloads.
#[derive(Debug, Clone, Default)]
pub struct HiddenServices {
    set: HashSet<ServiceCategory>,
}

impl HiddenServices {
    /// Build from configured category names. Unknown names are logged and
    /// skipped.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut set = HashSet::new();
        for name in names {
            match ServiceCategory::parse(name.as_ref()) {
                Some(category) => {
                    set.insert(category);
                }
                None => {
                    tracing::warn!(name = name.as_ref(), "unknown hidden service category");
                }
            }
        }
        Self { set }
    }

    #[must_use]
    pub fn contains(&self, category: ServiceCategory) -> bool {
        self.set.contains(&category)
    }
}

/// Toggle values of the whole-robot representation.
///
/// `go_to_dock`, `find_me`, and `spot_clean` are write-only switches: their
/// read accessors always answer `false`; the published value only tracks
/// the transient switch shadow (a pending dock request).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MainToggles {
    pub clean: bool,
    pub go_to_dock: bool,
    pub dock_occupied: bool,
    pub schedule: bool,
    pub eco: bool,
    pub no_go_lines: bool,
    pub extra_care: bool,
    pub spot_clean: bool,
    pub spot_repeat: bool,
    pub spot_width: Option<u16>,
    pub spot_height: Option<u16>,
    pub find_me: bool,
    pub battery_level: u8,
    pub charging: bool,
}

impl MainToggles {
    /// Render the published payload, omitting hidden categories.
    ///
    /// Battery, charging, and the clean switch are always present.
    #[must_use]
    pub fn to_payload(&self, hidden: &HiddenServices) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("clean".to_string(), json!(self.clean));
        map.insert("battery_level".to_string(), json!(self.battery_level));
        map.insert("charging".to_string(), json!(self.charging));

        if !hidden.contains(ServiceCategory::Dock) {
            map.insert("go_to_dock".to_string(), json!(self.go_to_dock));
        }
        if !hidden.contains(ServiceCategory::DockState) {
            map.insert("dock_occupied".to_string(), json!(self.dock_occupied));
        }
        if !hidden.contains(ServiceCategory::Schedule) {
            map.insert("schedule".to_string(), json!(self.schedule));
        }
        if !hidden.contains(ServiceCategory::Eco) {
            map.insert("eco".to_string(), json!(self.eco));
        }
        if !hidden.contains(ServiceCategory::NoGoLines) {
            map.insert("no_go_lines".to_string(), json!(self.no_go_lines));
        }
        if !hidden.contains(ServiceCategory::ExtraCare) {
            map.insert("extra_care".to_string(), json!(self.extra_care));
        }
        if !hidden.contains(ServiceCategory::Find) {
            map.insert("find_me".to_string(), json!(self.find_me));
        }
        if !hidden.contains(ServiceCategory::Spot) {
            map.insert("spot_clean".to_string(), json!(self.spot_clean));
            map.insert("spot_repeat".to_string(), json!(self.spot_repeat));
            if let Some(width) = self.spot_width {
                map.insert("spot_width".to_string(), json!(width));
            }
            if let Some(height) = self.spot_height {
                map.insert("spot_height".to_string(), json!(height));
            }
        }

        serde_json::Value::Object(map)
    }
}

/// Whole-robot representation.
#[derive(Debug, Clone)]
pub struct MainRepresentation {
    pub name: String,
    hidden: HiddenServices,
}

impl MainRepresentation {
    #[must_use]
    pub fn new(name: impl Into<String>, hidden: HiddenServices) -> Self {
        Self {
            name: name.into(),
            hidden,
        }
    }

    #[must_use]
    pub fn hidden(&self) -> &HiddenServices {
        &self.hidden
    }

    /// Re-derive the toggle values from the current snapshot.
    #[must_use]
    pub fn derive(&self, robot: &Robot, state: &RobotState, dock_requested: bool) -> MainToggles {
        MainToggles {
            clean: CleaningState::derive(state) == CleaningState::Cleaning,
            go_to_dock: dock_requested,
            dock_occupied: state.is_docked,
            schedule: state.is_schedule_enabled,
            eco: state.eco,
            no_go_lines: state.no_go_lines,
            extra_care: state.extra_care(),
            spot_clean: false,
            spot_repeat: state.spot_repeat,
            spot_width: robot.spot_plus.then_some(state.spot_width),
            spot_height: robot.spot_plus.then_some(state.spot_height),
            find_me: false,
            battery_level: state.charge,
            charging: state.is_charging,
        }
    }
}

/// Toggle values of a room representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomToggles {
    pub clean: bool,
}

/// Per-region representation, bound to one cleanable boundary.
#[derive(Debug, Clone)]
pub struct RoomRepresentation {
    pub region: BoundaryRegion,
    /// Display name, `"<robot> - <region>"`.
    pub display_name: String,
}

impl RoomRepresentation {
    #[must_use]
    pub fn new(robot_name: &str, region: BoundaryRegion) -> Self {
        let display_name = format!("{robot_name} - {}", region.name);
        Self {
            region,
            display_name,
        }
    }

    /// The room's clean switch is on while its region is actively cleaned.
    #[must_use]
    pub fn derive(&self, state: &RobotState) -> RoomToggles {
        RoomToggles {
            clean: CleaningState::derive(state) == CleaningState::Cleaning
                && state.cleaning_boundary.as_ref() == Some(&self.region.id),
        }
    }

    /// Render the published payload.
    #[must_use]
    pub fn payload(&self, state: &RobotState) -> serde_json::Value {
        json!({
            "region": self.region.id,
            "name": self.region.name,
            "clean": self.derive(state).clean,
        })
    }
}
