//! Robot — a cloud-connected vacuum and the snapshot of its remote state.
//!
//! [`Robot`] holds the identity fixed at discovery. [`RobotState`] is the
//! mutable snapshot last fetched from the cloud; the whole system reads
//! through it, and local toggle writes (eco, spot size, …) land here until
//! the next fetch overwrites them.

use serde::{Deserialize, Serialize};

use crate::error::{RobovacError, ValidationError};
use crate::id::{BoundaryId, Serial};

/// Identity of a discovered robot. Immutable after discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    pub serial: Serial,
    pub name: String,
    pub model: Option<String>,
    pub firmware: Option<String>,
    /// Whether the robot reported sized spot cleaning at discovery time.
    /// Gates the width/height spot parameters for the whole process
    /// lifetime.
    pub spot_plus: bool,
}

impl Robot {
    /// Create a builder for constructing a [`Robot`].
    #[must_use]
    pub fn builder() -> RobotBuilder {
        RobotBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RobovacError::Validation`] when `name` or `serial` is empty.
    pub fn validate(&self) -> Result<(), RobovacError> {
        if self.serial.as_str().is_empty() {
            return Err(ValidationError::EmptySerial.into());
        }
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Robot`].
#[derive(Debug, Default)]
pub struct RobotBuilder {
    serial: Option<Serial>,
    name: Option<String>,
    model: Option<String>,
    firmware: Option<String>,
    spot_plus: bool,
}

impl RobotBuilder {
    #[must_use]
    pub fn serial(mut self, serial: impl Into<Serial>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn firmware(mut self, firmware: impl Into<String>) -> Self {
        self.firmware = Some(firmware.into());
        self
    }

    #[must_use]
    pub fn spot_plus(mut self, spot_plus: bool) -> Self {
        self.spot_plus = spot_plus;
        self
    }

    /// Consume the builder, validate, and return a [`Robot`].
    ///
    /// # Errors
    ///
    /// Returns [`RobovacError::Validation`] if `serial` or `name` is
    /// missing or empty.
    pub fn build(self) -> Result<Robot, RobovacError> {
        let robot = Robot {
            serial: self.serial.unwrap_or_else(|| Serial::new("")),
            name: self.name.unwrap_or_default(),
            model: self.model,
            firmware: self.firmware,
            spot_plus: self.spot_plus,
        };
        robot.validate()?;
        Ok(robot)
    }
}

/// Navigation mode reported and requested through the cloud.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    #[default]
    Normal,
    /// Slower navigation that keeps more distance from obstacles.
    ExtraCare,
}

/// Snapshot of the remote robot state as of the last successful fetch.
///
/// Capability flags describe which actions the cloud will currently
/// accept; they change asynchronously and must be re-read before every
/// control decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotState {
    pub can_pause: bool,
    pub can_resume: bool,
    pub can_start: bool,
    pub can_go_to_base: bool,

    pub is_docked: bool,
    pub is_charging: bool,
    /// The robot has located its dock since it last left it.
    pub dock_has_been_seen: bool,
    /// Battery charge, 0–100.
    pub charge: u8,

    pub eco: bool,
    pub no_go_lines: bool,
    pub navigation_mode: NavigationMode,

    pub spot_width: u16,
    pub spot_height: u16,
    pub spot_repeat: bool,

    pub is_schedule_enabled: bool,

    /// Region currently being cleaned, if the active run is region-scoped.
    pub cleaning_boundary: Option<BoundaryId>,
}

impl RobotState {
    /// Whether the extra-care navigation mode is active.
    #[must_use]
    pub fn extra_care(&self) -> bool {
        self.navigation_mode == NavigationMode::ExtraCare
    }
}
