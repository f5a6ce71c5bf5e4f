//! Event — an immutable record published on the fan-out bus.
//!
//! Every refresh cycle ends by publishing the freshly derived toggle
//! values of each representation. Accessory-protocol adapters subscribe
//! and render them; the core never knows who is listening.

use serde::{Deserialize, Serialize};

use crate::id::{EventId, Serial};
use crate::time::{self, Timestamp};

/// Kind of a published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// The main (whole-robot) representation re-derived its toggles.
    MainUpdated,
    /// A room representation re-derived its toggles.
    RoomUpdated,
    /// The find-me switch reverts to off after its local delay.
    FindMeReset,
}

/// An immutable record of a representation update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    pub serial: Serial,
    pub data: serde_json::Value,
    pub at: Timestamp,
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(event_type: EventType, serial: Serial, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            serial,
            data,
            at: time::now(),
        }
    }
}
