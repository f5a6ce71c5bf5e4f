//! Typed identifier newtypes.
//!
//! Robot serials, map ids, and boundary ids are assigned by the device cloud
//! and are opaque strings from our point of view. Event ids are generated
//! locally and are UUID-backed.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_str_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a cloud-assigned identifier.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Access the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_str_id!(
    /// Serial number identifying a [`Robot`](crate::robot::Robot).
    Serial
);

define_str_id!(
    /// Identifier of a persisted floor map.
    MapId
);

define_str_id!(
    /// Identifier of a [`BoundaryRegion`](crate::boundary::BoundaryRegion).
    BoundaryId
);

impl Serial {
    /// Partially masked form for log output.
    ///
    /// Keeps the first nine characters (enough to tell robots apart)
    /// and blanks the rest.
    #[must_use]
    pub fn masked(&self) -> String {
        let prefix: String = self.0.chars().take(9).collect();
        format!("{prefix}XXXXXXXXXXXX")
    }
}

/// Unique identifier for an [`Event`](crate::event::Event).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(uuid::Uuid);

impl Default for EventId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl EventId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
