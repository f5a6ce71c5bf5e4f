//! Boundary regions — named sub-areas of a floor map.
//!
//! Regions come from the robot's persisted maps. Only polygon regions are
//! cleanable rooms; polyline regions are no-go lines and never get their
//! own representation.

use serde::{Deserialize, Serialize};

use crate::id::{BoundaryId, MapId};

/// Geometry kind of a boundary as reported by the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    /// A closed region that can be cleaned on its own.
    Polygon,
    /// A no-go line; not cleanable.
    Polyline,
}

/// A named sub-area of the robot's operating space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryRegion {
    pub id: BoundaryId,
    pub name: String,
    pub kind: BoundaryKind,
}

impl BoundaryRegion {
    /// Create a region.
    #[must_use]
    pub fn new(id: impl Into<BoundaryId>, name: impl Into<String>, kind: BoundaryKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    /// Whether this region can be cleaned independently.
    #[must_use]
    pub fn is_cleanable(&self) -> bool {
        self.kind == BoundaryKind::Polygon
    }
}

/// A persisted floor map and the regions drawn on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorMap {
    pub id: MapId,
    pub boundaries: Vec<BoundaryRegion>,
}
