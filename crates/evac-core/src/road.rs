//! Road network records.
//!
//! Source data identifies nodes and links by string keys (OS ITN TOIDs such
//! as `osgb4000000026219224`).  The routing core keeps those keys for
//! reporting but addresses everything by arena index.
//!
//! Links arrive as [`LinkRecord`]s whose endpoints are still node keys.  Once
//! the endpoints are resolved to [`NodeId`]s and the altitude difference is
//! known, a record becomes a [`RoadLink`], the input of graph construction.

use crate::{Coord, NodeId};

/// A road-network junction.  Immutable once loaded.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadNode {
    pub key: String,
    pub pos: Coord,
}

impl RoadNode {
    pub fn new(key: impl Into<String>, pos: Coord) -> Self {
        Self { key: key.into(), pos }
    }
}

/// A road link as delivered by a network provider.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkRecord {
    pub key:      String,
    /// Key of the start node.
    pub start:    String,
    /// Key of the end node.
    pub end:      String,
    /// Length along the polyline, metres.
    pub length:   f64,
    /// Polyline from start to end.
    pub geometry: Vec<Coord>,
}

/// A link with resolved endpoints and its altitude change.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadLink {
    pub key:      String,
    pub start:    NodeId,
    pub end:      NodeId,
    pub length:   f64,
    pub geometry: Vec<Coord>,
    /// `altitude(end) - altitude(start)`, metres.
    pub altitude_difference: f64,
}
