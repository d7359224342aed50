//! Ordnance Survey ITN JSON loader. Enabled with the `itn` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use evac_spatial::itn::load_itn;
//!
//! let network = load_itn(Path::new("itn/solent_itn.json"))?;
//! ```
//!
//! # Format
//!
//! ```text
//! {
//!   "roadnodes": { "<key>": { "coords": [x, y] }, ... },
//!   "roadlinks": { "<fid>": { "start": "<key>", "end": "<key>",
//!                             "length": 123.4, "coords": [[x, y], ...] }, ... }
//! }
//! ```
//!
//! Any other fields are ignored.  Nodes and links are added in key order, so
//! the same file always yields the same `NodeId`s and `LinkId`s.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Instant;

use log::info;
use serde::Deserialize;

use evac_core::Coord;

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::{SpatialError, SpatialResult};

#[derive(Deserialize)]
struct ItnFile {
    roadnodes: BTreeMap<String, ItnNode>,
    roadlinks: BTreeMap<String, ItnLink>,
}

#[derive(Deserialize)]
struct ItnNode {
    coords: Vec<f64>,
}

#[derive(Deserialize)]
struct ItnLink {
    start:  String,
    end:    String,
    length: f64,
    #[serde(default)]
    coords: Vec<Vec<f64>>,
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Load a road network from an ITN JSON file.
///
/// # Errors
///
/// [`SpatialError::Io`] if the file cannot be opened; [`SpatialError::Itn`]
/// on malformed JSON or coordinates.
pub fn load_itn(path: &Path) -> SpatialResult<RoadNetwork> {
    let started = Instant::now();
    let file = File::open(path)?;
    let network = parse_itn(BufReader::new(file))?;
    info!(
        "loaded ITN network from {}: {} nodes, {} links in {:?}",
        path.display(),
        network.node_count(),
        network.link_count(),
        started.elapsed()
    );
    Ok(network)
}

/// Parse ITN JSON from any reader.
pub fn parse_itn<R: Read>(reader: R) -> SpatialResult<RoadNetwork> {
    let file: ItnFile =
        serde_json::from_reader(reader).map_err(|e| SpatialError::Itn(e.to_string()))?;

    let mut b = RoadNetworkBuilder::with_capacity(file.roadnodes.len(), file.roadlinks.len());

    for (key, node) in file.roadnodes {
        let pos = coord(&node.coords).ok_or_else(|| {
            SpatialError::Itn(format!("road node {key}: expected [x, y], got {:?}", node.coords))
        })?;
        b.add_node(key, pos);
    }

    for (key, link) in file.roadlinks {
        let geometry = link
            .coords
            .iter()
            .map(|c| coord(c))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| SpatialError::Itn(format!("road link {key}: malformed coordinates")))?;
        b.add_link(key, link.start, link.end, link.length, geometry);
    }

    Ok(b.build())
}

/// `[x, y]` or `[x, y, z]`; extra ordinates are dropped.
fn coord(values: &[f64]) -> Option<Coord> {
    match values {
        [x, y, ..] => Some(Coord::new(*x, *y)),
        _ => None,
    }
}
