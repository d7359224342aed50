//! `evac-spatial`: walking costs, road graph, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`cost`]    | `time_weight`, `TimeWeights`, `SlopeDirection`              |
//! | [`network`] | `RoadNetwork` (source records), `RouteGraph` (CSR), builder |
//! | [`index`]   | `SpatialIndex` trait, `RTreeIndex`, `BruteForceIndex`       |
//! | [`router`]  | `Router` trait, `Route`, `Objective`, `DijkstraRouter`      |
//! | [`path`]    | `PathFinder`, `PathResult`                                  |
//! | [`itn`]     | `load_itn` (feature = `"itn"` only)                         |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Rayon for link costing and the two path queries.            |
//! | `itn`      | Enables OS ITN JSON loading via `serde_json`.               |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.          |

pub mod cost;
pub mod error;
pub mod index;
pub mod network;
pub mod path;
pub mod router;

#[cfg(feature = "itn")]
pub mod itn;


pub use cost::{SlopeDirection, TimeWeights, time_weight};
pub use error::{SpatialError, SpatialResult};
pub use index::{BruteForceIndex, RTreeIndex, Snapped, SpatialIndex};
pub use network::{
    RoadNetwork, RoadNetworkBuilder, RoadNetworkProvider, RouteGraph, RouteGraphBuilder,
    resolve_links,
};
pub use path::{PathFinder, PathResult};
pub use router::{DijkstraRouter, Objective, Route, Router};
