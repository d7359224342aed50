//! `evac-core`: foundational types for the `evac` routing workspace.
//!
//! This crate is a dependency of every other `evac-*` crate.  It has no
//! `evac-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                               |
//! |-------------|--------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `LinkId`, `EdgeId`                           |
//! | [`geo`]     | `Coord` (planar, projected metres)                     |
//! | [`road`]    | `RoadNode`, `LinkRecord`, `RoadLink`                   |
//! | [`speed`]   | `SpeedClass`, `Fitness`                                |
//! | [`config`]  | `SearchConfig`                                         |
//! | [`error`]   | `DomainError`, `DomainResult`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod road;
pub mod speed;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SearchConfig;
pub use error::{DomainError, DomainResult};
pub use geo::Coord;
pub use ids::{EdgeId, LinkId, NodeId};
pub use road::{LinkRecord, RoadLink, RoadNode};
pub use speed::{Fitness, SpeedClass};
