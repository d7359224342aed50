//! `evac-plan`: evacuation route planning over an elevation source and a
//! road network.
//!
//! # Pipeline
//!
//! ```text
//! compute_plan(user, speed, radius):
//!   ① HighestPointFinder   widen the search until a point reaches the
//!                          threshold altitude (or the port declines)
//!   ② SpatialIndex         snap user and destination to road nodes
//!   ③ same node?           NoRouteAvailable, nothing else is built
//!   ④ RouteGraphBuilder    resolve links, slope-aware edge times
//!   ⑤ PathFinder           shortest and fastest path
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Rayon for link costing and the two path queries.        |
//! | `serde`    | `Serialize`/`Deserialize` on `RoutePlan` and contents.  |

pub mod error;
pub mod export;
pub mod planner;
pub mod search;

#[cfg(test)]
mod tests;

pub use error::{PlanError, PlanResult};
pub use export::{write_route, write_route_csv};
pub use planner::{RoutePlan, RoutePlanner};
pub use search::{ConfirmationPort, Decline, HighestPointFinder, SearchOutcome, SearchState};
