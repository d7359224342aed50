//! One planning call: destination search, node snapping, graph build, and
//! both path queries.

use std::time::Instant;

use log::{debug, info};

use evac_core::{Coord, Fitness, NodeId, SearchConfig, SpeedClass};
use evac_elevation::{ElevationLookup, ElevationProvider};
use evac_spatial::{
    resolve_links, PathFinder, PathResult, RTreeIndex, RoadNetworkProvider, RouteGraphBuilder,
    SpatialIndex,
};

use crate::search::{ConfirmationPort, Decline, HighestPointFinder};
use crate::{PlanError, PlanResult};

/// Everything one planning call produces.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutePlan {
    pub speed_class: SpeedClass,
    /// Highest point found by the search.
    pub destination: Coord,
    pub destination_altitude: f64,
    pub user_altitude: f64,
    pub final_search_radius: f64,
    pub threshold_met: bool,
    pub nearest_user_node: NodeId,
    pub nearest_dest_node: NodeId,
    pub shortest_path: PathResult,
    pub fastest_path: PathResult,
    /// Straight segment from the user to their nearest node.
    pub user_connector: [Coord; 2],
    /// Straight segment from the destination's nearest node to the
    /// destination.
    pub dest_connector: [Coord; 2],
}

/// Plans evacuation routes over one elevation source and one road network.
///
/// # Example
///
/// ```rust,ignore
/// let mut planner = RoutePlanner::new(&raster, &network)
///     .config(SearchConfig::default())
///     .confirmation(|radius: f64| ask_user(radius));
/// let plan = planner.plan_for_fitness(user, Fitness::new(7)?)?;
/// ```
pub struct RoutePlanner<'a, E, N, C = Decline>
where
    E: ElevationProvider + ?Sized,
    N: RoadNetworkProvider + ?Sized,
    C: ConfirmationPort,
{
    elevation: &'a E,
    network:   &'a N,
    config:    SearchConfig,
    port:      C,
}

impl<'a, E, N> RoutePlanner<'a, E, N, Decline>
where
    E: ElevationProvider + ?Sized,
    N: RoadNetworkProvider + ?Sized,
{
    /// Planner with the default configuration that never searches past the
    /// hard cap.
    pub fn new(elevation: &'a E, network: &'a N) -> Self {
        Self { elevation, network, config: SearchConfig::default(), port: Decline }
    }
}

impl<'a, E, N, C> RoutePlanner<'a, E, N, C>
where
    E: ElevationProvider + ?Sized,
    N: RoadNetworkProvider + ?Sized,
    C: ConfirmationPort,
{
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the confirmation port.
    pub fn confirmation<C2: ConfirmationPort>(self, port: C2) -> RoutePlanner<'a, E, N, C2> {
        RoutePlanner {
            elevation: self.elevation,
            network:   self.network,
            config:    self.config,
            port,
        }
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.config
    }

    /// Plan with the speed class and initial radius implied by `fitness`.
    pub fn plan_for_fitness(&mut self, user_location: Coord, fitness: Fitness) -> PlanResult<RoutePlan> {
        let speed = fitness.speed_class();
        self.compute_plan(user_location, speed, speed.search_radius())
    }

    /// Plan a route from `user_location` to the highest point nearby.
    ///
    /// # Errors
    ///
    /// - [`PlanError::NoRouteAvailable`] if the user and destination snap to
    ///   the same node.  No graph is built in that case.
    /// - [`PlanError::NoPathFound`] if the destination node is unreachable.
    /// - [`PlanError::EmptyNetwork`] if the network has no nodes.
    /// - [`PlanError::Domain`] for an invalid link (dangling key, zero length).
    /// - Search errors as in [`HighestPointFinder::search`].
    pub fn compute_plan(&mut self, user_location: Coord, speed: SpeedClass, initial_radius: f64) -> PlanResult<RoutePlan> {
        let started = Instant::now();
        info!("planning from {user_location} ({speed} walker, initial radius {initial_radius} m)");

        // ── ① Destination ─────────────────────────────────────────────────
        let finder = HighestPointFinder::new(self.elevation, self.config.clone());
        let found = finder.search(user_location, initial_radius, &mut self.port)?;

        // ── ② Snap both ends to the network ───────────────────────────────
        let nodes = self.network.nodes();
        let index = RTreeIndex::bulk_load(nodes);
        let user_node = index.nearest(user_location).ok_or(PlanError::EmptyNetwork)?;
        let dest_node = index.nearest(found.destination).ok_or(PlanError::EmptyNetwork)?;
        debug!(
            "user snapped to {} at {}, destination to {} at {}",
            user_node.id, user_node.pos, dest_node.id, dest_node.pos
        );

        // ── ③ Degenerate plan ─────────────────────────────────────────────
        if user_node.id == dest_node.id {
            return Err(PlanError::NoRouteAvailable { node: user_node.id });
        }

        // ── ④ Graph + paths ───────────────────────────────────────────────
        let lookup = ElevationLookup::new(self.elevation);
        let links = resolve_links(self.network, |at| lookup.altitude_at(at).map_err(PlanError::from))?;
        let graph = RouteGraphBuilder::new(speed).build(nodes, &links)?;
        let (shortest_path, fastest_path) = PathFinder::new(&graph).both(user_node.id, dest_node.id)?;

        info!(
            "planned in {:?}: shortest {:.0} m / {:.1} min, fastest {:.0} m / {:.1} min",
            started.elapsed(),
            shortest_path.total_length,
            shortest_path.total_time,
            fastest_path.total_length,
            fastest_path.total_time
        );

        Ok(RoutePlan {
            speed_class:          speed,
            destination:          found.destination,
            destination_altitude: found.destination_altitude,
            user_altitude:        found.center_altitude,
            final_search_radius:  found.final_radius,
            threshold_met:        found.threshold_met,
            nearest_user_node:    user_node.id,
            nearest_dest_node:    dest_node.id,
            shortest_path,
            fastest_path,
            user_connector:       [user_location, user_node.pos],
            dest_connector:       [dest_node.pos, found.destination],
        })
    }
}
