//! Unit tests for evac-plan.
//!
//! Every test runs against a synthetic hill so no DEM or ITN file is needed.

#[cfg(test)]
mod helpers {
    use evac_core::{Coord, SearchConfig};
    use evac_elevation::{GeoTransform, Grid, Raster};
    use evac_spatial::{RoadNetwork, RoadNetworkBuilder};

    pub const PEAK: Coord = Coord::new(800.0, 800.0);
    pub const USER: Coord = Coord::new(200.0, 200.0);

    /// 50×50 raster of 20 m cells covering (0,0)–(1000,1000).  A cone peaks
    /// at 100 m over [`PEAK`] and falls 1 m per 10 m of distance.
    pub fn hill() -> Raster {
        let rows: Vec<Vec<f64>> = (0..50)
            .map(|r| {
                (0..50)
                    .map(|c| {
                        let at = Coord::new(10.0 + 20.0 * c as f64, 990.0 - 20.0 * r as f64);
                        (100.0 - at.distance(PEAK) / 10.0).max(0.0)
                    })
                    .collect()
            })
            .collect();
        Raster::new(Grid::from_rows(&rows).unwrap(), GeoTransform::square(0.0, 1000.0, 20.0)).unwrap()
    }

    /// From [`USER`], 70 m is first reached at radius 600.
    pub fn config() -> SearchConfig {
        SearchConfig {
            threshold_altitude: 70.0,
            hard_cap_radius:    1000.0,
            step:               100.0,
            confirm_step:       100.0,
        }
    }

    /// A threshold the hill never reaches.
    pub fn unreachable_config() -> SearchConfig {
        SearchConfig {
            threshold_altitude: 150.0,
            hard_cap_radius:    700.0,
            step:               300.0,
            confirm_step:       250.0,
        }
    }

    /// ```text
    ///                       p (800,800)
    ///                      /
    ///               d (620,620)
    ///              /        \
    ///       m (400,400)      w (600,200)
    ///       /               /
    ///  u (200,210) ────────
    /// ```
    pub fn roads() -> RoadNetwork {
        road_builder().build()
    }

    pub fn road_builder() -> RoadNetworkBuilder {
        let mut b = RoadNetworkBuilder::new();
        b.add_node("u", Coord::new(200.0, 210.0));
        b.add_node("m", Coord::new(400.0, 400.0));
        b.add_node("d", Coord::new(620.0, 620.0));
        b.add_node("p", Coord::new(800.0, 800.0));
        b.add_node("w", Coord::new(600.0, 200.0));
        b.add_straight_link("um", "u", "m");
        b.add_straight_link("md", "m", "d");
        b.add_straight_link("dp", "d", "p");
        b.add_straight_link("uw", "u", "w");
        b.add_straight_link("wd", "w", "d");
        b
    }
}

// ── Highest-point search ──────────────────────────────────────────────────────

#[cfg(test)]
mod search {
    use evac_core::{Coord, SearchConfig};
    use evac_elevation::ElevationError;

    use super::helpers::{config, hill, unreachable_config, PEAK, USER};
    use crate::{Decline, HighestPointFinder, PlanError};

    #[test_log::test]
    fn found_after_escalation() {
        let raster = hill();
        let out = HighestPointFinder::new(&raster, config()).search(USER, 200.0, &mut Decline).unwrap();

        assert!(out.threshold_met);
        assert_eq!(out.radii, vec![200.0, 300.0, 400.0, 500.0, 600.0]);
        assert_eq!(out.final_radius, 600.0);
        assert!(out.destination_altitude >= 70.0);
        assert!(out.destination.distance(USER) <= 600.0);
        assert!(out.destination.distance(PEAK) < USER.distance(PEAK));
    }

    #[test_log::test]
    fn found_immediately() {
        let raster = hill();
        let out = HighestPointFinder::new(&raster, config()).search(PEAK, 100.0, &mut Decline).unwrap();
        assert!(out.threshold_met);
        assert_eq!(out.radii, vec![100.0]);
        assert!(out.center_altitude > 95.0);
    }

    #[test_log::test]
    fn capped_search_clamps_and_declines() {
        let raster = hill();
        let out = HighestPointFinder::new(&raster, unreachable_config())
            .search(USER, 200.0, &mut Decline)
            .unwrap();

        assert!(!out.threshold_met);
        assert_eq!(out.radii, vec![200.0, 500.0, 700.0]);
        assert_eq!(out.final_radius, 700.0);
        assert!(out.destination_altitude < 150.0);
    }

    #[test_log::test]
    fn confirmation_widens_past_cap() {
        let raster = hill();
        let mut asked = Vec::new();
        let mut port = |radius: f64| {
            asked.push(radius);
            asked.len() <= 2
        };
        let out = HighestPointFinder::new(&raster, unreachable_config())
            .search(USER, 200.0, &mut port)
            .unwrap();

        assert_eq!(asked, vec![700.0, 950.0, 1200.0]);
        assert_eq!(out.radii, vec![200.0, 500.0, 700.0, 950.0, 1200.0]);
        assert_eq!(out.final_radius, 1200.0);
        assert!(!out.threshold_met);
    }

    #[test_log::test]
    fn radii_are_strictly_increasing() {
        let raster = hill();
        let cfg = SearchConfig { step: 70.0, ..unreachable_config() };
        let mut grants = 3;
        let mut port = |_: f64| {
            grants -= 1;
            grants >= 0
        };
        let out = HighestPointFinder::new(&raster, cfg).search(USER, 150.0, &mut port).unwrap();
        assert!(out.radii.windows(2).all(|w| w[0] < w[1]));
        assert!(out.radii.contains(&700.0));
    }

    #[test_log::test]
    fn higher_search_never_finds_lower_point() {
        let raster = hill();
        let finder = HighestPointFinder::new(&raster, unreachable_config());
        let small = finder.search(USER, 700.0, &mut Decline).unwrap();
        let mut once = true;
        let mut port = |_: f64| std::mem::replace(&mut once, false);
        let large = finder.search(USER, 700.0, &mut port).unwrap();
        assert!(large.destination_altitude >= small.destination_altitude);
    }

    #[test]
    fn region_without_cell_centres_is_empty() {
        // The nearest cell centre, (10,10), is 12.7 m from the search centre.
        let raster = hill();
        let err = HighestPointFinder::new(&raster, config())
            .search(Coord::new(1.0, 1.0), 5.0, &mut Decline)
            .unwrap_err();
        assert!(matches!(err, PlanError::Elevation(ElevationError::RegionEmpty)));
    }

    #[test]
    fn centre_outside_coverage_fails() {
        let raster = hill();
        let err = HighestPointFinder::new(&raster, config())
            .search(Coord::new(-500.0, -500.0), 100.0, &mut Decline)
            .unwrap_err();
        assert!(matches!(err, PlanError::Elevation(ElevationError::OutOfCoverage(_))));
    }

    #[test]
    fn initial_radius_above_cap_is_config_error() {
        let raster = hill();
        let err = HighestPointFinder::new(&raster, config())
            .search(USER, 5000.0, &mut Decline)
            .unwrap_err();
        assert!(matches!(err, PlanError::Config(_)));
    }

    #[test]
    fn zero_step_is_config_error() {
        let raster = hill();
        let cfg = SearchConfig { step: 0.0, ..config() };
        let err = HighestPointFinder::new(&raster, cfg).search(USER, 200.0, &mut Decline).unwrap_err();
        assert!(matches!(err, PlanError::Config(_)));
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use approx::assert_relative_eq;
    use evac_core::{Coord, DomainError, Fitness, NodeId, SearchConfig, SpeedClass};
    use evac_elevation::{ElevationError, ElevationProvider};
    use evac_spatial::RoadNetworkBuilder;

    use super::helpers::{config, hill, road_builder, roads, PEAK, USER};
    use crate::{PlanError, RoutePlanner};

    #[test_log::test]
    fn plans_both_paths_to_the_hill() {
        let (raster, net) = (hill(), roads());
        let plan = RoutePlanner::new(&raster, &net)
            .config(config())
            .compute_plan(USER, SpeedClass::Medium, 200.0)
            .unwrap();

        assert!(plan.threshold_met);
        assert_eq!(plan.final_search_radius, 600.0);
        assert_eq!(plan.speed_class, SpeedClass::Medium);
        assert_eq!(plan.nearest_user_node, NodeId(0));
        assert_eq!(plan.nearest_dest_node, NodeId(2));
        assert_relative_eq!(plan.user_altitude, raster.altitude_at(USER).unwrap());

        assert_eq!(plan.shortest_path.link_keys, vec!["um".to_string(), "md".to_string()]);
        assert!(plan.shortest_path.total_length <= plan.fastest_path.total_length);
        assert!(plan.fastest_path.total_time <= plan.shortest_path.total_time);

        assert_eq!(plan.user_connector, [USER, Coord::new(200.0, 210.0)]);
        assert_eq!(plan.dest_connector, [Coord::new(620.0, 620.0), plan.destination]);
    }

    #[test_log::test]
    fn path_geometry_starts_at_user_node() {
        let (raster, net) = (hill(), roads());
        let plan = RoutePlanner::new(&raster, &net)
            .config(config())
            .compute_plan(USER, SpeedClass::Fast, 200.0)
            .unwrap();
        let first = &plan.fastest_path.geometry[0];
        assert_eq!(first[0], Coord::new(200.0, 210.0));
        let last = plan.fastest_path.geometry.last().unwrap();
        assert_eq!(*last.last().unwrap(), Coord::new(620.0, 620.0));
    }

    #[test_log::test]
    fn plan_for_fitness_uses_speed_radius() {
        let (raster, net) = (hill(), roads());
        let cfg = SearchConfig { hard_cap_radius: 5000.0, ..config() };
        let plan = RoutePlanner::new(&raster, &net)
            .config(cfg)
            .plan_for_fitness(USER, Fitness::new(7).unwrap())
            .unwrap();

        assert_eq!(plan.speed_class, SpeedClass::Fast);
        assert_eq!(plan.final_search_radius, 5000.0);
        // Four cells touch the summit; the north-west one is first in
        // row-major order.
        assert_eq!(plan.destination, Coord::new(790.0, 810.0));
        assert_eq!(plan.nearest_dest_node, NodeId(3));
        assert!(plan.destination_altitude > 98.0);
    }

    #[test]
    fn coincident_nodes_skip_graph_build() {
        // The dangling link would fail graph construction if it were reached.
        let raster = hill();
        let mut b = RoadNetworkBuilder::new();
        b.add_node("only", Coord::new(500.0, 500.0));
        b.add_link("bad", "only", "ghost", 10.0, vec![]);
        let net = b.build();

        let err = RoutePlanner::new(&raster, &net)
            .config(config())
            .compute_plan(USER, SpeedClass::Slow, 200.0)
            .unwrap_err();
        assert!(matches!(err, PlanError::NoRouteAvailable { node: NodeId(0) }));
    }

    #[test]
    fn dangling_link_is_domain_error() {
        let raster = hill();
        let mut b = RoadNetworkBuilder::new();
        b.add_node("u", Coord::new(200.0, 200.0));
        b.add_node("d", Coord::new(620.0, 620.0));
        b.add_link("bad", "u", "ghost", 10.0, vec![]);
        let net = b.build();

        let err = RoutePlanner::new(&raster, &net)
            .config(config())
            .compute_plan(USER, SpeedClass::Slow, 200.0)
            .unwrap_err();
        assert!(matches!(err, PlanError::Domain(DomainError::UnknownNode { .. })));
    }

    #[test]
    fn disconnected_destination_is_no_path() {
        let raster = hill();
        let mut b = RoadNetworkBuilder::new();
        b.add_node("u", Coord::new(200.0, 200.0));
        b.add_node("x", Coord::new(250.0, 200.0));
        b.add_node("d", Coord::new(620.0, 620.0));
        b.add_straight_link("ux", "u", "x");
        let net = b.build();

        let err = RoutePlanner::new(&raster, &net)
            .config(config())
            .compute_plan(USER, SpeedClass::Fast, 200.0)
            .unwrap_err();
        assert!(matches!(err, PlanError::NoPathFound { from: NodeId(0), to: NodeId(2) }));
    }

    #[test_log::test]
    fn unlinked_node_off_the_raster_is_ignored() {
        let raster = hill();
        let mut b = road_builder();
        b.add_node("ferry", Coord::new(5000.0, 5000.0));
        let net = b.build();

        let plan = RoutePlanner::new(&raster, &net)
            .config(config())
            .compute_plan(USER, SpeedClass::Medium, 200.0)
            .unwrap();
        assert_eq!(plan.shortest_path.link_keys, vec!["um".to_string(), "md".to_string()]);
    }

    #[test]
    fn linked_node_off_the_raster_fails_the_plan() {
        let raster = hill();
        let mut b = road_builder();
        b.add_node("ferry", Coord::new(1500.0, 620.0));
        b.add_straight_link("df", "d", "ferry");
        let net = b.build();

        let err = RoutePlanner::new(&raster, &net)
            .config(config())
            .compute_plan(USER, SpeedClass::Medium, 200.0)
            .unwrap_err();
        assert!(matches!(err, PlanError::Elevation(ElevationError::OutOfCoverage(_))));
    }

    #[test]
    fn empty_network_is_rejected() {
        let raster = hill();
        let net = RoadNetworkBuilder::new().build();
        let err = RoutePlanner::new(&raster, &net)
            .config(config())
            .compute_plan(USER, SpeedClass::Fast, 200.0)
            .unwrap_err();
        assert!(matches!(err, PlanError::EmptyNetwork));
    }

    #[test]
    fn confirmation_port_reaches_planner() {
        let (raster, net) = (hill(), roads());
        let cfg = SearchConfig { threshold_altitude: 99.5, hard_cap_radius: 300.0, ..config() };
        let mut asked = 0;
        let plan = RoutePlanner::new(&raster, &net)
            .config(cfg)
            .confirmation(|_: f64| {
                asked += 1;
                asked < 3
            })
            .compute_plan(PEAK, SpeedClass::Fast, 300.0);
        // The summit cells sit at ~98.6 m, so the threshold is never met and
        // the destination snaps to the summit node the user already stands on.
        assert!(matches!(plan, Err(PlanError::NoRouteAvailable { node: NodeId(3) })));
        assert_eq!(asked, 3);
    }
}

// ── CSV export ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod export {
    use evac_core::SpeedClass;

    use super::helpers::{config, hill, roads, USER};
    use crate::{write_route, write_route_csv, RoutePlan, RoutePlanner};

    fn plan() -> RoutePlan {
        let (raster, net) = (hill(), roads());
        RoutePlanner::new(&raster, &net)
            .config(config())
            .compute_plan(USER, SpeedClass::Slow, 200.0)
            .unwrap()
    }

    #[test]
    fn writes_one_row_per_link() {
        let plan = plan();
        let mut buf = Vec::new();
        write_route(&plan, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "objective,seq,link,length,time");
        assert_eq!(lines.len(), 1 + plan.shortest_path.len() + plan.fastest_path.len());
        assert!(lines[1].starts_with("shortest,0,um,"));
        assert!(lines.iter().any(|l| l.starts_with("fastest,0,")));
    }

    #[test]
    fn writes_file() {
        let plan = plan();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.csv");
        write_route_csv(&plan, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), plan.shortest_path.len() + plan.fastest_path.len());
        let total: f64 = rows
            .iter()
            .filter(|r| &r[0] == "shortest")
            .map(|r| r[3].parse::<f64>().unwrap())
            .sum();
        assert!((total - plan.shortest_path.total_length).abs() < 0.01);
    }
}
