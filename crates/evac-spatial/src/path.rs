//! Shortest and fastest path queries returning link-level results.

use evac_core::{Coord, LinkId, NodeId};

use crate::network::RouteGraph;
use crate::router::{DijkstraRouter, Objective, Route, Router};
use crate::SpatialResult;

/// A path expressed as the road links it traverses.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathResult {
    /// Keys of the traversed links, in travel order.
    pub link_keys: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub links: Vec<LinkId>,
    /// One polyline per link, each oriented in the direction of travel.
    pub geometry: Vec<Vec<Coord>>,
    /// Per-link length in travel order, metres.
    pub link_lengths: Vec<f64>,
    /// Per-link walking time in travel order, minutes.
    pub link_times: Vec<f64>,
    /// Metres.
    pub total_length: f64,
    /// Minutes.
    pub total_time: f64,
}

impl PathResult {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    fn from_route(graph: &RouteGraph, route: &Route) -> Self {
        let n = route.edges.len();
        let mut out = PathResult {
            link_keys:    Vec::with_capacity(n),
            links:        Vec::with_capacity(n),
            geometry:     Vec::with_capacity(n),
            link_lengths: Vec::with_capacity(n),
            link_times:   Vec::with_capacity(n),
            total_length: 0.0,
            total_time:   0.0,
        };
        for &edge in &route.edges {
            let link = graph.edge_link[edge.index()];
            let (length, time) = (graph.edge_length[edge.index()], graph.edge_time[edge.index()]);
            out.link_keys.push(graph.link_keys[link.index()].clone());
            out.links.push(link);
            out.geometry.push(graph.edge_geometry(edge));
            out.link_lengths.push(length);
            out.link_times.push(time);
            out.total_length += length;
            out.total_time += time;
        }
        out
    }
}

/// Runs routing queries over one [`RouteGraph`].
///
/// # Example
///
/// ```
/// use evac_core::{Coord, NodeId, SpeedClass};
/// use evac_spatial::{resolve_links, PathFinder, RoadNetworkBuilder, RoadNetworkProvider,
///                    RouteGraphBuilder};
///
/// let mut b = RoadNetworkBuilder::new();
/// b.add_node("a", Coord::new(0.0, 0.0));
/// b.add_node("b", Coord::new(100.0, 0.0));
/// b.add_straight_link("ab", "a", "b");
/// let net = b.build();
///
/// let links = resolve_links(&net, |_| Ok::<_, evac_core::DomainError>(0.0)).unwrap();
/// let graph = RouteGraphBuilder::new(SpeedClass::Fast).build(net.nodes(), &links).unwrap();
/// let path = PathFinder::new(&graph).shortest(NodeId(0), NodeId(1)).unwrap();
/// assert_eq!(path.link_keys, vec!["ab".to_string()]);
/// ```
pub struct PathFinder<'g, R: Router = DijkstraRouter> {
    graph: &'g RouteGraph,
    router: R,
}

impl<'g> PathFinder<'g, DijkstraRouter> {
    pub fn new(graph: &'g RouteGraph) -> Self {
        Self { graph, router: DijkstraRouter }
    }
}

impl<'g, R: Router> PathFinder<'g, R> {
    pub fn with_router(graph: &'g RouteGraph, router: R) -> Self {
        Self { graph, router }
    }

    pub fn graph(&self) -> &'g RouteGraph {
        self.graph
    }

    /// Minimise `objective` from `from` to `to`.
    pub fn find(&self, from: NodeId, to: NodeId, objective: Objective) -> SpatialResult<PathResult> {
        let route = self.router.route(self.graph, from, to, objective)?;
        Ok(PathResult::from_route(self.graph, &route))
    }

    pub fn shortest(&self, from: NodeId, to: NodeId) -> SpatialResult<PathResult> {
        self.find(from, to, Objective::Length)
    }

    pub fn fastest(&self, from: NodeId, to: NodeId) -> SpatialResult<PathResult> {
        self.find(from, to, Objective::Time)
    }

    /// `(shortest, fastest)`.  The two queries share no state and run
    /// concurrently with the `parallel` feature.
    pub fn both(&self, from: NodeId, to: NodeId) -> SpatialResult<(PathResult, PathResult)> {
        #[cfg(feature = "parallel")]
        let (shortest, fastest) = rayon::join(
            || self.shortest(from, to),
            || self.fastest(from, to),
        );
        #[cfg(not(feature = "parallel"))]
        let (shortest, fastest) = (self.shortest(from, to), self.fastest(from, to));

        Ok((shortest?, fastest?))
    }
}
