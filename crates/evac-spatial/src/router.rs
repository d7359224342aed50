//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! [`PathFinder`](crate::PathFinder) calls routing through the [`Router`]
//! trait, so A* or a precomputed hierarchy can replace the default
//! [`DijkstraRouter`] without touching the planner.
//!
//! # Objectives
//!
//! Every edge carries two weights: `edge_length` (metres) and `edge_time`
//! (minutes).  Both are non-negative by construction (the cost model floors
//! descending times at 0.001), so plain Dijkstra is exact for either.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use evac_core::{EdgeId, NodeId};

use crate::network::RouteGraph;
use crate::{SpatialError, SpatialResult};

/// Which edge weight a query minimises.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Objective {
    /// Shortest distance.
    Length,
    /// Fastest walking time.
    Time,
}

impl Objective {
    #[inline]
    pub fn weight(self, graph: &RouteGraph, edge: EdgeId) -> f64 {
        match self {
            Objective::Length => graph.edge_length[edge.index()],
            Objective::Time   => graph.edge_time[edge.index()],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Objective::Length => "shortest",
            Objective::Time   => "fastest",
        }
    }
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: edges in travel order and the minimised
/// total.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub edges: Vec<EdgeId>,
    /// Sum of the objective's weight over `edges`.
    pub cost: f64,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable single-source shortest-path engine.
///
/// Implementations must be `Send + Sync`: both objectives may be queried
/// concurrently over the same graph.
pub trait Router: Send + Sync {
    /// Compute the cheapest route from `from` to `to` under `objective`.
    ///
    /// `from == to` yields an empty route.  Unreachable targets yield
    /// [`SpatialError::NoPath`].
    fn route(
        &self,
        graph: &RouteGraph,
        from: NodeId,
        to: NodeId,
        objective: Objective,
    ) -> SpatialResult<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra over the CSR graph with a binary heap.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        graph: &RouteGraph,
        from: NodeId,
        to: NodeId,
        objective: Objective,
    ) -> SpatialResult<Route> {
        for node in [from, to] {
            if !graph.contains(node) {
                return Err(SpatialError::NodeNotFound(node));
            }
        }
        dijkstra(graph, from, to, objective)
    }
}

fn dijkstra(graph: &RouteGraph, from: NodeId, to: NodeId, objective: Objective) -> SpatialResult<Route> {
    if from == to {
        return Ok(Route { edges: vec![], cost: 0.0 });
    }

    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    // prev_edge[v] = edge that reached v.  Tracking edges rather than nodes
    // keeps parallel links apart during reconstruction.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Min-heap via Reverse; NodeId as secondary key for deterministic order.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), from)));

    while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(graph, &prev_edge, from, to, cost));
        }

        // Stale entry.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            let next = cost + objective.weight(graph, edge);

            if next < dist[neighbor.index()] {
                dist[neighbor.index()] = next;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((OrderedFloat(next), neighbor)));
            }
        }
    }

    Err(SpatialError::NoPath { from, to })
}

fn reconstruct(graph: &RouteGraph, prev_edge: &[EdgeId], from: NodeId, to: NodeId, cost: f64) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();
    Route { edges, cost }
}
