//! Road network records and the directed route graph built from them.
//!
//! # Two representations
//!
//! - [`RoadNetwork`] holds the network as delivered by a provider: nodes in
//!   arena order and link records whose endpoints are still node keys.  It
//!   lives as long as the loaded data.
//! - [`RouteGraph`] is the routing view, rebuilt for every planning call from
//!   resolved [`RoadLink`]s and one [`SpeedClass`].  It is never mutated after
//!   [`RouteGraphBuilder::build`] returns.
//!
//! # Graph layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Every link contributes exactly two edges, start→end and end→start, with
//! equal `edge_length` and slope-dependent `edge_time`.  Edges are stored by
//! source node; within one source node they keep link order, forward edge
//! first.  Parallel links between the same pair of nodes stay distinct edges,
//! each tagged with its own `edge_link`.

use std::time::Instant;

use log::debug;
use rustc_hash::FxHashMap;

use evac_core::{
    Coord, DomainError, DomainResult, EdgeId, LinkId, LinkRecord, NodeId, RoadLink, RoadNode,
    SpeedClass,
};

use crate::cost::{SlopeDirection, time_weight};

// ── Provider contract ─────────────────────────────────────────────────────────

/// Source of already-parsed road-network records.
pub trait RoadNetworkProvider {
    /// All nodes; a node's position in this slice is its [`NodeId`].
    fn nodes(&self) -> &[RoadNode];

    /// All links; a link's position in this slice is its [`LinkId`].
    fn links(&self) -> &[LinkRecord];
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// In-memory road network records.
///
/// Construct with [`RoadNetworkBuilder`] or a loader such as
/// `itn::load_itn`.
#[derive(Clone, Debug, Default)]
pub struct RoadNetwork {
    nodes: Vec<RoadNode>,
    links: Vec<LinkRecord>,
}

impl RoadNetwork {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn link_count(&self) -> usize { self.links.len() }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    pub fn node(&self, id: NodeId) -> Option<&RoadNode> {
        self.nodes.get(id.index())
    }
}

impl RoadNetworkProvider for RoadNetwork {
    fn nodes(&self) -> &[RoadNode] {
        &self.nodes
    }

    fn links(&self) -> &[LinkRecord] {
        &self.links
    }
}

/// Collect nodes and links, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use evac_core::Coord;
/// use evac_spatial::{RoadNetworkBuilder, RoadNetworkProvider};
///
/// let mut b = RoadNetworkBuilder::new();
/// b.add_node("a", Coord::new(0.0, 0.0));
/// b.add_node("b", Coord::new(100.0, 0.0));
/// b.add_straight_link("ab", "a", "b");
/// let net = b.build();
/// assert_eq!(net.links()[0].length, 100.0);
/// ```
#[derive(Default)]
pub struct RoadNetworkBuilder {
    nodes: Vec<RoadNode>,
    links: Vec<LinkRecord>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, links: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            links: Vec::with_capacity(links),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, key: impl Into<String>, pos: Coord) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(RoadNode::new(key, pos));
        id
    }

    /// Add a link record.  Endpoints are node keys and are not checked until
    /// the links are resolved.
    pub fn add_link(
        &mut self,
        key:      impl Into<String>,
        start:    impl Into<String>,
        end:      impl Into<String>,
        length:   f64,
        geometry: Vec<Coord>,
    ) -> LinkId {
        let id = LinkId(self.links.len() as u32);
        self.links.push(LinkRecord {
            key:   key.into(),
            start: start.into(),
            end:   end.into(),
            length,
            geometry,
        });
        id
    }

    /// Convenience: a straight link between two already-added nodes whose
    /// length is the distance between them.
    ///
    /// Unknown keys produce a zero-length, geometry-less record that fails
    /// resolution later, like any other dangling reference.
    pub fn add_straight_link(&mut self, key: &str, start: &str, end: &str) -> LinkId {
        let pos = |k: &str| self.nodes.iter().find(|n| n.key == k).map(|n| n.pos);
        let (geometry, length) = match (pos(start), pos(end)) {
            (Some(a), Some(b)) => (vec![a, b], a.distance(b)),
            _ => (Vec::new(), 0.0),
        };
        self.add_link(key, start, end, length, geometry)
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn link_count(&self) -> usize { self.links.len() }

    pub fn build(self) -> RoadNetwork {
        RoadNetwork { nodes: self.nodes, links: self.links }
    }
}

// ── Link resolution ───────────────────────────────────────────────────────────

/// Resolve every link record of `network` into a [`RoadLink`].
///
/// Endpoint keys become `NodeId`s and each link's altitude change is
/// `altitude(end_pos) − altitude(start_pos)`.  `altitude` is called at most
/// once per node, and only for nodes some link touches.
///
/// # Errors
///
/// [`DomainError::UnknownNode`] for a dangling endpoint key; any error
/// returned by `altitude`.
pub fn resolve_links<N, F, E>(network: &N, mut altitude: F) -> Result<Vec<RoadLink>, E>
where
    N: RoadNetworkProvider + ?Sized,
    F: FnMut(Coord) -> Result<f64, E>,
    E: From<DomainError>,
{
    let nodes = network.nodes();
    let mut by_key: FxHashMap<&str, NodeId> = FxHashMap::default();
    by_key.reserve(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        let id = NodeId::from_index(i).ok_or(DomainError::ArenaOverflow { what: "node" })?;
        by_key.entry(node.key.as_str()).or_insert(id);
    }

    let lookup = |link: &LinkRecord, key: &str| {
        by_key.get(key).copied().ok_or_else(|| DomainError::UnknownNode {
            link: link.key.clone(),
            node: key.to_owned(),
        })
    };

    // Indexed by NodeId; filled on first use.
    let mut node_altitude: Vec<Option<f64>> = vec![None; nodes.len()];
    let mut altitude_of = |id: NodeId| -> Result<f64, E> {
        if let Some(a) = node_altitude[id.index()] {
            return Ok(a);
        }
        let a = altitude(nodes[id.index()].pos)?;
        node_altitude[id.index()] = Some(a);
        Ok(a)
    };

    let records = network.links();
    let mut links = Vec::with_capacity(records.len());
    for record in records {
        let start = lookup(record, &record.start)?;
        let end = lookup(record, &record.end)?;
        let dh = altitude_of(end)? - altitude_of(start)?;
        links.push(RoadLink {
            key: record.key.clone(),
            start,
            end,
            length: record.length,
            geometry: record.geometry.clone(),
            altitude_difference: dh,
        });
    }
    Ok(links)
}

// ── RouteGraph ────────────────────────────────────────────────────────────────

/// Directed, weighted road graph in CSR format.
///
/// All fields are `pub` for direct indexed access in the shortest-path inner
/// loop.  Do not construct directly; use [`RouteGraphBuilder`].
#[derive(Debug)]
pub struct RouteGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Coord>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,
    /// Link each edge was derived from.
    pub edge_link: Vec<LinkId>,
    /// `true` for the end→start edge of a link.
    pub edge_reversed: Vec<bool>,
    /// Link length, metres.  Identical for both edges of a link.
    pub edge_length: Vec<f64>,
    /// Walking time, minutes.  Direction dependent.
    pub edge_time: Vec<f64>,

    // ── Link data (indexed by LinkId) ─────────────────────────────────────
    pub link_keys: Vec<String>,
    pub link_geometry: Vec<Vec<Coord>>,
}

impl RouteGraph {
    pub fn node_count(&self) -> usize { self.node_pos.len() }
    pub fn edge_count(&self) -> usize { self.edge_to.len() }
    pub fn link_count(&self) -> usize { self.link_keys.len() }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// Contiguous index range; no allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// The two edges derived from `link`, forward first.
    pub fn edges_of_link(&self, link: LinkId) -> Vec<EdgeId> {
        let mut edges: Vec<EdgeId> = (0..self.edge_count())
            .filter(|&i| self.edge_link[i] == link)
            .map(|i| EdgeId(i as u32))
            .collect();
        edges.sort_by_key(|e| self.edge_reversed[e.index()]);
        edges
    }

    /// Geometry of `edge` oriented in its direction of travel.
    pub fn edge_geometry(&self, edge: EdgeId) -> Vec<Coord> {
        let mut line = self.link_geometry[self.edge_link[edge.index()].index()].clone();
        if self.edge_reversed[edge.index()] {
            line.reverse();
        }
        line
    }
}

// ── RouteGraphBuilder ─────────────────────────────────────────────────────────

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    link:     LinkId,
    reversed: bool,
    length:   f64,
    time:     f64,
}

/// Builds a [`RouteGraph`] for one walking speed.
///
/// With the `parallel` feature the per-link cost computation runs on Rayon;
/// the result is identical to the sequential build.
#[derive(Copy, Clone, Debug)]
pub struct RouteGraphBuilder {
    speed: SpeedClass,
}

impl RouteGraphBuilder {
    pub fn new(speed: SpeedClass) -> Self {
        Self { speed }
    }

    /// Consume `links` and produce a graph with exactly `2 · links.len()`
    /// edges over `nodes`.
    ///
    /// # Errors
    ///
    /// [`DomainError::NodeOutOfRange`] if a link names a node past the end of
    /// `nodes`; any cost-model error for an invalid link.
    pub fn build(&self, nodes: &[RoadNode], links: &[RoadLink]) -> DomainResult<RouteGraph> {
        let started = Instant::now();
        let node_count = nodes.len();
        if NodeId::from_index(node_count).is_none() {
            return Err(DomainError::ArenaOverflow { what: "node" });
        }
        if EdgeId::from_index(links.len() * 2).is_none() {
            return Err(DomainError::ArenaOverflow { what: "edge" });
        }

        let pairs = self.edge_pairs(node_count, links)?;

        let mut raw: Vec<RawEdge> = pairs.into_iter().flatten().collect();
        // Stable: equal sources keep link order, forward before reverse.
        raw.sort_by_key(|e| e.from);

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let graph = RouteGraph {
            node_pos:      nodes.iter().map(|n| n.pos).collect(),
            node_out_start,
            edge_from:     raw.iter().map(|e| e.from).collect(),
            edge_to:       raw.iter().map(|e| e.to).collect(),
            edge_link:     raw.iter().map(|e| e.link).collect(),
            edge_reversed: raw.iter().map(|e| e.reversed).collect(),
            edge_length:   raw.iter().map(|e| e.length).collect(),
            edge_time:     raw.iter().map(|e| e.time).collect(),
            link_keys:     links.iter().map(|l| l.key.clone()).collect(),
            link_geometry: links.iter().map(|l| l.geometry.clone()).collect(),
        };

        debug!(
            "built route graph: {} nodes, {} edges ({} speed) in {:?}",
            graph.node_count(),
            graph.edge_count(),
            self.speed,
            started.elapsed()
        );
        Ok(graph)
    }

    #[cfg(not(feature = "parallel"))]
    fn edge_pairs(&self, node_count: usize, links: &[RoadLink]) -> DomainResult<Vec<[RawEdge; 2]>> {
        links
            .iter()
            .enumerate()
            .map(|(i, link)| edge_pair(self.speed, node_count, LinkId(i as u32), link))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn edge_pairs(&self, node_count: usize, links: &[RoadLink]) -> DomainResult<Vec<[RawEdge; 2]>> {
        use rayon::prelude::*;

        links
            .par_iter()
            .enumerate()
            .map(|(i, link)| edge_pair(self.speed, node_count, LinkId(i as u32), link))
            .collect()
    }
}

/// The forward and reverse edge of one link.
fn edge_pair(speed: SpeedClass, node_count: usize, id: LinkId, link: &RoadLink) -> DomainResult<[RawEdge; 2]> {
    for node in [link.start, link.end] {
        if node.index() >= node_count {
            return Err(DomainError::NodeOutOfRange { link: id, node, node_count });
        }
    }

    let weights = time_weight(link.length, speed, link.altitude_difference)?;
    let (forward, reverse) = SlopeDirection::of(link.altitude_difference).edge_times(&weights);

    Ok([
        RawEdge {
            from:     link.start,
            to:       link.end,
            link:     id,
            reversed: false,
            length:   link.length,
            time:     forward,
        },
        RawEdge {
            from:     link.end,
            to:       link.start,
            link:     id,
            reversed: true,
            length:   link.length,
            time:     reverse,
        },
    ])
}
