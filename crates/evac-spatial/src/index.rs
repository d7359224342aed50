//! Nearest-node lookup.
//!
//! The planner only depends on the [`SpatialIndex`] contract, so the backing
//! structure can change without touching it.  [`RTreeIndex`] is the default;
//! [`BruteForceIndex`] is a linear scan, fine for small networks and used as
//! the reference in tests.
//!
//! Both return the exact Euclidean nearest node.  When several nodes are
//! equally near, the lowest `NodeId` wins.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use evac_core::{Coord, NodeId, RoadNode};

/// A query point resolved to a network node.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapped {
    pub id:  NodeId,
    pub pos: Coord,
}

/// Nearest-neighbour contract over road-node positions.
pub trait SpatialIndex: Send + Sync {
    /// The node nearest to `at`, or `None` if the index is empty.
    fn nearest(&self, at: Coord) -> Option<Snapped>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── R-tree ────────────────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// R-tree over node positions, bulk-loaded once.
pub struct RTreeIndex {
    tree: RTree<NodeEntry>,
}

impl RTreeIndex {
    /// Bulk-load all `nodes`; `NodeId`s are positions in the slice.
    ///
    /// O(N log N); faster than N single inserts.
    pub fn bulk_load(nodes: &[RoadNode]) -> Self {
        let entries: Vec<NodeEntry> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| NodeEntry { point: n.pos.to_array(), id: NodeId(i as u32) })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    /// Up to `k` nearest nodes, ascending by distance.
    pub fn k_nearest(&self, at: Coord, k: usize) -> Vec<Snapped> {
        self.tree
            .nearest_neighbor_iter(&at.to_array())
            .take(k)
            .map(NodeEntry::snapped)
            .collect()
    }
}

impl NodeEntry {
    fn snapped(&self) -> Snapped {
        Snapped { id: self.id, pos: Coord::from(self.point) }
    }
}

impl SpatialIndex for RTreeIndex {
    fn nearest(&self, at: Coord) -> Option<Snapped> {
        let mut iter = self.tree.nearest_neighbor_iter_with_distance_2(&at.to_array());
        let (first, best_d2) = iter.next()?;
        // The iterator yields in distance order; scan the equidistant run
        // for the lowest id.
        let winner = iter
            .take_while(|&(_, d2)| d2 == best_d2)
            .map(|(e, _)| e)
            .fold(first, |best, e| if e.id < best.id { e } else { best });
        Some(winner.snapped())
    }

    fn len(&self) -> usize {
        self.tree.size()
    }
}

// ── Brute force ───────────────────────────────────────────────────────────────

/// Linear-scan index.
pub struct BruteForceIndex {
    points: Vec<Coord>,
}

impl BruteForceIndex {
    pub fn new(nodes: &[RoadNode]) -> Self {
        Self { points: nodes.iter().map(|n| n.pos).collect() }
    }
}

impl SpatialIndex for BruteForceIndex {
    fn nearest(&self, at: Coord) -> Option<Snapped> {
        // Strict `<` keeps the earliest (lowest-id) node among ties.
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let d2 = p.distance_sq(at);
            if best.is_none_or(|(_, b)| d2 < b) {
                best = Some((i, d2));
            }
        }
        best.map(|(i, _)| Snapped { id: NodeId(i as u32), pos: self.points[i] })
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}
