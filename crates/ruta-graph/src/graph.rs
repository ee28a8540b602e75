//! Road graph store.
//!
//! # Data layout
//!
//! Nodes live in a dense vector; a node's id **is** its position and never
//! changes.  Connectivity lives in two parallel adjacency tables indexed by
//! node id: `outgoing[v]` and `incoming[v]`.  A directed link u→v with
//! weight w materialises as `Edge { node: v, weight: w }` appended to
//! `outgoing[u]` *and* `Edge { node: u, weight: w }` appended to
//! `incoming[v]` — the two tables always move in lockstep, so every
//! outgoing half-edge has its mirror on the incoming side with equal weight.
//!
//! Compression never removes a node record, it only raises the `compressed`
//! flag and severs the node's relations: dense ids stay valid, which is what
//! keeps the adjacency-as-vector representation sound.  Parallel edges
//! between the same pair are allowed and kept in insertion order.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use ruta_core::{CellId, Coordinate, NodeId};
use ruta_spatial::{GeoPoint, GeoSegment, QuadNode};

use crate::error::{GraphError, GraphResult};

// ── Records ───────────────────────────────────────────────────────────────────

/// A graph vertex: canonical location plus the opaque user-data ids attached
/// to it.  A compressed node is skipped as a routing intermediate but still
/// answers when addressed directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub location: CellId,
    pub compressed: bool,
    pub data: Vec<u64>,
}

/// One half of a directed connection: the other endpoint and the link weight.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub node: NodeId,
    pub weight: f32,
}

/// Direction of a relation between two nodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeDirection {
    Bidirectional,
    LeftToRight,
    RightToLeft,
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// A directed weighted road graph with a rebuildable nearest-edge index.
///
/// Single-threaded with respect to mutation; an immutable `Graph` may be
/// queried from many threads at once (no interior mutability, no caches).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub incoming: Vec<Vec<Edge>>,
    pub outgoing: Vec<Vec<Edge>>,

    /// Spatial index over the current edge set.  Never persisted; rebuild
    /// with [`Graph::build_edge_index`] whenever the edge set changes.
    #[serde(skip)]
    edge_index: QuadNode,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of nodes when bulk-loading.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            incoming: Vec::with_capacity(nodes),
            outgoing: Vec::with_capacity(nodes),
            edge_index: QuadNode::default(),
        }
    }

    // ── Store operations ──────────────────────────────────────────────────

    /// Append a node at `location` and return its id (sequential from 0).
    pub fn add_node(&mut self, location: CellId) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            location,
            compressed: false,
            data: Vec::new(),
        });
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Relate two nodes in the given direction.  `Bidirectional` creates both
    /// a→b and b→a; the unidirectional variants create exactly one link.
    pub fn relate_nodes(&mut self, a: NodeId, b: NodeId, weight: f32, direction: EdgeDirection) {
        match direction {
            EdgeDirection::Bidirectional => {
                self.add_half_edge(a, b, weight);
                self.add_half_edge(b, a, weight);
            }
            EdgeDirection::LeftToRight => self.add_half_edge(a, b, weight),
            EdgeDirection::RightToLeft => self.add_half_edge(b, a, weight),
        }
    }

    /// One directed link: outgoing and incoming entries appended together so
    /// the mirror invariant can never drift.
    fn add_half_edge(&mut self, from: NodeId, to: NodeId, weight: f32) {
        self.outgoing[from.index()].push(Edge { node: to, weight });
        self.incoming[to.index()].push(Edge { node: from, weight });
    }

    /// Remove every half-edge referencing `id` from its neighbours' tables,
    /// then empty `id`'s own.  Other nodes' ids and remaining adjacency are
    /// untouched.
    pub fn delete_relations(&mut self, id: NodeId) {
        let incoming = std::mem::take(&mut self.incoming[id.index()]);
        for edge in &incoming {
            self.outgoing[edge.node.index()].retain(|e| e.node != id);
        }
        let outgoing = std::mem::take(&mut self.outgoing[id.index()]);
        for edge in &outgoing {
            self.incoming[edge.node.index()].retain(|e| e.node != id);
        }
    }

    /// Raise the compressed flag; the record stays in place so dense ids
    /// remain stable.
    pub fn mark_compressed(&mut self, id: NodeId) {
        self.nodes[id.index()].compressed = true;
    }

    /// Inspect `outgoing[a]` and `outgoing[b]` to recover the direction of
    /// the relation between two nodes, along with the weight found.
    /// `None` when the nodes are unrelated.
    pub fn direction_between(&self, a: NodeId, b: NodeId) -> Option<(EdgeDirection, f32)> {
        let to_right = self.outgoing[a.index()].iter().find(|e| e.node == b);
        let to_left = self.outgoing[b.index()].iter().find(|e| e.node == a);
        match (to_left, to_right) {
            (Some(left), Some(_)) => Some((EdgeDirection::Bidirectional, left.weight)),
            (None, Some(right)) => Some((EdgeDirection::LeftToRight, right.weight)),
            (Some(left), None) => Some((EdgeDirection::RightToLeft, left.weight)),
            (None, None) => None,
        }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total half-edge count across both adjacency tables (a directed link
    /// contributes two entries, a bidirectional relation four).
    pub fn edge_count(&self) -> usize {
        let incoming: usize = self.incoming.iter().map(Vec::len).sum();
        let outgoing: usize = self.outgoing.iter().map(Vec::len).sum();
        incoming + outgoing
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Degree of one node: indegree plus outdegree.
    pub fn degree_of(&self, id: NodeId) -> usize {
        self.incoming[id.index()].len() + self.outgoing[id.index()].len()
    }

    /// Average degree over the live (non-compressed) nodes.
    pub fn average_degree(&self) -> f64 {
        let mut total = 0usize;
        let mut live = 0usize;
        for node in &self.nodes {
            if !node.compressed {
                total += self.degree_of(node.id);
                live += 1;
            }
        }
        if live == 0 {
            return 0.0;
        }
        total as f64 / live as f64
    }

    /// Geographic coordinate of a node's canonical location.
    pub fn coordinate(&self, id: NodeId) -> Coordinate {
        self.nodes[id.index()].location.to_coordinate()
    }

    // ── Edge index ────────────────────────────────────────────────────────

    /// Rebuild the quadtree from the current edge set: one geographic
    /// segment per undirected pair {u, v} present in `outgoing`, deduplicated
    /// by unordered endpoint pair.
    pub fn build_edge_index(&mut self) {
        let mut seen: FxHashSet<(NodeId, NodeId)> = FxHashSet::default();
        let mut segments = Vec::new();

        for (i, edges) in self.outgoing.iter().enumerate() {
            let u = NodeId(i as u32);
            for edge in edges {
                let v = edge.node;
                let key = if u <= v { (u, v) } else { (v, u) };
                if seen.insert(key) {
                    segments.push(GeoSegment {
                        a: GeoPoint::new(self.coordinate(u), u),
                        b: GeoPoint::new(self.coordinate(v), v),
                    });
                }
            }
        }

        log::debug!("edge index rebuilt over {} segments", segments.len());
        self.edge_index = QuadNode::from_geo_segments(segments);
    }

    /// The current spatial index (empty until [`Graph::build_edge_index`]).
    pub fn edge_index(&self) -> &QuadNode {
        &self.edge_index
    }

    // ── Attachment API ────────────────────────────────────────────────────

    /// Snap a coordinate onto the road network: nearest-edge query, then pick
    /// the downstream endpoint for one-way edges or the nearer endpoint for
    /// bidirectional ones.  Returns the node id and the haversine metres from
    /// the on-edge projection to that node.
    ///
    /// # Errors
    ///
    /// [`GraphError::EmptyIndex`] when the index holds no candidate edge —
    /// treat as a hard failure before routing.
    pub fn project_coordinate(&self, coord: Coordinate) -> GraphResult<(NodeId, f32)> {
        let nearest = self.edge_index.geo_query(coord, &FxHashSet::default());
        if !nearest.found() {
            return Err(GraphError::EmptyIndex);
        }

        let (a, b) = (nearest.segment.a.node, nearest.segment.b.node);
        let distance_a = nearest.projection.distance_m(self.coordinate(a)) as f32;
        let distance_b = nearest.projection.distance_m(self.coordinate(b)) as f32;

        Ok(match self.direction_between(a, b) {
            Some((EdgeDirection::LeftToRight, _)) => (b, distance_b),
            Some((EdgeDirection::RightToLeft, _)) => (a, distance_a),
            _ => {
                if distance_a < distance_b {
                    (a, distance_a)
                } else {
                    (b, distance_b)
                }
            }
        })
    }

    /// Bind opaque data ids to their nearest road nodes.  The ids come back
    /// out of the shortest-path engine for every path visiting those nodes.
    pub fn add_data(&mut self, points: &[(u64, Coordinate)]) -> GraphResult<()> {
        for &(data_id, coord) in points {
            let (node, _) = self.project_coordinate(coord)?;
            self.nodes[node.index()].data.push(data_id);
        }
        Ok(())
    }
}
