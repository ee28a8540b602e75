//! Shortest-path engine: Dijkstra with cost cap, compressed-node masking,
//! and path/data recovery.
//!
//! # Cost units
//!
//! Costs are in the same unit as edge weights — metres when the graph was
//! built with default haversine weights.  Unreachable targets come back as
//! `f32::INFINITY` with an empty polyline, never as an error.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use ruta_core::{Coordinate, NodeId};

use crate::error::GraphResult;
use crate::graph::Graph;

type MinHeap = BinaryHeap<Reverse<(OrderedFloat<f32>, NodeId)>>;

// ── Query inputs and results ──────────────────────────────────────────────────

/// Inputs of one shortest-path run.
///
/// `max_cost = 0` disables the cap.  `initial_cost` is the metres from the
/// original query coordinate to the start node; the engine itself does not
/// consume it — the coordinate-level caller adds it to the returned cost.
#[derive(Copy, Clone, Debug)]
pub struct ShortestPathCriteria {
    pub from: NodeId,
    pub to: NodeId,
    pub max_cost: f32,
    pub initial_cost: f32,
}

impl Default for ShortestPathCriteria {
    /// Invalid endpoints, no cap, no offset — fill in `from`/`to`.
    fn default() -> Self {
        Self {
            from: NodeId::INVALID,
            to: NodeId::INVALID,
            max_cost: 0.0,
            initial_cost: 0.0,
        }
    }
}

/// The result of a path query: total cost, the traversed locations as
/// `[lng, lat]` pairs, and every data id attached to nodes settled during
/// the search, in first-settled order.
#[derive(Clone, Debug, Default)]
pub struct Route {
    pub cost: f32,
    pub polyline: Vec<[f64; 2]>,
    pub data: Vec<u64>,
}

impl Route {
    /// Sentinel for invalid input or an unreachable pair.
    pub fn unreachable() -> Self {
        Route {
            cost: f32::INFINITY,
            polyline: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.cost.is_finite()
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

impl Graph {
    /// Shortest-path cost only — no path bookkeeping.
    ///
    /// Termination mirrors [`Graph::dijkstra_path`]: settled target returns
    /// its cost, an exceeded `max_cost` returns the offending cost, heap
    /// exhaustion returns the (infinite) best known cost to the target.
    pub fn dijkstra(&self, criteria: &ShortestPathCriteria) -> f32 {
        let ShortestPathCriteria {
            from, to, max_cost, ..
        } = *criteria;
        if !self.valid_endpoint(from) || !self.valid_endpoint(to) {
            return f32::INFINITY;
        }

        let mut dist = vec![f32::INFINITY; self.nodes.len()];
        let mut visited = vec![false; self.nodes.len()];
        dist[from.index()] = 0.0;

        let mut heap = MinHeap::new();
        heap.push(Reverse((OrderedFloat(0.0), from)));

        while let Some(Reverse((_, node))) = heap.pop() {
            if visited[node.index()] {
                continue;
            }
            visited[node.index()] = true;

            let cost = dist[node.index()];
            if max_cost > 0.0 && cost > max_cost {
                return cost;
            }
            if node == to {
                return cost;
            }
            self.relax(node, cost, &mut dist, &mut heap, &visited, None);
        }
        dist[to.index()]
    }

    /// Full shortest-path query: cost, polyline, and attached data ids.
    ///
    /// Invalid endpoints short-circuit to the unreachable sentinel.  When
    /// `max_cost` is exceeded the route carries the offending cost and no
    /// polyline.  When the target is unreachable the cost is infinite, the
    /// polyline empty, and `data` still reflects the nodes settled before
    /// the search gave up.
    pub fn dijkstra_path(&self, criteria: &ShortestPathCriteria) -> Route {
        let ShortestPathCriteria {
            from, to, max_cost, ..
        } = *criteria;
        if !self.valid_endpoint(from) || !self.valid_endpoint(to) {
            return Route::unreachable();
        }

        let mut dist = vec![f32::INFINITY; self.nodes.len()];
        let mut visited = vec![false; self.nodes.len()];
        // Predecessor of the source is the reserved INVALID sentinel.
        let mut previous = vec![NodeId::INVALID; self.nodes.len()];
        let mut data = Vec::new();
        dist[from.index()] = 0.0;

        let mut heap = MinHeap::new();
        heap.push(Reverse((OrderedFloat(0.0), from)));

        while let Some(Reverse((_, node))) = heap.pop() {
            if visited[node.index()] {
                continue;
            }
            visited[node.index()] = true;
            data.extend_from_slice(&self.nodes[node.index()].data);

            let cost = dist[node.index()];
            if max_cost > 0.0 && cost > max_cost {
                return Route {
                    cost,
                    polyline: Vec::new(),
                    data,
                };
            }
            if node == to {
                return Route {
                    cost,
                    polyline: self.polyline(from, to, &previous),
                    data,
                };
            }
            self.relax(node, cost, &mut dist, &mut heap, &visited, Some(&mut previous));
        }

        // Heap exhausted without settling the target: unreachable.
        Route {
            cost: dist[to.index()],
            polyline: Vec::new(),
            data,
        }
    }

    /// Coordinate-level routing: snap both endpoints to the road network,
    /// run the path engine, add the source projection distance to the cost.
    ///
    /// Non-finite coordinates yield the unreachable sentinel; an empty edge
    /// index is a hard failure.
    pub fn shortest_path(&self, from: Coordinate, to: Coordinate) -> GraphResult<Route> {
        if !from.is_finite() || !to.is_finite() {
            return Ok(Route::unreachable());
        }

        let (source, initial_cost) = self.project_coordinate(from)?;
        let (target, _) = self.project_coordinate(to)?;

        let mut route = self.dijkstra_path(&ShortestPathCriteria {
            from: source,
            to: target,
            initial_cost,
            ..Default::default()
        });
        if route.is_reachable() {
            route.cost += initial_cost;
        }
        Ok(route)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn valid_endpoint(&self, id: NodeId) -> bool {
        id != NodeId::INVALID && id.index() < self.nodes.len()
    }

    /// Relax every outgoing edge of `node`, skipping compressed and already
    /// settled targets.  Ties in the heap break on the smaller node id, so
    /// equal-cost paths resolve deterministically.
    fn relax(
        &self,
        node: NodeId,
        cost: f32,
        dist: &mut [f32],
        heap: &mut MinHeap,
        visited: &[bool],
        mut previous: Option<&mut [NodeId]>,
    ) {
        for edge in &self.outgoing[node.index()] {
            let next = edge.node;
            if self.nodes[next.index()].compressed || visited[next.index()] {
                continue;
            }
            let candidate = cost + edge.weight;
            if candidate < dist[next.index()] {
                dist[next.index()] = candidate;
                if let Some(prev) = previous.as_deref_mut() {
                    prev[next.index()] = node;
                }
                heap.push(Reverse((OrderedFloat(candidate), next)));
            }
        }
    }

    /// Walk the predecessor chain from `end` back to `start` and emit the
    /// node locations as `[lng, lat]`, source first.
    fn polyline(&self, start: NodeId, end: NodeId, previous: &[NodeId]) -> Vec<[f64; 2]> {
        let mut points = Vec::new();
        let mut current = end;
        loop {
            let coord = self.coordinate(current);
            points.push([coord.lng, coord.lat]);
            if current == start {
                break;
            }
            current = previous[current.index()];
            if current == NodeId::INVALID {
                break;
            }
        }
        points.reverse();
        points
    }
}
