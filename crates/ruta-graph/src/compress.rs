//! Quality-aware map compression (COMA).
//!
//! An intermediate node — exactly one incoming and one outgoing neighbour,
//! and they differ — carries no topological information: routing through it
//! is equivalent to routing over a single *bridge edge* from its upstream to
//! its downstream neighbour with the summed weight.  Deleting such nodes
//! shrinks the graph, but a bridge that runs close to an unrelated real edge
//! would make nearby positions ambiguous for map matching.  The conflict
//! check therefore compares the victim's distance to its own bridge against
//! its distance to the nearest foreign edge, and only approves deletion when
//! the ratio stays under the caller's threshold.

use rustc_hash::FxHashSet;

use ruta_core::{Coordinate, NodeId};
use ruta_spatial::{GeoNearestResult, PlanarPoint, Segment};

use crate::graph::{EdgeDirection, Graph};

impl Graph {
    /// One compression pass over the current node set with conflict factor
    /// threshold `c` ∈ (0, 1]: every victim that passes the conflict check is
    /// replaced by bridge edges and flagged compressed.  The edge index is
    /// rebuilt once at the end; conflict queries inside the pass run against
    /// the pre-pass index.
    pub fn compress(&mut self, c: f64) {
        let total = self.nodes.len();
        let mut compressed = 0usize;

        for position in 0..total {
            let id = NodeId(position as u32);
            if self.is_victim(id) && self.check_conflict(id, c) {
                self.delete_and_merge(id);
                compressed += 1;
            }
        }

        if total > 0 {
            log::info!(
                "compression pass: {compressed} of {total} nodes removed ({:.1}%)",
                100.0 * compressed as f64 / total as f64,
            );
        }
        self.build_edge_index();
    }

    /// An intermediate node: one incoming, one outgoing, distinct neighbours.
    /// A dead-end reflection ni↔n↔ni is not a victim.
    pub(crate) fn is_victim(&self, id: NodeId) -> bool {
        let incoming = &self.incoming[id.index()];
        let outgoing = &self.outgoing[id.index()];
        incoming.len() == 1 && outgoing.len() == 1 && incoming[0].node != outgoing[0].node
    }

    /// Would deleting `id` create a routing ambiguity near a real edge?
    ///
    /// For each (incoming, outgoing) pair the candidate bridge runs from the
    /// upstream node to the downstream node.  The bridge is safe when the
    /// victim sits much closer to the bridge than to the nearest foreign
    /// edge (`factor < c`), confirmed by a second query at the bridge
    /// midpoint.  Returns `true` when any pair approves deletion.
    pub(crate) fn check_conflict(&self, id: NodeId, c: f64) -> bool {
        let coord = self.coordinate(id);
        let ignore: FxHashSet<NodeId> = std::iter::once(id).collect();
        let conflict = self.edge_index().geo_query(coord, &ignore);

        for edge_in in &self.incoming[id.index()] {
            for edge_out in &self.outgoing[id.index()] {
                let bridge = planar_segment(
                    self.coordinate(edge_in.node),
                    self.coordinate(edge_out.node),
                );
                let on_bridge = bridge.project(planar(coord)).to_coordinate();
                let d_bridge = coord.distance_m(on_bridge);

                if conflict_factor(d_bridge, conflict.distance) >= c {
                    // Bridge indistinguishable from a nearby real edge.
                    continue;
                }

                let midpoint = bridge.midpoint().to_coordinate();
                let new_conflict = self.edge_index().geo_query(midpoint, &ignore);
                let d_new = distance_to_conflict(coord, &new_conflict);

                if !same_segment(&conflict, &new_conflict)
                    || conflict_factor(d_bridge, d_new) < c
                {
                    return true;
                }
            }
        }
        false
    }

    /// Replace `id` with bridge edges: one LeftToRight link per (incoming,
    /// outgoing) pair, weighted by the pair's sum, then flag the node and
    /// sever its relations.  The record itself stays for id stability.
    fn delete_and_merge(&mut self, id: NodeId) {
        let bridges: Vec<(NodeId, NodeId, f32)> = self.incoming[id.index()]
            .iter()
            .flat_map(|edge_in| {
                self.outgoing[id.index()].iter().map(move |edge_out| {
                    (
                        edge_in.node,
                        edge_out.node,
                        edge_in.weight + edge_out.weight,
                    )
                })
            })
            .collect();

        for (from, to, weight) in bridges {
            self.relate_nodes(from, to, weight, EdgeDirection::LeftToRight);
        }
        self.mark_compressed(id);
        self.delete_relations(id);
    }
}

/// dBridge / dCompare, with a zero denominator reading as 0 — a bridge that
/// coincides with an existing edge is harmless to add.
fn conflict_factor(d_bridge: f64, d_compare: f64) -> f64 {
    if d_compare == 0.0 {
        return 0.0;
    }
    d_bridge / d_compare
}

/// Haversine metres from the victim to its projection on the conflict edge;
/// infinite when the query found nothing.
fn distance_to_conflict(coord: Coordinate, conflict: &GeoNearestResult) -> f64 {
    if !conflict.found() {
        return f64::INFINITY;
    }
    let segment = planar_segment(conflict.segment.a.coord, conflict.segment.b.coord);
    coord.distance_m(segment.project(planar(coord)).to_coordinate())
}

fn same_segment(a: &GeoNearestResult, b: &GeoNearestResult) -> bool {
    a.segment.a.node == b.segment.a.node && a.segment.b.node == b.segment.b.node
}

fn planar(coord: Coordinate) -> PlanarPoint {
    PlanarPoint::from_coordinate(coord, NodeId::INVALID)
}

fn planar_segment(a: Coordinate, b: Coordinate) -> Segment {
    Segment::new(planar(a), planar(b))
}
