//! Unit tests for ruta-spatial.
//!
//! Quadtree correctness is checked against a brute-force scan over the same
//! segment set, which is the ground truth the pruning walk must reproduce.

#[cfg(test)]
mod helpers {
    use ruta_core::{Coordinate, NodeId};

    use crate::{GeoPoint, GeoSegment, PlanarPoint, Segment};

    pub fn p(x: f64, y: f64) -> PlanarPoint {
        PlanarPoint::anonymous(x, y)
    }

    pub fn seg(ax: f64, ay: f64, bx: f64, by: f64) -> Segment {
        Segment::new(p(ax, ay), p(bx, by))
    }

    /// A city-scale street grid: 11×11 points, every horizontal and vertical
    /// block as one segment.  220 segments forces several subdivision levels.
    pub fn grid_segments() -> Vec<GeoSegment> {
        const N: usize = 11;
        let corner = Coordinate::new(10.48, -66.92);
        let step = 0.004;

        let point = |row: usize, col: usize| {
            GeoPoint::new(
                Coordinate::new(
                    corner.lat + row as f64 * step,
                    corner.lng + col as f64 * step,
                ),
                NodeId((row * N + col) as u32),
            )
        };

        let mut segments = Vec::new();
        for row in 0..N {
            for col in 0..N {
                if col + 1 < N {
                    segments.push(GeoSegment {
                        a: point(row, col),
                        b: point(row, col + 1),
                    });
                }
                if row + 1 < N {
                    segments.push(GeoSegment {
                        a: point(row, col),
                        b: point(row + 1, col),
                    });
                }
            }
        }
        segments
    }

    /// Ground truth for `geo_query`: project the query into the plane, take
    /// the planar-nearest non-ignored segment, report haversine metres to the
    /// back-projected projection.
    pub fn brute_force_nearest(
        segments: &[GeoSegment],
        coord: Coordinate,
        ignore: &[NodeId],
    ) -> f64 {
        let query = PlanarPoint::from_coordinate(coord, NodeId::INVALID);
        segments
            .iter()
            .filter(|s| !ignore.contains(&s.a.node) && !ignore.contains(&s.b.node))
            .map(|s| {
                let planar = Segment::new(
                    PlanarPoint::from_coordinate(s.a.coord, s.a.node),
                    PlanarPoint::from_coordinate(s.b.coord, s.b.node),
                );
                let projection = planar.project(query);
                (projection.distance_sq(query), projection)
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, projection)| coord.distance_m(projection.to_coordinate()))
            .unwrap_or(f64::INFINITY)
    }
}

// ── Interval ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod interval {
    use crate::Interval;

    #[test]
    fn intercepts_overlapping() {
        assert!(Interval::new(0.0, 2.0).intercepts(&Interval::new(1.0, 3.0)));
        assert!(Interval::new(1.0, 3.0).intercepts(&Interval::new(0.0, 2.0)));
        // Shared endpoint counts: intervals are closed.
        assert!(Interval::new(0.0, 1.0).intercepts(&Interval::new(1.0, 2.0)));
    }

    #[test]
    fn intercepts_disjoint() {
        assert!(!Interval::new(0.0, 1.0).intercepts(&Interval::new(2.0, 3.0)));
        assert!(!Interval::new(2.0, 3.0).intercepts(&Interval::new(0.0, 1.0)));
    }

    #[test]
    fn empty_never_intercepts() {
        assert!(!Interval::EMPTY.intercepts(&Interval::new(0.0, 1.0)));
        assert!(!Interval::new(0.0, 1.0).intercepts(&Interval::EMPTY));
    }

    #[test]
    fn clamp() {
        let i = Interval::new(0.0, 10.0);
        assert_eq!(i.clamp_point(-5.0), 0.0);
        assert_eq!(i.clamp_point(5.0), 5.0);
        assert_eq!(i.clamp_point(15.0), 10.0);
    }

    #[test]
    fn add_point_grows_minimally() {
        let i = Interval::EMPTY.add_point(3.0);
        assert_eq!(i, Interval::new(3.0, 3.0));
        assert!(!i.is_empty());

        let i = i.add_point(1.0);
        assert_eq!(i, Interval::new(1.0, 3.0));
        let i = i.add_point(2.0);
        assert_eq!(i, Interval::new(1.0, 3.0));
        let i = i.add_point(7.0);
        assert_eq!(i, Interval::new(1.0, 7.0));
    }
}

// ── Rect ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rect {
    use super::helpers::{p, seg};
    use crate::rect::{LOWER_LEFT, LOWER_RIGHT, UPPER_LEFT, UPPER_RIGHT};
    use crate::{Interval, Rect};

    fn unit() -> Rect {
        Rect::new(Interval::new(0.0, 4.0), Interval::new(0.0, 4.0))
    }

    #[test]
    fn split_quadrant_order() {
        let quads = unit().split();
        // UL, UR, LR, LL
        assert!(quads[UPPER_LEFT].contains(p(1.0, 3.0)));
        assert!(quads[UPPER_RIGHT].contains(p(3.0, 3.0)));
        assert!(quads[LOWER_RIGHT].contains(p(3.0, 1.0)));
        assert!(quads[LOWER_LEFT].contains(p(1.0, 1.0)));
        // The four children tile the parent.
        for q in &quads {
            assert!(unit().intercepts(q));
        }
    }

    #[test]
    fn middle_is_degenerate_strip() {
        let m = unit().middle();
        assert!((m.x.max - m.x.min - 2e-5).abs() < 1e-12);
        assert!((m.y.max - m.y.min - 2e-5).abs() < 1e-12);
        assert!(m.contains(unit().centroid()));
    }

    #[test]
    fn from_segments_is_tight() {
        let r = Rect::from_segments(&[seg(1.0, 2.0, 5.0, 3.0), seg(-1.0, 0.0, 2.0, 6.0)]);
        assert_eq!(r.x, Interval::new(-1.0, 5.0));
        assert_eq!(r.y, Interval::new(0.0, 6.0));
    }

    #[test]
    fn from_no_segments_is_empty() {
        let r = Rect::from_segments(&[]);
        assert!(r.x.is_empty());
        assert!(!r.contains(p(0.0, 0.0)));
    }

    #[test]
    fn clamp_point() {
        let r = unit();
        assert_eq!(r.clamp_point(p(-1.0, 5.0)), p(0.0, 4.0));
        assert_eq!(r.clamp_point(p(2.0, 2.0)), p(2.0, 2.0));
    }
}

// ── Segment ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod segment {
    use super::helpers::{p, seg};

    #[test]
    fn project_interior() {
        let s = seg(0.0, 0.0, 10.0, 0.0);
        let proj = s.project(p(4.0, 3.0));
        assert_eq!(proj.x, 4.0);
        assert_eq!(proj.y, 0.0);
    }

    #[test]
    fn project_clamps_to_endpoints() {
        let s = seg(0.0, 0.0, 10.0, 0.0);
        assert_eq!(s.project(p(-3.0, 2.0)), s.a);
        assert_eq!(s.project(p(12.0, -2.0)), s.b);
    }

    #[test]
    fn project_degenerate() {
        let s = seg(1.0, 1.0, 1.0, 1.0);
        assert_eq!(s.project(p(5.0, 5.0)), s.a);
    }

    #[test]
    fn midpoint() {
        assert_eq!(seg(0.0, 0.0, 2.0, 4.0).midpoint(), p(1.0, 2.0));
    }

    #[test]
    fn bounding_box_is_tight() {
        let bb = seg(3.0, 1.0, -1.0, 4.0).bounding_box();
        assert_eq!(bb.x.min, -1.0);
        assert_eq!(bb.x.max, 3.0);
        assert_eq!(bb.y.min, 1.0);
        assert_eq!(bb.y.max, 4.0);
    }

    #[test]
    fn intersects_crossing() {
        let a = seg(0.0, 0.0, 4.0, 4.0);
        let b = seg(0.0, 4.0, 4.0, 0.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn intersects_disjoint() {
        let a = seg(0.0, 0.0, 1.0, 1.0);
        let b = seg(3.0, 3.0, 4.0, 3.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn intersects_collinear_touching() {
        let a = seg(0.0, 0.0, 2.0, 0.0);
        let b = seg(2.0, 0.0, 5.0, 0.0);
        assert!(a.intersects(&b));

        let c = seg(3.0, 0.0, 5.0, 0.0);
        assert!(!a.intersects(&c));
    }
}

// ── Circle ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod circle {
    use super::helpers::p;
    use crate::{Circle, Interval, Rect};

    #[test]
    fn intersects_rect_by_clamped_distance() {
        let rect = Rect::new(Interval::new(0.0, 2.0), Interval::new(0.0, 2.0));
        // Squared radius convention: radius 9.0 reaches 3 planar units.
        let mut c = Circle::new(p(5.0, 1.0), 9.0);
        assert!(c.intersects_rect(&rect));
        c.expand(4.0);
        assert!(!c.intersects_rect(&rect));
    }

    #[test]
    fn center_inside_always_intersects() {
        let rect = Rect::new(Interval::new(0.0, 2.0), Interval::new(0.0, 2.0));
        assert!(Circle::new(p(1.0, 1.0), 0.0).intersects_rect(&rect));
    }
}

// ── Mercator ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod mercator {
    use ruta_core::Coordinate;

    use crate::mercator::{to_coordinate, to_plane};

    #[test]
    fn roundtrip() {
        let coords = [
            Coordinate::new(10.491, -66.879),
            Coordinate::new(-33.447, -70.673),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(60.17, 24.94),
        ];
        for c in coords {
            let (x, y) = to_plane(c);
            let back = to_coordinate(x, y);
            assert!((back.lat - c.lat).abs() < 1e-9, "{c} → {back}");
            assert!((back.lng - c.lng).abs() < 1e-9, "{c} → {back}");
        }
    }

    #[test]
    fn projection_is_locally_isotropic() {
        // Conformality: at a given point, an equal step north and east must
        // map to (nearly) equal planar lengths, so squared-distance
        // comparisons are direction-independent.
        let origin = Coordinate::new(10.5, -66.9);
        let north = Coordinate::new(10.501, -66.9);
        let east = Coordinate::new(10.5, -66.899);

        let (ox, oy) = to_plane(origin);
        let (nx, ny) = to_plane(north);
        let (ex, ey) = to_plane(east);

        let step_north = ((nx - ox).powi(2) + (ny - oy).powi(2)).sqrt();
        let step_east = ((ex - ox).powi(2) + (ey - oy).powi(2)).sqrt();
        let ratio = step_north / step_east;
        assert!((ratio - 1.0).abs() < 1e-3, "anisotropy ratio {ratio}");
    }
}

// ── Quadtree ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod quadtree {
    use rustc_hash::FxHashSet;
    use ruta_core::{Coordinate, NodeId};

    use super::helpers::{brute_force_nearest, grid_segments};
    use crate::QuadNode;

    #[test]
    fn empty_tree_returns_sentinel() {
        let tree = QuadNode::default();
        let result = tree.geo_query(Coordinate::new(10.0, -66.0), &FxHashSet::default());
        assert!(!result.found());
        assert_eq!(result.segment.a.node, NodeId::INVALID);
    }

    #[test]
    fn point_outside_envelope_returns_sentinel() {
        let tree = QuadNode::from_geo_segments(grid_segments());
        let result = tree.geo_query(Coordinate::new(48.85, 2.35), &FxHashSet::default());
        assert!(!result.found());
    }

    #[test]
    fn nearest_matches_brute_force() {
        let segments = grid_segments();
        let tree = QuadNode::from_geo_segments(segments.clone());

        // Probe a lattice of query points across (and slightly off) the grid,
        // including block centres and points on segment lines.
        let mut probes = Vec::new();
        for i in 0..8 {
            for j in 0..8 {
                probes.push(Coordinate::new(
                    10.4812 + i as f64 * 0.0052,
                    -66.9179 + j as f64 * 0.0051,
                ));
            }
        }

        for coord in probes {
            let got = tree.geo_query(coord, &FxHashSet::default());
            let want = brute_force_nearest(&segments, coord, &[]);
            assert!(got.found(), "no result at {coord}");
            let tolerance = 1e-9 * want.max(1.0);
            assert!(
                (got.distance - want).abs() <= tolerance,
                "at {coord}: got {} want {want}",
                got.distance,
            );
        }
    }

    #[test]
    fn ignored_endpoints_hide_their_segments() {
        let segments = grid_segments();
        let tree = QuadNode::from_geo_segments(segments.clone());

        // Query right on grid point (5,5) = node 60; every touching segment
        // must be skipped once 60 is ignored.
        let coord = Coordinate::new(10.48 + 5.0 * 0.004, -66.92 + 5.0 * 0.004);
        let ignored = NodeId(60);
        let ignore: FxHashSet<NodeId> = [ignored].into_iter().collect();

        let result = tree.geo_query(coord, &ignore);
        assert!(result.found());
        assert_ne!(result.segment.a.node, ignored);
        assert_ne!(result.segment.b.node, ignored);

        let want = brute_force_nearest(&segments, coord, &[ignored]);
        assert!((result.distance - want).abs() <= 1e-9 * want.max(1.0));
    }

    #[test]
    fn ignoring_everything_returns_sentinel() {
        let segments = grid_segments();
        let tree = QuadNode::from_geo_segments(segments.clone());
        let ignore: FxHashSet<NodeId> = (0..121).map(NodeId).collect();
        let result = tree.geo_query(Coordinate::new(10.49, -66.90), &ignore);
        assert!(!result.found());
    }

    #[test]
    fn repeated_builds_answer_identically() {
        let segments = grid_segments();
        let a = QuadNode::from_geo_segments(segments.clone());
        let b = QuadNode::from_geo_segments(segments);
        let coord = Coordinate::new(10.4931, -66.8977);
        let ra = a.geo_query(coord, &FxHashSet::default());
        let rb = b.geo_query(coord, &FxHashSet::default());
        assert_eq!(ra.distance, rb.distance);
        assert_eq!(ra.segment.a.node, rb.segment.a.node);
        assert_eq!(ra.segment.b.node, rb.segment.b.node);
    }
}
