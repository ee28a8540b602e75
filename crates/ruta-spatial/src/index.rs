//! Adaptive point-region quadtree over road segments.
//!
//! # Shape
//!
//! Each [`QuadNode`] covers an axis-aligned quadrant.  Leaves hold up to
//! [`CAPACITY`] segments; an overflowing leaf promotes itself to an internal
//! node and routes its payload into lazily created children (UL, UR, LR, LL).
//! A segment whose bounding box straddles the centre strip of a quadrant is
//! duplicated into every child it may touch — queries can meet the same
//! segment in several leaves, which is harmless because min is idempotent.
//!
//! # Nearest query
//!
//! `query` descends to the deepest quadrant containing the point, seeds an
//! upper-bound circle from the segments stored there, then walks the branch
//! back up.  Each level scans every child except the one already visited
//! (the `avoid` pointer) and prunes children the shrinking circle cannot
//! reach.  The branch walk guarantees every region that could hold a closer
//! segment is visited exactly once.

use rustc_hash::FxHashSet;
use ruta_core::{Coordinate, NodeId};

use crate::circle::Circle;
use crate::point::PlanarPoint;
use crate::rect::{LOWER_LEFT, LOWER_RIGHT, Rect, UPPER_LEFT, UPPER_RIGHT};
use crate::segment::Segment;

/// Maximum number of segments a leaf holds before subdividing.
pub const CAPACITY: usize = 10;

/// Maximum tree depth.  A leaf at this depth appends beyond [`CAPACITY`]
/// instead of subdividing further.
pub const MAX_DEPTH: u8 = 20;

const ORIGIN: PlanarPoint = PlanarPoint {
    x: 0.0,
    y: 0.0,
    node: NodeId::INVALID,
};

// ── Geographic vocabulary ─────────────────────────────────────────────────────

/// A geographic coordinate tagged with its graph node id.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoPoint {
    pub coord: Coordinate,
    pub node: NodeId,
}

impl GeoPoint {
    #[inline]
    pub fn new(coord: Coordinate, node: NodeId) -> Self {
        Self { coord, node }
    }
}

/// A road segment in geographic coordinates; the index input and the query
/// result vocabulary.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoSegment {
    pub a: GeoPoint,
    pub b: GeoPoint,
}

// ── Query results ─────────────────────────────────────────────────────────────

/// Planar nearest-segment result.  `distance` is squared planar; infinite
/// means nothing was found.
#[derive(Copy, Clone, Debug)]
pub struct NearestResult {
    pub segment: Segment,
    pub distance: f64,
    pub projection: PlanarPoint,
}

impl NearestResult {
    /// Sentinel: empty segment, infinite distance.
    pub const NONE: NearestResult = NearestResult {
        segment: Segment { a: ORIGIN, b: ORIGIN },
        distance: f64::INFINITY,
        projection: ORIGIN,
    };
}

/// Geographic nearest-segment result.  `distance` is haversine metres from
/// the query coordinate to `projection`; infinite means the index was empty,
/// the query fell outside its envelope, or the ignore set excluded every
/// candidate.
#[derive(Copy, Clone, Debug)]
pub struct GeoNearestResult {
    pub segment: GeoSegment,
    pub distance: f64,
    pub projection: Coordinate,
}

impl GeoNearestResult {
    pub const NONE: GeoNearestResult = GeoNearestResult {
        segment: GeoSegment {
            a: GeoPoint {
                coord: Coordinate { lat: 0.0, lng: 0.0 },
                node: NodeId::INVALID,
            },
            b: GeoPoint {
                coord: Coordinate { lat: 0.0, lng: 0.0 },
                node: NodeId::INVALID,
            },
        },
        distance: f64::INFINITY,
        projection: Coordinate { lat: 0.0, lng: 0.0 },
    };

    /// `true` when the query found an actual segment.
    #[inline]
    pub fn found(&self) -> bool {
        self.distance.is_finite()
    }
}

// ── QuadNode ──────────────────────────────────────────────────────────────────

/// One node of the quadtree.  The root owns the whole structure; children are
/// boxed and created lazily during rebalancing.
#[derive(Debug)]
pub struct QuadNode {
    quadrant: Rect,
    depth: u8,
    segments: Vec<Segment>,
    children: [Option<Box<QuadNode>>; 4],
}

impl Default for QuadNode {
    /// An empty index: every query returns the sentinel.
    fn default() -> Self {
        QuadNode::with_quadrant(Rect::EMPTY, 0)
    }
}

impl QuadNode {
    fn with_quadrant(quadrant: Rect, depth: u8) -> Self {
        Self {
            quadrant,
            depth,
            segments: Vec::new(),
            children: [None, None, None, None],
        }
    }

    /// Build an index from planar segments: the root quadrant is the minimum
    /// enclosing rectangle of all endpoints (empty input → empty root).
    pub fn from_segments(segments: Vec<Segment>) -> QuadNode {
        let mut root = QuadNode::with_quadrant(Rect::from_segments(&segments), 0);
        for segment in segments {
            root.insert(segment);
        }
        root
    }

    /// Build an index from geographic segments, projecting endpoints into the
    /// plane and preserving their node ids.
    pub fn from_geo_segments(segments: impl IntoIterator<Item = GeoSegment>) -> QuadNode {
        QuadNode::from_segments(
            segments
                .into_iter()
                .map(|s| {
                    Segment::new(
                        PlanarPoint::from_coordinate(s.a.coord, s.a.node),
                        PlanarPoint::from_coordinate(s.b.coord, s.b.node),
                    )
                })
                .collect(),
        )
    }

    /// Insert a segment.  Returns `false` when the segment's bounding box
    /// does not intercept this quadrant.
    pub fn insert(&mut self, segment: Segment) -> bool {
        if !self.quadrant.intercepts(&segment.bounding_box()) {
            return false;
        }
        if self.is_leaf() && (self.segments.len() <= CAPACITY || self.depth == MAX_DEPTH) {
            self.segments.push(segment);
            return true;
        }
        self.rebalance(segment);
        true
    }

    /// Route this node's payload plus `segment` into children, classifying
    /// each bounding box against the centre strip, then promote to internal.
    fn rebalance(&mut self, segment: Segment) {
        let middle = self.quadrant.middle();
        let quads = self.quadrant.split();

        let mut pending = std::mem::take(&mut self.segments);
        pending.push(segment);

        for seg in pending {
            let bb = seg.bounding_box();
            if !bb.intercepts(&self.quadrant) {
                continue;
            }
            for &i in route_targets(&bb, &middle) {
                self.child_or_create(i, quads[i]).insert(seg);
            }
        }
    }

    fn child_or_create(&mut self, i: usize, quadrant: Rect) -> &mut QuadNode {
        let depth = self.depth + 1;
        self.children[i]
            .get_or_insert_with(|| Box::new(QuadNode::with_quadrant(quadrant, depth)))
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(|c| c.is_none())
    }

    // ── Nearest query ─────────────────────────────────────────────────────

    /// Nearest non-ignored segment to a geographic coordinate.
    ///
    /// A segment is ignored when **either** endpoint's node id is in
    /// `ignore` — callers masking a node out hide every edge touching it.
    pub fn geo_query(&self, coord: Coordinate, ignore: &FxHashSet<NodeId>) -> GeoNearestResult {
        let query = PlanarPoint::from_coordinate(coord, NodeId::INVALID);
        let result = self.query(query, ignore);
        if !result.distance.is_finite() {
            return GeoNearestResult::NONE;
        }
        let projection = result.projection.to_coordinate();
        GeoNearestResult {
            segment: GeoSegment {
                a: GeoPoint::new(result.segment.a.to_coordinate(), result.segment.a.node),
                b: GeoPoint::new(result.segment.b.to_coordinate(), result.segment.b.node),
            },
            distance: coord.distance_m(projection),
            projection,
        }
    }

    /// Planar nearest-segment query.
    pub fn query(&self, p: PlanarPoint, ignore: &FxHashSet<NodeId>) -> NearestResult {
        let mut branch = Vec::new();
        self.branch_from_point(p, &mut branch);
        let Some(deepest) = branch.last() else {
            return NearestResult::NONE;
        };

        // Upper bound on any feasible improvement: the best candidate stored
        // in the deepest quadrant containing the point.
        let mut circle = Circle::new(p, deepest.min_distance(p, ignore));

        let mut best = NearestResult::NONE;
        for (i, node) in branch.iter().enumerate().rev() {
            let avoid = branch.get(i + 1).copied();
            let nearest = node.nearest_segment(&mut circle, ignore, avoid);
            if nearest.distance < best.distance {
                best = nearest;
            }
        }
        best
    }

    /// Collect the descent path of every node whose quadrant contains `p`.
    /// On a boundary the branch may fork; all matching children are followed.
    fn branch_from_point<'a>(&'a self, p: PlanarPoint, out: &mut Vec<&'a QuadNode>) {
        if !self.quadrant.contains(p) {
            return;
        }
        out.push(self);
        for child in self.children.iter().flatten() {
            child.branch_from_point(p, out);
        }
    }

    /// Best candidate under this node, shrinking `circle` as better segments
    /// appear.  `avoid` is the already-visited child from the branch walk.
    fn nearest_segment(
        &self,
        circle: &mut Circle,
        ignore: &FxHashSet<NodeId>,
        avoid: Option<&QuadNode>,
    ) -> NearestResult {
        let mut best = NearestResult::NONE;
        if self.is_leaf() {
            for segment in &self.segments {
                if ignore.contains(&segment.a.node) || ignore.contains(&segment.b.node) {
                    continue;
                }
                let projection = segment.project(circle.center);
                let distance = projection.distance_sq(circle.center);
                if distance <= circle.radius {
                    best = NearestResult {
                        segment: *segment,
                        distance,
                        projection,
                    };
                    circle.expand(distance);
                }
            }
        } else {
            for child in self.children.iter().flatten() {
                if avoid.is_some_and(|a| std::ptr::eq(a, child.as_ref())) {
                    continue;
                }
                if !circle.intersects_rect(&child.quadrant) {
                    continue;
                }
                let nearest = child.nearest_segment(circle, ignore, avoid);
                if nearest.distance < best.distance {
                    best = nearest;
                }
            }
        }
        best
    }

    /// Minimum squared distance from `p` to any non-ignored segment stored at
    /// this node; infinite when there is none.
    fn min_distance(&self, p: PlanarPoint, ignore: &FxHashSet<NodeId>) -> f64 {
        self.segments
            .iter()
            .filter(|s| !ignore.contains(&s.a.node) && !ignore.contains(&s.b.node))
            .map(|s| s.project(p).distance_sq(p))
            .fold(f64::INFINITY, f64::min)
    }
}

/// Which children must receive a segment with bounding box `bb`: entirely on
/// one side of the middle strip → the two children of that side; straddling →
/// all four (deliberate duplication preserves query correctness).
fn route_targets(bb: &Rect, middle: &Rect) -> &'static [usize] {
    if bb.x.max <= middle.x.min {
        &[UPPER_LEFT, LOWER_LEFT]
    } else if bb.x.min >= middle.x.max {
        &[UPPER_RIGHT, LOWER_RIGHT]
    } else if bb.y.max <= middle.y.min {
        &[LOWER_RIGHT, LOWER_LEFT]
    } else if bb.y.min >= middle.y.max {
        &[UPPER_LEFT, UPPER_RIGHT]
    } else {
        &[UPPER_LEFT, UPPER_RIGHT, LOWER_RIGHT, LOWER_LEFT]
    }
}
