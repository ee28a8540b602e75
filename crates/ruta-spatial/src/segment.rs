//! Planar line segment.

use crate::interval::Interval;
use crate::point::PlanarPoint;
use crate::rect::Rect;

/// An ordered pair of planar points; `a` is the origin, `b` the destination.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub a: PlanarPoint,
    pub b: PlanarPoint,
}

impl Segment {
    #[inline]
    pub fn new(a: PlanarPoint, b: PlanarPoint) -> Self {
        Self { a, b }
    }

    pub fn midpoint(&self) -> PlanarPoint {
        PlanarPoint::anonymous((self.a.x + self.b.x) * 0.5, (self.a.y + self.b.y) * 0.5)
    }

    /// Orthogonal projection of `p` onto the segment.
    ///
    /// Projects onto the infinite line through `a`,`b`, then clamps via the
    /// dot-product parameter: outside `(0, 1)` returns the nearer endpoint.
    /// A degenerate segment (`a == b`) returns `a`.
    pub fn project(&self, p: PlanarPoint) -> PlanarPoint {
        let dx = self.b.x - self.a.x;
        let dy = self.b.y - self.a.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return self.a;
        }
        let dot = (p.x - self.a.x) * dx + (p.y - self.a.y) * dy;
        if dot <= 0.0 {
            return self.a;
        }
        if dot >= len_sq {
            return self.b;
        }
        let t = dot / len_sq;
        PlanarPoint::anonymous(self.a.x + dx * t, self.a.y + dy * t)
    }

    /// Tight axis-aligned bounding box.
    pub fn bounding_box(&self) -> Rect {
        Rect::new(
            Interval::new(self.a.x.min(self.b.x), self.a.x.max(self.b.x)),
            Interval::new(self.a.y.min(self.b.y), self.a.y.max(self.b.y)),
        )
    }

    /// Standard four-orientation intersection test with the collinear
    /// endpoint special cases.
    pub fn intersects(&self, other: &Segment) -> bool {
        let (p1, q1) = (self.a, self.b);
        let (p2, q2) = (other.a, other.b);

        let o1 = orientation(p1, q1, p2);
        let o2 = orientation(p1, q1, q2);
        let o3 = orientation(p2, q2, p1);
        let o4 = orientation(p2, q2, q1);

        if o1 != o2 && o3 != o4 {
            return true;
        }

        // Collinear cases: an endpoint of one segment lies on the other.
        (o1 == Orientation::Collinear && on_segment(p1, p2, q1))
            || (o2 == Orientation::Collinear && on_segment(p1, q2, q1))
            || (o3 == Orientation::Collinear && on_segment(p2, p1, q2))
            || (o4 == Orientation::Collinear && on_segment(p2, q1, q2))
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

fn orientation(p: PlanarPoint, q: PlanarPoint, r: PlanarPoint) -> Orientation {
    let det = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if det == 0.0 {
        Orientation::Collinear
    } else if det > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// For collinear p, q, r: does `q` lie within the bounding box of `p`–`r`?
fn on_segment(p: PlanarPoint, q: PlanarPoint, r: PlanarPoint) -> bool {
    p.x.max(r.x) >= q.x && q.x >= p.x.min(r.x) && p.y.max(r.y) >= q.y && q.y >= p.y.min(r.y)
}
