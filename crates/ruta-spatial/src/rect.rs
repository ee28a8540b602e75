//! Axis-aligned rectangle and quadrant splitting.

use crate::interval::Interval;
use crate::point::PlanarPoint;
use crate::segment::Segment;

/// Child quadrant positions, in [`Rect::split`] order.
pub const UPPER_LEFT: usize = 0;
pub const UPPER_RIGHT: usize = 1;
pub const LOWER_RIGHT: usize = 2;
pub const LOWER_LEFT: usize = 3;

/// Half-width of the degenerate centre strip returned by [`Rect::middle`].
const MIDDLE_PADDING: f64 = 1e-5;

/// An axis-aligned rectangle: one closed interval per axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub x: Interval,
    pub y: Interval,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
    };

    #[inline]
    pub fn new(x: Interval, y: Interval) -> Self {
        Self { x, y }
    }

    /// Minimum enclosing rectangle of all segment endpoints; empty input
    /// yields [`Rect::EMPTY`].
    pub fn from_segments(segments: &[Segment]) -> Rect {
        let mut rect = Rect::EMPTY;
        for s in segments {
            rect = rect.add_point(s.a).add_point(s.b);
        }
        rect
    }

    /// Expand minimally so the rectangle contains `p`.
    pub fn add_point(&self, p: PlanarPoint) -> Rect {
        Rect::new(self.x.add_point(p.x), self.y.add_point(p.y))
    }

    pub fn intercepts(&self, other: &Rect) -> bool {
        self.x.intercepts(&other.x) && self.y.intercepts(&other.y)
    }

    pub fn contains(&self, p: PlanarPoint) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y)
    }

    /// Clamp `p` coordinatewise into the rectangle.
    pub fn clamp_point(&self, p: PlanarPoint) -> PlanarPoint {
        PlanarPoint::anonymous(self.x.clamp_point(p.x), self.y.clamp_point(p.y))
    }

    pub fn centroid(&self) -> PlanarPoint {
        PlanarPoint::anonymous(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
        )
    }

    /// Four equal sub-rectangles in UL, UR, LR, LL order.
    pub fn split(&self) -> [Rect; 4] {
        let c = self.centroid();
        [
            // upper left
            Rect::new(
                Interval::new(self.x.min, c.x),
                Interval::new(c.y, self.y.max),
            ),
            // upper right
            Rect::new(
                Interval::new(c.x, self.x.max),
                Interval::new(c.y, self.y.max),
            ),
            // lower right
            Rect::new(
                Interval::new(c.x, self.x.max),
                Interval::new(self.y.min, c.y),
            ),
            // lower left
            Rect::new(
                Interval::new(self.x.min, c.x),
                Interval::new(self.y.min, c.y),
            ),
        ]
    }

    /// Degenerate rectangle of half-width 1e-5 centred on the centroid.
    /// Classifies whether a bounding box straddles the centre of a quadrant.
    pub fn middle(&self) -> Rect {
        let c = self.centroid();
        Rect::new(
            Interval::new(c.x - MIDDLE_PADDING, c.x + MIDDLE_PADDING),
            Interval::new(c.y - MIDDLE_PADDING, c.y + MIDDLE_PADDING),
        )
    }
}
