//! Search circle for branch-and-bound pruning.

use crate::point::PlanarPoint;
use crate::rect::Rect;

/// A pruning volume around a query point.  `radius` is a **squared** planar
/// distance, consistent with the rest of the kit; the circle shrinks as the
/// nearest-segment walk finds better candidates.
#[derive(Copy, Clone, Debug)]
pub struct Circle {
    pub center: PlanarPoint,
    pub radius: f64,
}

impl Circle {
    #[inline]
    pub fn new(center: PlanarPoint, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, p: PlanarPoint) -> bool {
        p.distance_sq(self.center) < self.radius
    }

    /// Does the circle reach into `rect`?  Clamps the centre into the
    /// rectangle and compares the squared distance against the radius.
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        rect.clamp_point(self.center).distance_sq(self.center) <= self.radius
    }

    /// Replace the radius (callers pass a newly found squared distance).
    #[inline]
    pub fn expand(&mut self, radius: f64) {
        self.radius = radius;
    }
}
