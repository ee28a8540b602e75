//! `ruta-spatial` — planar geometry and the nearest-edge quadtree.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`interval`] | 1-D closed `Interval`                                     |
//! | [`point`]    | `PlanarPoint` (projected x/y + originating node id)       |
//! | [`rect`]     | Axis-aligned `Rect`, quadrant splitting                   |
//! | [`segment`]  | `Segment` projection / intersection primitives            |
//! | [`circle`]   | Search `Circle` (squared-radius pruning volume)           |
//! | [`mercator`] | Conformal lat/lng ↔ plane projection                      |
//! | [`index`]    | `QuadNode` edge index, `geo_query` nearest-edge search    |
//!
//! # Distance convention
//!
//! Every distance inside this crate is **squared Euclidean in the projection
//! plane**, including the pruning radius of [`circle::Circle`].  The planar
//! numbers are only ever compared against each other; the geographic result
//! surfaced by [`index::QuadNode::geo_query`] is haversine metres computed on
//! the inverse-projected projection point.

pub mod circle;
pub mod index;
pub mod interval;
pub mod mercator;
pub mod point;
pub mod rect;
pub mod segment;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use circle::Circle;
pub use index::{GeoNearestResult, GeoPoint, GeoSegment, NearestResult, QuadNode};
pub use interval::Interval;
pub use point::PlanarPoint;
pub use rect::Rect;
pub use segment::Segment;
