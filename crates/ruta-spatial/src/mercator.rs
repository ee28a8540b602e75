//! Conformal Mercator projection used as the quadtree substrate.
//!
//! The projection is conformal, so planar distances are locally uniform in
//! every direction and squared-distance comparisons rank candidates the same
//! way ground distances do.  No caller ever sees a planar unit; the fixed
//! scale does not attempt to be metres.

use ruta_core::Coordinate;

/// Planar x at longitude ±180°.
const MAX_X: f64 = 4_775_228.750_153_34;

/// Planar units per radian.
const SCALE: f64 = MAX_X / std::f64::consts::PI;

/// Project (lat, lng) degrees into the plane: `x = S·λ`, `y = S·atanh(sin φ)`.
pub fn to_plane(coord: Coordinate) -> (f64, f64) {
    let sin_lat = coord.lat.to_radians().sin();
    // atanh form is more accurate near zero than log(tan(π/4 + φ/2)).
    let y = 0.5 * ((1.0 + sin_lat) / (1.0 - sin_lat)).ln();
    (SCALE * coord.lng.to_radians(), SCALE * y)
}

/// Inverse projection: `φ = asin(tanh(y/S))`, `λ = x/S`.
pub fn to_coordinate(x: f64, y: f64) -> Coordinate {
    Coordinate {
        lat: (y / SCALE).tanh().asin().to_degrees(),
        lng: (x / SCALE).to_degrees(),
    }
}
