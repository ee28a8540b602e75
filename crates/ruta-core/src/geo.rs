//! Geographic coordinate type, packed cell ids, and haversine distance.
//!
//! `Coordinate` uses `f64` latitude/longitude: node locations round-trip
//! through [`CellId`], and the packed form must invert with sub-meter
//! precision, which single precision cannot guarantee at city scale.

use serde::{Deserialize, Serialize};

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine great-circle distance in metres.
    ///
    /// The only distance ever reported to callers; planar distances inside
    /// the spatial index are relative-comparison-only.
    pub fn distance_m(self, other: Coordinate) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// `true` when both components are finite numbers.  Routing entry points
    /// reject anything else up front.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lat, self.lng)
    }
}

// ── CellId ────────────────────────────────────────────────────────────────────

/// Opaque 64-bit cell identifier: a coordinate quantized to a fixed
/// high-resolution grid.
///
/// Latitude and longitude are offset to non-negative ranges and stored as
/// 1e-7° fixed point (≈ 1.1 cm at the equator), latitude in the high 32 bits.
/// That is the canonical node location: compact, hashable, and invertible to
/// a [`Coordinate`] with sub-meter precision.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct CellId(pub u64);

/// Fixed-point steps per degree.
const CELL_SCALE: f64 = 1e7;

impl CellId {
    pub fn from_coordinate(coord: Coordinate) -> Self {
        let lat = ((coord.lat + 90.0) * CELL_SCALE).round() as u64;
        let lng = ((coord.lng + 180.0) * CELL_SCALE).round() as u64;
        CellId(lat << 32 | lng)
    }

    pub fn to_coordinate(self) -> Coordinate {
        Coordinate {
            lat: (self.0 >> 32) as f64 / CELL_SCALE - 90.0,
            lng: (self.0 & 0xFFFF_FFFF) as f64 / CELL_SCALE - 180.0,
        }
    }
}
