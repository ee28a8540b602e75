//! `ruta-core` — foundational types for the `ruta` routing engine.
//!
//! This crate is a dependency of every other `ruta-*` crate.  It intentionally
//! has no `ruta-*` dependencies and a single external one (`serde`, for the
//! persisted graph blob).
//!
//! # What lives here
//!
//! | Module  | Contents                                              |
//! |---------|-------------------------------------------------------|
//! | [`ids`] | `NodeId`                                              |
//! | [`geo`] | `Coordinate`, `CellId`, haversine distance            |

pub mod geo;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::{CellId, Coordinate};
pub use ids::NodeId;
