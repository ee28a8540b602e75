//! Graph-subsystem error type.

use thiserror::Error;

/// Errors produced by `ruta-graph`.
///
/// Routing data-shape problems (unknown node, unreachable target, non-finite
/// coordinate) never surface here — they come back as sentinel costs and
/// empty outputs so a bad query cannot abort a serving process.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("edge index is empty; build it from a graph with at least one edge")]
    EmptyIndex,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("graph blob codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

/// Shorthand result type for `ruta-graph`.
pub type GraphResult<T> = Result<T, GraphError>;
