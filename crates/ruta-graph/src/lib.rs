//! `ruta-graph` — road graph store, map compression, and shortest paths.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`graph`]    | `Graph`, `Node`, `Edge`, `EdgeDirection`, attachment API |
//! | [`compress`] | COMA compression pass (`Graph::compress`)               |
//! | [`dijkstra`] | `ShortestPathCriteria`, `Route`, the path engine        |
//! | [`persist`]  | graph blob save/load (index rebuilt on load)            |
//! | [`osm`]      | PBF ingest (feature = `"osm"` only)                     |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                          |
//!
//! # Pipeline
//!
//! ```ignore
//! let mut graph = osm::graph_from_pbf(&options)?; // or Graph::load(path)?
//! graph.build_edge_index();
//! graph.compress(0.4);                            // rebuilds the index
//! graph.add_data(&pickup_points)?;
//! let route = graph.shortest_path(from, to)?;
//! ```
//!
//! # Feature flags
//!
//! | Flag  | Effect                                             |
//! |-------|----------------------------------------------------|
//! | `osm` | Enables PBF ingestion via `osmpbf` (+ `geo` for coverage polygons). |

pub mod compress;
pub mod dijkstra;
pub mod error;
pub mod graph;
pub mod persist;

#[cfg(feature = "osm")]
pub mod osm;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use dijkstra::{Route, ShortestPathCriteria};
pub use error::{GraphError, GraphResult};
pub use graph::{Edge, EdgeDirection, Graph, Node};
