//! Graph blob persistence.
//!
//! The blob carries the node vector and both adjacency tables; the edge
//! index is never written — it is deterministic given the adjacency and is
//! rebuilt on load.  Producer and consumer must run the same blob version;
//! no in-band format versioning is attempted.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::GraphResult;
use crate::graph::Graph;

impl Graph {
    /// Write the graph blob to `path`.  A partially written file on failure
    /// is the caller's to clean up; the in-memory graph is untouched.
    pub fn save(&self, path: &Path) -> GraphResult<()> {
        let file = File::create(path)?;
        bincode::serialize_into(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Read a graph blob and rebuild its edge index.  On failure the error
    /// propagates and no graph value is produced, so a caller's previous
    /// graph stays valid.
    pub fn load(path: &Path) -> GraphResult<Graph> {
        let file = File::open(path)?;
        let mut graph: Graph = bincode::deserialize_from(BufReader::new(file))?;
        graph.build_edge_index();
        Ok(graph)
    }
}
