//! OSM PBF ingest — enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use ruta_graph::osm::{graph_from_pbf, Mode, PbfOptions};
//!
//! let mut graph = graph_from_pbf(&PbfOptions::new("caracas.osm.pbf", Mode::Driving))?;
//! graph.build_edge_index();
//! ```
//!
//! # What is loaded
//!
//! Ways whose `highway` tag is in the driving set; cycling mode widens the
//! set and additionally accepts any way carrying a `bicycle` tag.  Each
//! consecutive node pair of an accepted way becomes one relation, directed
//! per the way's `oneway`/`junction`/`cycleway` tags.  An optional coverage
//! polygon drops nodes outside it (and with them, their way segments).
//!
//! # Memory note
//!
//! The single sequential pass buffers all OSM node coordinates, because ways
//! reference nodes by id and may precede or follow them in the stream.  The
//! buffer is dropped once the graph is built.

use std::path::PathBuf;

use geo::{Contains, Point, Polygon};
use osmpbf::{Element, ElementReader};
use rustc_hash::{FxHashMap, FxHashSet};

use ruta_core::{CellId, Coordinate, NodeId};

use crate::error::{GraphError, GraphResult};
use crate::graph::{EdgeDirection, Graph};

// ── Options ───────────────────────────────────────────────────────────────────

/// Road-network profile to extract.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Driving,
    Cycling,
}

/// Custom edge-weight hook; the default is haversine metres between the
/// endpoints.
pub type WeightFn = fn(Coordinate, Coordinate) -> f32;

/// Ingest configuration.
pub struct PbfOptions {
    pub path: PathBuf,
    pub mode: Mode,
    /// Keep only nodes inside this polygon (x = lng, y = lat).
    pub coverage: Option<Polygon<f64>>,
    pub weight: Option<WeightFn>,
}

impl PbfOptions {
    pub fn new(path: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            path: path.into(),
            mode,
            coverage: None,
            weight: None,
        }
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Build a [`Graph`] from an OSM PBF file.
///
/// The returned graph has no edge index yet — call
/// [`Graph::build_edge_index`] (or [`Graph::compress`], which rebuilds it)
/// before spatial queries.
///
/// # Errors
///
/// [`GraphError::Osm`] on malformed input.
pub fn graph_from_pbf(options: &PbfOptions) -> GraphResult<Graph> {
    // ── Phase 1: one sequential pass over nodes and ways ──────────────────
    let reader = ElementReader::from_path(&options.path).map_err(osm_error)?;

    let mut coords: FxHashMap<i64, Coordinate> = FxHashMap::default();
    let mut ways: Vec<AcceptedWay> = Vec::new();

    reader
        .for_each(|element| match element {
            Element::Node(n) => {
                coords.insert(n.id(), Coordinate::new(n.lat(), n.lon()));
            }
            Element::DenseNode(n) => {
                coords.insert(n.id(), Coordinate::new(n.lat(), n.lon()));
            }
            Element::Way(w) => {
                // Collect tags eagerly so &str lifetimes don't escape the closure.
                let tags: Vec<(&str, &str)> = w.tags().collect();
                if accepts(&tags, options.mode) {
                    ways.push(AcceptedWay {
                        refs: w.refs().collect(),
                        direction: way_direction(&tags, options.mode),
                    });
                }
            }
            _ => {}
        })
        .map_err(osm_error)?;

    // ── Phase 2: materialize nodes on first reference, then relate ────────
    let road_nodes: FxHashSet<i64> = ways
        .iter()
        .flat_map(|w| w.refs.iter().copied())
        .collect();
    let mut graph = Graph::with_capacity(road_nodes.len());
    let mut ids: FxHashMap<i64, NodeId> =
        FxHashMap::with_capacity_and_hasher(road_nodes.len(), Default::default());
    drop(road_nodes);

    let mut segments = 0usize;

    for way in &ways {
        for window in way.refs.windows(2) {
            let Some(a) = resolve(&mut graph, &mut ids, &coords, options, window[0]) else {
                continue;
            };
            let Some(b) = resolve(&mut graph, &mut ids, &coords, options, window[1]) else {
                continue;
            };

            let (ca, cb) = (graph.coordinate(a), graph.coordinate(b));
            let weight = match options.weight {
                Some(weigh) => weigh(ca, cb),
                None => ca.distance_m(cb) as f32,
            };
            graph.relate_nodes(a, b, weight, way.direction);
            segments += 1;
        }
    }

    log::info!(
        "loaded {} nodes, {} way segments ({} ways) from {}",
        graph.node_count(),
        segments,
        ways.len(),
        options.path.display(),
    );
    Ok(graph)
}

/// Graph id for an OSM node: reuse, or materialize if its coordinate is
/// known and inside the coverage polygon.
fn resolve(
    graph: &mut Graph,
    ids: &mut FxHashMap<i64, NodeId>,
    coords: &FxHashMap<i64, Coordinate>,
    options: &PbfOptions,
    osm_id: i64,
) -> Option<NodeId> {
    if let Some(&id) = ids.get(&osm_id) {
        return Some(id);
    }
    let &coord = coords.get(&osm_id)?;
    if let Some(polygon) = &options.coverage {
        if !polygon.contains(&Point::new(coord.lng, coord.lat)) {
            return None;
        }
    }
    let id = graph.add_node(CellId::from_coordinate(coord));
    ids.insert(osm_id, id);
    Some(id)
}

fn osm_error(e: osmpbf::Error) -> GraphError {
    GraphError::Osm(e.to_string())
}

// ── Internal types ────────────────────────────────────────────────────────────

struct AcceptedWay {
    refs: Vec<i64>,
    direction: EdgeDirection,
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

const DRIVING_HIGHWAYS: &[&str] = &[
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
    "residential",
    "unclassified",
    "living_street",
];

const CYCLING_HIGHWAYS: &[&str] = &[
    "road",
    "track",
    "path",
    "footway",
    "pedestrian",
    "steps",
    "cycleway",
];

/// Is this way part of the requested road network?  Cycling mode accepts the
/// widened highway set, and any way tagged `bicycle` regardless of its
/// `highway` value.
fn accepts(tags: &[(&str, &str)], mode: Mode) -> bool {
    let highway = tag(tags, "highway");
    let driving = highway.is_some_and(|h| DRIVING_HIGHWAYS.contains(&h));
    match mode {
        Mode::Driving => driving,
        Mode::Cycling => {
            driving
                || highway.is_some_and(|h| CYCLING_HIGHWAYS.contains(&h))
                || tag(tags, "bicycle").is_some()
        }
    }
}

/// Direction of an accepted way.  Contraflow cycling infrastructure keeps a
/// way bidirectional for bikes even when it is one-way for cars.
fn way_direction(tags: &[(&str, &str)], mode: Mode) -> EdgeDirection {
    if mode == Mode::Cycling {
        if matches!(
            tag(tags, "cycleway"),
            Some("opposite" | "opposite_track" | "opposite_lane")
        ) {
            return EdgeDirection::Bidirectional;
        }
        if tag(tags, "oneway:bicycle") == Some("no") {
            return EdgeDirection::Bidirectional;
        }
    }
    if tag(tags, "oneway") == Some("yes") || tag(tags, "junction") == Some("roundabout") {
        return EdgeDirection::LeftToRight;
    }
    EdgeDirection::Bidirectional
}

fn tag<'a>(tags: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    tags.iter().find(|(k, _)| *k == key).map(|&(_, v)| v)
}
