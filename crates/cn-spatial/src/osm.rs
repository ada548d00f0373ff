//! Region road-graph builder from OSM PBF (`osm` feature).
//!
//! # Usage
//!
//! ```ignore
//! use cn_spatial::osm::{build, RegionSpec};
//!
//! let network = build(&RegionSpec::new("incheon", "incheon.osm.pbf"))?;
//! cn_spatial::cache::save(&network, "incheon", path)?;
//! ```
//!
//! This is the minutes-scale operation behind the `build_graph` admin
//! binary.  Nothing on the request path calls it; at runtime it can only be
//! reached through [`GraphCache::request_build`](crate::GraphCache::request_build),
//! which runs it on a background thread.
//!
//! # What is loaded
//!
//! `highway=*` ways selected by [`NetworkKind`], optionally clipped to a
//! bounding box (a way is kept segment by segment; a segment survives if both
//! ends are inside).  Edge length is the great-circle length of each segment.
//!
//! # Memory note
//!
//! All OSM node positions are buffered in a `HashMap<i64, GeoPoint>` for the
//! first pass because ways reference nodes by OSM id.  The map is freed
//! before the R-tree is built.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use osmpbf::{Element, ElementReader};
use tracing::info;

use cn_core::{GeoPoint, NodeId};

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::{SpatialError, SpatialResult};

// ── Region description ────────────────────────────────────────────────────────

/// Which ways become graph edges.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum NetworkKind {
    /// Car-drivable roads; one-way tags are respected.
    Drive,
    /// Anything a pedestrian may use; every segment is two-way.
    #[default]
    Walk,
}

/// Inclusive lat/lon bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&p.lat) && (self.min_lon..=self.max_lon).contains(&p.lon)
    }
}

/// Everything needed to derive one region's road graph.
#[derive(Clone, Debug)]
pub struct RegionSpec {
    /// Region key stored in the cache file.
    pub name:     String,
    pub pbf_path: PathBuf,
    pub bbox:     Option<BoundingBox>,
    pub kind:     NetworkKind,
}

impl RegionSpec {
    pub fn new(name: impl Into<String>, pbf_path: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), pbf_path: pbf_path.into(), bbox: None, kind: NetworkKind::default() }
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_kind(mut self, kind: NetworkKind) -> Self {
        self.kind = kind;
        self
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Derive the road graph for `region` from its PBF extract.
///
/// # Errors
///
/// [`SpatialError::Osm`] on parse errors, [`SpatialError::Io`] on file
/// errors.
pub fn build(region: &RegionSpec) -> SpatialResult<RoadNetwork> {
    info!(region = %region.name, path = %region.pbf_path.display(), "reading OSM extract");

    // ── Phase 1: collect all OSM nodes + road ways in one sequential pass ──
    let reader = ElementReader::from_path(&region.pbf_path)?;

    let mut all_nodes: HashMap<i64, GeoPoint> = HashMap::new();
    let mut road_ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
            }
            Element::DenseNode(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
            }
            Element::Way(w) => {
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let Some(highway) = tags.iter().find(|(k, _)| *k == "highway").map(|(_, v)| *v)
                else {
                    return;
                };
                if accepts(region.kind, highway, &tags) {
                    let oneway = region.kind == NetworkKind::Drive && is_oneway(highway, &tags);
                    road_ways.push(OsmWay { refs: w.refs().collect(), oneway });
                }
            }
            _ => {}
        })
        .map_err(|e| SpatialError::Osm(e.to_string()))?;

    // ── Phase 2: road-referenced node ids inside the region ───────────────
    let road_node_ids: HashSet<i64> = road_ways
        .iter()
        .flat_map(|w| w.refs.iter().copied())
        .filter(|id| {
            all_nodes
                .get(id)
                .is_some_and(|&p| region.bbox.is_none_or(|b| b.contains(p)))
        })
        .collect();

    // ── Phase 3: build network ────────────────────────────────────────────
    let mut builder =
        RoadNetworkBuilder::with_capacity(road_node_ids.len(), road_node_ids.len() * 2);
    let mut osm_to_cn: HashMap<i64, NodeId> = HashMap::with_capacity(road_node_ids.len());

    for osm_id in &road_node_ids {
        if let Some(&pos) = all_nodes.get(osm_id) {
            osm_to_cn.insert(*osm_id, builder.add_node(pos));
        }
    }

    drop(all_nodes);
    drop(road_node_ids);

    for way in &road_ways {
        for window in way.refs.windows(2) {
            if let (Some(&from), Some(&to)) = (osm_to_cn.get(&window[0]), osm_to_cn.get(&window[1])) {
                let len_m = builder.node_pos(from).distance_m(builder.node_pos(to)) as f32;
                builder.add_directed_edge(from, to, len_m);
                if !way.oneway {
                    builder.add_directed_edge(to, from, len_m);
                }
            }
        }
    }

    let network = builder.build();
    info!(
        region = %region.name,
        nodes = network.node_count(),
        edges = network.edge_count(),
        "road graph built"
    );
    Ok(network)
}

// ── Internal types ────────────────────────────────────────────────────────────

struct OsmWay {
    refs:   Vec<i64>,
    oneway: bool,
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

pub(crate) fn accepts(kind: NetworkKind, highway: &str, tags: &[(&str, &str)]) -> bool {
    let private = tags.iter().any(|(k, v)| *k == "access" && matches!(*v, "private" | "no"));
    if private {
        return false;
    }
    match kind {
        NetworkKind::Drive => !matches!(
            highway,
            "footway" | "path" | "cycleway" | "pedestrian" | "steps" | "track"
                | "bridleway" | "corridor" | "proposed" | "construction"
        ),
        NetworkKind::Walk => {
            let foot_no = tags.iter().any(|(k, v)| *k == "foot" && *v == "no");
            !foot_no
                && !matches!(
                    highway,
                    "motorway" | "motorway_link" | "trunk" | "trunk_link" | "proposed" | "construction"
                )
        }
    }
}

/// Motorways are implicitly one-way in OSM convention.
pub(crate) fn is_oneway(highway: &str, tags: &[(&str, &str)]) -> bool {
    let explicit = tags.iter().any(|(k, v)| *k == "oneway" && matches!(*v, "yes" | "1" | "true"));
    let implicit = matches!(highway, "motorway" | "motorway_link");
    explicit || implicit
}
