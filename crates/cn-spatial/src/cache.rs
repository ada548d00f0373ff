//! On-disk road graph cache and the process-wide shared handle.
//!
//! # File format
//!
//! A cache file is one bincode (standard config) document:
//!
//! ```text
//! GraphFile {
//!     format_version: u32,         // FORMAT_VERSION
//!     region:         String,      // e.g. "incheon"
//!     nodes:          Vec<(f64, f64)>,
//!     edges:          Vec<(u32, u32, f32)>,  // from, to, length_m
//! }
//! ```
//!
//! Only the raw graph is stored; CSR arrays and the R-tree are rebuilt on
//! load through [`RoadNetworkBuilder`], which also re-validates the data.
//!
//! # Failure policy
//!
//! A missing file is the normal "no graph yet" state.  A file that cannot be
//! decoded, has another version or region, or is structurally invalid is
//! logged and ignored.  Neither case is an error for callers: the engine
//! simply runs in straight-line mode.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::JoinHandle;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cn_core::{GeoPoint, NodeId};

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::router::SearchBudget;
use crate::{SpatialError, SpatialResult};

/// Bumped whenever `GraphFile` changes shape.
pub const FORMAT_VERSION: u32 = 1;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Where the road graph lives and how it may be queried.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GraphConfig {
    pub cache_path: PathBuf,
    /// Region key written into and checked against the cache file.
    pub region:     String,
    /// A point farther than this from every road node is unreachable.
    pub max_snap_m: f64,
    pub budget:     SearchBudget,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from("./incheon_graph.bin"),
            region:     "incheon".to_owned(),
            max_snap_m: 2_000.0,
            budget:     SearchBudget::default(),
        }
    }
}

// ── File format ───────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct GraphFile {
    format_version: u32,
    region:         String,
    nodes:          Vec<(f64, f64)>,
    edges:          Vec<(u32, u32, f32)>,
}

impl GraphFile {
    fn from_network(network: &RoadNetwork, region: &str) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            region:         region.to_owned(),
            nodes:          network.node_pos.iter().map(|p| (p.lat, p.lon)).collect(),
            edges:          network.edges().map(|(f, t, len)| (f.0, t.0, len)).collect(),
        }
    }

    fn into_network(self, region: &str) -> SpatialResult<RoadNetwork> {
        if self.format_version != FORMAT_VERSION {
            return Err(SpatialError::Cache(format!(
                "format version {} (expected {FORMAT_VERSION})",
                self.format_version
            )));
        }
        if self.region != region {
            return Err(SpatialError::Cache(format!(
                "region {:?} (expected {region:?})",
                self.region
            )));
        }

        let mut builder = RoadNetworkBuilder::with_capacity(self.nodes.len(), self.edges.len());
        for (lat, lon) in self.nodes {
            let pos = GeoPoint::validated(lat, lon)
                .map_err(|e| SpatialError::Cache(e.to_string()))?;
            builder.add_node(pos);
        }
        let node_count = builder.node_count() as u32;
        for (from, to, len) in self.edges {
            if from >= node_count || to >= node_count {
                return Err(SpatialError::Cache(format!(
                    "edge {from}->{to} references a node outside 0..{node_count}"
                )));
            }
            if !len.is_finite() || len < 0.0 {
                return Err(SpatialError::Cache(format!("edge {from}->{to} has length {len}")));
            }
            builder.add_directed_edge(NodeId(from), NodeId(to), len);
        }
        Ok(builder.build())
    }
}

// ── Load / save ───────────────────────────────────────────────────────────────

/// Read a persisted graph.  Returns `None` if the file is missing or
/// unusable; the reason is logged.
pub fn load(path: &Path, region: &str) -> Option<RoadNetwork> {
    match try_load(path, region) {
        Ok(network) => {
            info!(
                path = %path.display(),
                region,
                nodes = network.node_count(),
                edges = network.edge_count(),
                "loaded road graph cache"
            );
            Some(network)
        }
        Err(SpatialError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no road graph cache; using straight-line distances");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unusable road graph cache");
            None
        }
    }
}

/// Like [`load`] but reports why the file was rejected.
pub fn try_load(path: &Path, region: &str) -> SpatialResult<RoadNetwork> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let graph: GraphFile =
        bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())
            .map_err(|e| SpatialError::Cache(e.to_string()))?;
    graph.into_network(region)
}

/// Persist `network` for `region` at `path`.
///
/// Writes to a sibling temporary file and renames it into place, so a
/// concurrent [`load`] never observes a partially written cache.
pub fn save(network: &RoadNetwork, region: &str, path: &Path) -> SpatialResult<()> {
    let tmp = path.with_extension("tmp");
    {
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        bincode::serde::encode_into_std_write(
            GraphFile::from_network(network, region),
            &mut writer,
            bincode::config::standard(),
        )
        .map_err(|e| SpatialError::Cache(e.to_string()))?;
        writer.flush()?;
    }
    std::fs::rename(&tmp, path)?;
    info!(
        path = %path.display(),
        region,
        nodes = network.node_count(),
        edges = network.edge_count(),
        "saved road graph cache"
    );
    Ok(())
}

// ── GraphCache ────────────────────────────────────────────────────────────────

enum CacheState {
    Unloaded,
    Absent,
    Ready(Arc<RoadNetwork>),
}

/// Shared, lazily loaded road graph for one region.
///
/// - The file is read at most once: concurrent first callers serialize on
///   `load_lock` and all but the first find the state already resolved.
/// - After that, [`graph`](Self::graph) only clones an `Arc` under a read
///   lock; queries on the graph itself take no lock at all.
/// - Building is never done implicitly.  [`request_build`](Self::request_build)
///   runs it on a background thread while callers keep the current state.
pub struct GraphCache {
    path:      PathBuf,
    region:    String,
    state:     RwLock<CacheState>,
    load_lock: Mutex<()>,
    building:  AtomicBool,
}

impl GraphCache {
    pub fn new(path: impl Into<PathBuf>, region: impl Into<String>) -> Self {
        Self {
            path:      path.into(),
            region:    region.into(),
            state:     RwLock::new(CacheState::Unloaded),
            load_lock: Mutex::new(()),
            building:  AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &GraphConfig) -> Self {
        Self::new(config.cache_path.clone(), config.region.clone())
    }

    /// Handle that already holds `network` and never touches the disk.
    pub fn preloaded(network: RoadNetwork, region: impl Into<String>) -> Self {
        let cache = Self::new(PathBuf::new(), region);
        cache.install(network);
        cache
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// The loaded graph, reading the cache file on first call.
    pub fn graph(&self) -> Option<Arc<RoadNetwork>> {
        if let Some(resolved) = self.resolved() {
            return resolved;
        }

        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished the load while we waited.
        if let Some(resolved) = self.resolved() {
            return resolved;
        }

        let loaded = load(&self.path, &self.region).map(Arc::new);
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // A background build may have installed a graph meanwhile.
        if let CacheState::Ready(network) = &*state {
            return Some(Arc::clone(network));
        }
        *state = match &loaded {
            Some(network) => CacheState::Ready(Arc::clone(network)),
            None => CacheState::Absent,
        };
        loaded
    }

    /// `true` once a graph is loaded or installed.  Does not trigger a load.
    pub fn is_ready(&self) -> bool {
        matches!(
            *self.state.read().unwrap_or_else(PoisonError::into_inner),
            CacheState::Ready(_)
        )
    }

    pub fn is_building(&self) -> bool {
        self.building.load(Ordering::Acquire)
    }

    /// Make `network` the current graph.  Requests already holding the old
    /// `Arc` finish on it.
    pub fn install(&self, network: RoadNetwork) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = CacheState::Ready(Arc::new(network));
    }

    /// Forget the current state so the next [`graph`](Self::graph) call
    /// re-reads the cache file.
    pub fn reload(&self) {
        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = CacheState::Unloaded;
    }

    /// Run `build` on a background thread, persist the result, and install
    /// it.
    ///
    /// Returns `None` if a build is already running.  The handle yields the
    /// build's outcome; dropping it detaches the thread.  A failed save is
    /// logged but the built graph is still installed for this process.
    pub fn request_build<F>(self: &Arc<Self>, build: F) -> Option<JoinHandle<SpatialResult<()>>>
    where
        F: FnOnce() -> SpatialResult<RoadNetwork> + Send + 'static,
    {
        if self
            .building
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(region = %self.region, "road graph build already in progress");
            return None;
        }

        let cache = Arc::clone(self);
        Some(std::thread::spawn(move || {
            info!(region = %cache.region, "road graph build started");
            let outcome = build().map(|network| {
                if let Err(e) = save(&network, &cache.region, &cache.path) {
                    warn!(error = %e, "road graph built but could not be saved");
                }
                cache.install(network);
                info!(region = %cache.region, "road graph build installed");
            });
            if let Err(e) = &outcome {
                warn!(region = %cache.region, error = %e, "road graph build failed");
            }
            cache.building.store(false, Ordering::Release);
            outcome
        }))
    }

    fn resolved(&self) -> Option<Option<Arc<RoadNetwork>>> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            CacheState::Unloaded => None,
            CacheState::Absent => Some(None),
            CacheState::Ready(network) => Some(Some(Arc::clone(network))),
        }
    }
}
