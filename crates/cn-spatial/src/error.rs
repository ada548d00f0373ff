//! Spatial-subsystem error type.
//!
//! None of these reach a ranking caller: the distance strategies turn every
//! routing failure into "no road distance".  They surface only from the
//! explicit cache and build operations.

use thiserror::Error;

use cn_core::NodeId;

/// Errors produced by `cn-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("search budget exhausted after settling {settled} nodes")]
    BudgetExceeded { settled: usize },

    #[error("graph cache error: {0}")]
    Cache(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
