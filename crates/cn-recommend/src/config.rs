use std::path::{Path, PathBuf};

use cn_spatial::GraphConfig;

use crate::nearest::RankOptions;

/// Engine-wide settings.  Every field has a default, so a partial JSON file
/// is enough to override one value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RecommendConfig {
    pub rank:       RankOptions,
    /// Restaurants and leisure sites returned per anchor.
    pub amenity_k:  usize,
    /// Bus stops considered around the user and around the facility.
    pub bus_stop_k: usize,
    pub graph:      GraphConfig,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            rank:       RankOptions::default(),
            amenity_k:  20,
            bus_stop_k: 10,
            graph:      GraphConfig::default(),
        }
    }
}

/// Locations of the normalized input datasets.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DatasetPaths {
    pub facilities:  PathBuf,
    pub restaurants: PathBuf,
    pub leisure:     PathBuf,
    pub bus_stops:   PathBuf,
    pub routes:      PathBuf,
}

impl DatasetPaths {
    /// The standard file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            facilities:  dir.join("facilities.csv"),
            restaurants: dir.join("restaurants.csv"),
            leisure:     dir.join("leisure.csv"),
            bus_stops:   dir.join("bus_stops.csv"),
            routes:      dir.join("routes.csv"),
        }
    }
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self::in_dir("data")
    }
}
