//! End-to-end recommendation for one user point.
//!
//! ```text
//! user ─▶ NearestFacilityResolver ─▶ facility
//!   │                                   ├─▶ restaurants, leisure (k nearest)
//!   │                                   └─▶ bus stops near the facility ┐
//!   └─▶ bus stops near the user ─────────────────────────────────────── ├─▶ match_routes
//!                                                                       ┘
//! ```
//!
//! With no facility found, restaurants and leisure are anchored at the user
//! and there is no transit match.

use std::sync::Arc;

use tracing::{debug, info};

use cn_core::{
    AmenityRecord, CoreResult, Degradation, Facility, GeoPoint, Located, RankedCandidate,
    Ranking, Snapshot, load_places_csv,
};
use cn_spatial::GraphCache;
use cn_transit::{
    MatchResult, RouteRow, StopRouteIndex, load_route_rows_csv, match_routes, stop_pairs,
};

use crate::amenity::AmenityFinder;
use crate::config::{DatasetPaths, RecommendConfig};
use crate::nearest::NearestFacilityResolver;

// ── Datasets ──────────────────────────────────────────────────────────────────

/// One consistent version of every input dataset.
pub struct Datasets {
    pub facilities:  Vec<Facility>,
    pub restaurants: AmenityFinder<AmenityRecord>,
    pub leisure:     AmenityFinder<AmenityRecord>,
    pub bus_stops:   AmenityFinder<AmenityRecord>,
    pub transit:     StopRouteIndex,
}

impl Datasets {
    pub fn new(
        facilities: Vec<Facility>,
        restaurants: Vec<AmenityRecord>,
        leisure: Vec<AmenityRecord>,
        bus_stops: Vec<AmenityRecord>,
        route_rows: impl IntoIterator<Item = RouteRow>,
    ) -> Self {
        Self {
            facilities,
            restaurants: AmenityFinder::new(restaurants),
            leisure: AmenityFinder::new(leisure),
            bus_stops: AmenityFinder::new(bus_stops),
            transit: StopRouteIndex::build(route_rows),
        }
    }

    /// Load every dataset from its CSV file.
    pub fn load(paths: &DatasetPaths) -> CoreResult<Self> {
        let datasets = Self::new(
            load_places_csv(&paths.facilities)?,
            load_places_csv(&paths.restaurants)?,
            load_places_csv(&paths.leisure)?,
            load_places_csv(&paths.bus_stops)?,
            load_route_rows_csv(&paths.routes)?,
        );
        info!(
            facilities = datasets.facilities.len(),
            restaurants = datasets.restaurants.records().len(),
            leisure = datasets.leisure.records().len(),
            bus_stops = datasets.bus_stops.records().len(),
            stops = datasets.transit.stop_count(),
            routes = datasets.transit.route_count(),
            "datasets loaded"
        );
        Ok(datasets)
    }
}

impl Default for Datasets {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }
}

// ── Recommendation ────────────────────────────────────────────────────────────

/// Everything shown to a user for one query.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Recommendation {
    pub facilities:     Ranking<Facility>,
    /// Near the chosen facility, or near the user if there is none.
    pub restaurants:    Vec<RankedCandidate<AmenityRecord>>,
    pub leisure:        Vec<RankedCandidate<AmenityRecord>>,
    pub user_stops:     Vec<RankedCandidate<AmenityRecord>>,
    pub facility_stops: Vec<RankedCandidate<AmenityRecord>>,
    /// `None` when no facility was found.
    pub transit:        Option<MatchResult>,
    /// Same flag as `facilities.degradation`.
    pub degradation:    Option<Degradation>,
}

impl Recommendation {
    pub fn facility(&self) -> Option<&Facility> {
        self.facilities.first().map(|c| &c.record)
    }
}

// ── Recommender ───────────────────────────────────────────────────────────────

/// Shared, thread-safe entry point.
///
/// Datasets can be replaced at any time with
/// [`replace_datasets`](Self::replace_datasets); a request that is already
/// running finishes on the version it started with.  The road graph is read
/// from the [`GraphCache`] on every request, so a graph installed by
/// [`GraphCache::request_build`] or picked up after
/// [`GraphCache::reload`] applies from the next request on.
pub struct Recommender {
    config:   RecommendConfig,
    graph:    Option<Arc<GraphCache>>,
    datasets: Snapshot<Datasets>,
}

impl Recommender {
    /// With `graph = None` every distance is straight-line.
    pub fn new(config: RecommendConfig, datasets: Datasets, graph: Option<Arc<GraphCache>>) -> Self {
        Self { config, graph, datasets: Snapshot::new(datasets) }
    }

    /// Recommender over `cache`.  The cache file is not read until the first
    /// request.
    pub fn from_cache(config: RecommendConfig, datasets: Datasets, cache: Arc<GraphCache>) -> Self {
        Self::new(config, datasets, Some(cache))
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    pub fn graph_cache(&self) -> Option<&Arc<GraphCache>> {
        self.graph.as_ref()
    }

    /// Resolver over the graph the cache holds right now.
    fn resolver(&self) -> NearestFacilityResolver {
        let graph = self.graph.as_ref().and_then(|cache| cache.graph());
        if graph.is_none() {
            debug!("no road graph; facility distances are straight-line");
        }
        NearestFacilityResolver::new(graph, &self.config.graph)
    }

    pub fn datasets(&self) -> Arc<Datasets> {
        self.datasets.current()
    }

    /// Swap in a new dataset version and return the previous one.
    pub fn replace_datasets(&self, datasets: Datasets) -> Arc<Datasets> {
        info!(facilities = datasets.facilities.len(), "replacing datasets");
        self.datasets.replace(datasets)
    }

    /// Run the full pipeline for `user`, optionally restricted to one
    /// facility category.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidInput`](cn_core::CoreError::InvalidInput) for an
    /// invalid `user` point.
    pub fn recommend(&self, user: GeoPoint, category: Option<&str>) -> CoreResult<Recommendation> {
        let user = user.validate()?;
        let data = self.datasets.current();

        let mut opts = self.config.rank.clone();
        if let Some(category) = category {
            opts.category = Some(category.to_owned());
        }
        let facilities = self.resolver().rank(user, &data.facilities, &opts)?;

        let facility_point = facilities.first().and_then(|c| c.record.location());
        let anchor = facility_point.unwrap_or(user);
        let amenity_k = self.config.amenity_k;
        let stop_k = self.config.bus_stop_k;

        let restaurants = data.restaurants.k_nearest(anchor, amenity_k)?;
        let leisure = data.leisure.k_nearest(anchor, amenity_k)?;
        let user_stops = data.bus_stops.k_nearest(user, stop_k)?;

        let (facility_stops, transit) = match facility_point {
            Some(point) => {
                let facility_stops = data.bus_stops.k_nearest(point, stop_k)?;
                let transit = match_routes(
                    &stop_pairs(&user_stops),
                    &stop_pairs(&facility_stops),
                    &data.transit,
                );
                (facility_stops, Some(transit))
            }
            None => (Vec::new(), None),
        };

        debug!(
            facility = facilities.first().map(|c| c.record.name.as_str()),
            direct_routes = transit.as_ref().map_or(0, |t| t.direct_routes.len()),
            "recommendation assembled"
        );

        Ok(Recommendation {
            degradation: facilities.degradation,
            facilities,
            restaurants,
            leisure,
            user_stops,
            facility_stops,
            transit,
        })
    }
}
