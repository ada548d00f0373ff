//! Nearest qualifying facility: cheap prefilter, expensive refine.
//!
//! # Pipeline
//!
//! ```text
//! facilities ─ category / coordinates ─▶ straight-line ─ radius ─▶ top prefilter_size
//!            ─ DistanceStrategy::resolve_many ─▶ refined ─ radius ─▶ sort ─▶ top result_size
//! ```
//!
//! Only the prefiltered candidates reach the distance strategy, so at most
//! `prefilter_size` road distances are computed per call, all from a single
//! search.  Candidates the road graph cannot reach stay in the ranking with
//! their straight-line distance and are counted in
//! [`Degradation::Approximated`].
//!
//! Ordering is by refined distance; equal distances keep dataset order.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use cn_core::{
    CoreResult, Degradation, EmptyReason, Facility, GeoPoint, Located, RankedCandidate, Ranking,
};
use cn_spatial::{DistanceStrategy, GraphCache, GraphConfig, RoadNetwork, strategy_for};

/// Tunables for [`NearestFacilityResolver::rank`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RankOptions {
    /// Keep only facilities of this category.  `None` keeps all.
    pub category:       Option<String>,
    pub max_radius_m:   f64,
    /// Number of straight-line nearest candidates that get a refined
    /// distance.
    pub prefilter_size: usize,
    pub result_size:    usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self { category: None, max_radius_m: 10_000.0, prefilter_size: 20, result_size: 5 }
    }
}

impl RankOptions {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Ranks a facility dataset around a user point.
///
/// The distance strategy is fixed at construction; a resolver built without
/// a road graph reports every ranking, empty ones included, as
/// [`Degradation::StraightLineOnly`].  At most `prefilter_size` candidates
/// are returned even when `result_size` is larger.
pub struct NearestFacilityResolver {
    strategy: Box<dyn DistanceStrategy>,
}

impl NearestFacilityResolver {
    pub fn new(graph: Option<Arc<RoadNetwork>>, config: &GraphConfig) -> Self {
        Self::with_strategy(strategy_for(graph, config))
    }

    pub fn with_strategy(strategy: Box<dyn DistanceStrategy>) -> Self {
        Self { strategy }
    }

    /// Resolver over whatever `cache` currently holds.  Triggers the lazy
    /// file load on first use but never a build.
    pub fn from_cache(cache: &GraphCache, config: &GraphConfig) -> Self {
        Self::new(cache.graph(), config)
    }

    pub fn is_road_network(&self) -> bool {
        self.strategy.is_road_network()
    }

    /// Rank `facilities` by distance from `user`.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidInput`](cn_core::CoreError::InvalidInput) if `user`
    /// is not a valid coordinate.  Every other outcome, including "nothing
    /// found", is an `Ok` ranking.
    pub fn rank(
        &self,
        user: GeoPoint,
        facilities: &[Facility],
        opts: &RankOptions,
    ) -> CoreResult<Ranking<Facility>> {
        let user = user.validate()?;
        let fallback = (!self.strategy.is_road_network()).then_some(Degradation::StraightLineOnly);
        let nothing = |reason: EmptyReason| -> Ranking<Facility> {
            Ranking { degradation: fallback, ..Ranking::empty(reason) }
        };

        // ── 1–2: eligible candidates with straight-line distance ──────────
        let mut eligible: Vec<(usize, GeoPoint, f64)> = facilities
            .iter()
            .enumerate()
            .filter(|(_, f)| opts.category.as_deref().is_none_or(|c| f.category == c))
            .filter_map(|(i, f)| f.location().map(|p| (i, p, user.distance_m(p))))
            .collect();
        if eligible.is_empty() {
            debug!(total = facilities.len(), category = ?opts.category, "no eligible facilities");
            return Ok(nothing(EmptyReason::NoCandidates));
        }

        // ── 3: radius on straight-line distance ───────────────────────────
        eligible.retain(|&(_, _, d)| d <= opts.max_radius_m);
        if eligible.is_empty() {
            return Ok(nothing(EmptyReason::OutsideRadius));
        }

        // ── 4: prefilter ──────────────────────────────────────────────────
        eligible.sort_by(|a, b| by_distance_then_index((a.2, a.0), (b.2, b.0)));
        eligible.truncate(opts.prefilter_size);

        // ── 5: refine ─────────────────────────────────────────────────────
        let targets: Vec<GeoPoint> = eligible.iter().map(|&(_, p, _)| p).collect();
        let distances = self.strategy.resolve_many(user, &targets);
        let approximated = distances.iter().filter(|d| d.is_approximate()).count();
        let degradation = fallback
            .or_else(|| (approximated > 0).then_some(Degradation::Approximated { count: approximated }));

        let mut candidates: Vec<RankedCandidate<Facility>> = eligible
            .iter()
            .zip(&distances)
            .map(|(&(index, _, straight_line_m), d)| RankedCandidate {
                index,
                record: facilities[index].clone(),
                straight_line_m,
                road_m: d.road_m,
                refined_m: d.best_m(),
            })
            .collect();

        // ── 6: radius on refined distance ─────────────────────────────────
        candidates.retain(|c| c.refined_m <= opts.max_radius_m);

        // ── 7–8: order and cut ────────────────────────────────────────────
        candidates.sort_by(|a, b| by_distance_then_index((a.refined_m, a.index), (b.refined_m, b.index)));
        candidates.truncate(opts.result_size);

        debug!(
            refined = distances.len(),
            returned = candidates.len(),
            ?degradation,
            "facility ranking done"
        );

        let empty = (candidates.is_empty() && opts.result_size > 0).then_some(EmptyReason::OutsideRadius);
        Ok(Ranking { candidates, empty, degradation })
    }
}

pub(crate) fn by_distance_then_index(a: (f64, usize), b: (f64, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}
