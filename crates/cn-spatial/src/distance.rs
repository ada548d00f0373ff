//! Two-tier distance resolution.
//!
//! # Strategies
//!
//! | Strategy               | `road_m`                                     |
//! |------------------------|----------------------------------------------|
//! | [`GreatCircleDistance`] | always `None`                               |
//! | [`RoadNetworkDistance`] | shortest path between the snapped nodes, `None` when unreachable |
//!
//! Which one a resolver uses is decided once, from cache availability, by
//! [`strategy_for`].  Nothing downstream branches on "is there a graph".
//!
//! `straight_line_m` is always computed.  A missing road distance is not an
//! error: it tells the caller to rank by the straight-line value and flag the
//! result as approximate.

use std::sync::Arc;

use tracing::debug;

use cn_core::{GeoPoint, NodeId};

use crate::cache::GraphConfig;
use crate::network::RoadNetwork;
use crate::router::{DijkstraRouter, Router, SearchBudget};

/// Distances between two points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Distance {
    pub straight_line_m: f64,
    pub road_m:          Option<f64>,
}

impl Distance {
    pub fn straight_line(a: GeoPoint, b: GeoPoint) -> Self {
        Self { straight_line_m: a.distance_m(b), road_m: None }
    }

    /// Road distance if known, otherwise the straight-line stand-in.
    #[inline]
    pub fn best_m(&self) -> f64 {
        self.road_m.unwrap_or(self.straight_line_m)
    }

    #[inline]
    pub fn is_approximate(&self) -> bool {
        self.road_m.is_none()
    }
}

// ── DistanceStrategy ──────────────────────────────────────────────────────────

/// How distances between a source point and candidates are measured.
pub trait DistanceStrategy: Send + Sync {
    fn resolve(&self, a: GeoPoint, b: GeoPoint) -> Distance;

    /// Distances from `origin` to every target, in order.
    fn resolve_many(&self, origin: GeoPoint, targets: &[GeoPoint]) -> Vec<Distance> {
        targets.iter().map(|&t| self.resolve(origin, t)).collect()
    }

    /// `true` if this strategy can ever produce `road_m`.
    fn is_road_network(&self) -> bool;
}

/// Great-circle distance only.
#[derive(Copy, Clone, Debug, Default)]
pub struct GreatCircleDistance;

impl DistanceStrategy for GreatCircleDistance {
    fn resolve(&self, a: GeoPoint, b: GeoPoint) -> Distance {
        Distance::straight_line(a, b)
    }

    fn is_road_network(&self) -> bool {
        false
    }
}

/// Shortest path over a shared, read-only road graph.
pub struct RoadNetworkDistance<R: Router = DijkstraRouter> {
    network:    Arc<RoadNetwork>,
    router:     R,
    budget:     SearchBudget,
    max_snap_m: f64,
}

impl RoadNetworkDistance<DijkstraRouter> {
    pub fn new(network: Arc<RoadNetwork>) -> Self {
        let defaults = GraphConfig::default();
        Self::with_router(network, DijkstraRouter, defaults.budget, defaults.max_snap_m)
    }
}

impl<R: Router> RoadNetworkDistance<R> {
    pub fn with_router(network: Arc<RoadNetwork>, router: R, budget: SearchBudget, max_snap_m: f64) -> Self {
        Self { network, router, budget, max_snap_m }
    }

    pub fn network(&self) -> &Arc<RoadNetwork> {
        &self.network
    }
}

impl<R: Router> DistanceStrategy for RoadNetworkDistance<R> {
    fn resolve(&self, a: GeoPoint, b: GeoPoint) -> Distance {
        let mut d = Distance::straight_line(a, b);
        let snapped = self
            .network
            .snap_within(a, self.max_snap_m)
            .zip(self.network.snap_within(b, self.max_snap_m));
        if let Some(((from, _), (to, _))) = snapped {
            match self.router.route(&self.network, from, to, self.budget) {
                Ok(path) => d.road_m = Some(path.length_m),
                Err(e) => debug!(%a, %b, error = %e, "no road distance; keeping straight line"),
            }
        } else {
            debug!(%a, %b, "point too far from the road graph to snap");
        }
        d
    }

    fn resolve_many(&self, origin: GeoPoint, targets: &[GeoPoint]) -> Vec<Distance> {
        let mut out: Vec<Distance> =
            targets.iter().map(|&t| Distance::straight_line(origin, t)).collect();

        let Some((from, _)) = self.network.snap_within(origin, self.max_snap_m) else {
            debug!(%origin, "origin too far from the road graph to snap");
            return out;
        };

        // Targets that cannot snap keep road_m = None.
        let snapped: Vec<(usize, NodeId)> = targets
            .iter()
            .enumerate()
            .filter_map(|(i, &t)| self.network.snap_within(t, self.max_snap_m).map(|(n, _)| (i, n)))
            .collect();
        let nodes: Vec<NodeId> = snapped.iter().map(|&(_, n)| n).collect();

        let lengths = self.router.lengths_from(&self.network, from, &nodes, self.budget);
        for (&(i, _), len) in snapped.iter().zip(lengths) {
            out[i].road_m = len;
        }
        out
    }

    fn is_road_network(&self) -> bool {
        true
    }
}

// ── Selection ─────────────────────────────────────────────────────────────────

/// Pick the strategy once, from whether a graph is available.
pub fn strategy_for(graph: Option<Arc<RoadNetwork>>, config: &GraphConfig) -> Box<dyn DistanceStrategy> {
    match graph {
        Some(network) => Box::new(RoadNetworkDistance::with_router(
            network,
            DijkstraRouter,
            config.budget,
            config.max_snap_m,
        )),
        None => Box::new(GreatCircleDistance),
    }
}

/// One-shot resolution between two points with default limits.
///
/// With `graph = None` this is the great-circle distance alone.
pub fn resolve(a: GeoPoint, b: GeoPoint, graph: Option<&RoadNetwork>) -> Distance {
    let mut d = Distance::straight_line(a, b);
    let Some(network) = graph else {
        return d;
    };
    let defaults = GraphConfig::default();
    let from = network.snap_within(a, defaults.max_snap_m);
    let to = network.snap_within(b, defaults.max_snap_m);
    if let (Some((from, _)), Some((to, _))) = (from, to) {
        d.road_m = DijkstraRouter
            .route(network, from, to, defaults.budget)
            .ok()
            .map(|p| p.length_m);
    }
    d
}
