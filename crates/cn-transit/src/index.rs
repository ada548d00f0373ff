//! Stop ↔ route index built from static route rows.
//!
//! # Ordering rule
//!
//! Per route, after all rows are ingested:
//!
//! - if **any** row of the route carries a `sequence`, the ordered stop list
//!   holds the sequenced rows sorted ascending by sequence (stable, so equal
//!   sequences keep input order).  Rows without a sequence are left out of
//!   the ordering and reported by [`StopRouteIndex::unsequenced_stops`];
//! - otherwise the stops keep their input order.
//!
//! Every row contributes to the stop → routes map regardless of ordering, so
//! each stop key is reachable from at least one route through either
//! [`route_stops`](StopRouteIndex::route_stops) or
//! [`unsequenced_stops`](StopRouteIndex::unsequenced_stops).

use std::collections::{BTreeSet, HashMap};

use cn_core::{RouteId, StopId};

static NO_ROUTES: BTreeSet<RouteId> = BTreeSet::new();

/// One `(stop, route, sequence?)` triple of the static transit dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteRow {
    pub stop_id:  StopId,
    pub route_id: RouteId,
    pub sequence: Option<u32>,
}

impl RouteRow {
    pub fn new(stop_id: impl Into<StopId>, route_id: impl Into<RouteId>, sequence: Option<u32>) -> Self {
        Self { stop_id: stop_id.into(), route_id: route_id.into(), sequence }
    }
}

/// Read-only index over one version of the static route dataset.
#[derive(Clone, Debug, Default)]
pub struct StopRouteIndex {
    stop_to_routes: HashMap<StopId, BTreeSet<RouteId>>,
    route_to_stops: HashMap<RouteId, Vec<StopId>>,
    unsequenced:    HashMap<RouteId, Vec<StopId>>,
}

impl StopRouteIndex {
    pub fn build(rows: impl IntoIterator<Item = RouteRow>) -> Self {
        let mut stop_to_routes: HashMap<StopId, BTreeSet<RouteId>> = HashMap::new();
        // Working list per route, in input order.
        let mut working: HashMap<RouteId, Vec<(Option<u32>, StopId)>> = HashMap::new();

        for row in rows {
            stop_to_routes
                .entry(row.stop_id.clone())
                .or_default()
                .insert(row.route_id.clone());
            working.entry(row.route_id).or_default().push((row.sequence, row.stop_id));
        }

        let mut route_to_stops = HashMap::with_capacity(working.len());
        let mut unsequenced = HashMap::new();

        for (route, entries) in working {
            if entries.iter().any(|(seq, _)| seq.is_some()) {
                let (mut ordered, loose): (Vec<_>, Vec<_>) =
                    entries.into_iter().partition(|(seq, _)| seq.is_some());
                ordered.sort_by_key(|(seq, _)| *seq);
                if !loose.is_empty() {
                    unsequenced.insert(route.clone(), loose.into_iter().map(|(_, s)| s).collect());
                }
                route_to_stops.insert(route, ordered.into_iter().map(|(_, s)| s).collect());
            } else {
                route_to_stops.insert(route, entries.into_iter().map(|(_, s)| s).collect());
            }
        }

        Self { stop_to_routes, route_to_stops, unsequenced }
    }

    /// Routes serving `stop`.  Unknown stops yield an empty set.
    pub fn lookup_routes(&self, stop: &StopId) -> &BTreeSet<RouteId> {
        self.stop_to_routes.get(stop).unwrap_or(&NO_ROUTES)
    }

    /// Ordered stops of `route`; empty for unknown routes.
    pub fn route_stops(&self, route: &RouteId) -> &[StopId] {
        self.route_to_stops.get(route).map(Vec::as_slice).unwrap_or_default()
    }

    /// Stops listed for `route` without a sequence number while other stops
    /// of the same route had one.
    pub fn unsequenced_stops(&self, route: &RouteId) -> &[StopId] {
        self.unsequenced.get(route).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn stop_count(&self) -> usize {
        self.stop_to_routes.len()
    }

    pub fn route_count(&self) -> usize {
        self.route_to_stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stop_to_routes.is_empty()
    }
}
