//! Route intersection between the stops near the user and the stops near a
//! facility.
//!
//! ```text
//! user side      stop → routes        ┐
//!                                     ├─ direct_routes      = ∪user ∩ ∪facility
//! facility side  stop → routes        ┘  direct_connections = per (user stop, facility stop)
//!                                                             pair, every shared route
//! ```
//!
//! Both sides are keyed by stop name (the stop id stands in for a blank
//! name).  Two candidates with the same name, e.g. the stops on opposite
//! sides of a road, merge into one entry carrying the union of their routes.
//!
//! `direct_connections` holds one record per route per stop pair.  A route
//! that links two different pairs is reported once for each pair.

use std::collections::BTreeSet;

use cn_core::{Place, RankedCandidate, RouteId, StopId};

use crate::index::StopRouteIndex;

/// Routes serving one named stop.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StopRoutes {
    pub stop_name: String,
    /// Sorted, no duplicates.
    pub routes:    Vec<RouteId>,
}

/// One route that serves both a user-side and a facility-side stop.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DirectConnection {
    pub route:         RouteId,
    pub user_stop:     String,
    pub facility_stop: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MatchResult {
    /// In the order the stops were first seen.
    pub user_side:          Vec<StopRoutes>,
    pub facility_side:      Vec<StopRoutes>,
    /// Sorted.
    pub direct_routes:      Vec<RouteId>,
    pub direct_connections: Vec<DirectConnection>,
}

impl MatchResult {
    /// `true` if at least one route serves both sides.
    pub fn has_direct_route(&self) -> bool {
        !self.direct_routes.is_empty()
    }
}

/// Compute per-stop routes for both sides and the routes they share.
///
/// Stops with a blank or unknown id get an empty route list.
pub fn match_routes(
    user_stops: &[(String, StopId)],
    facility_stops: &[(String, StopId)],
    index: &StopRouteIndex,
) -> MatchResult {
    let user_side = side_routes(user_stops, index);
    let facility_side = side_routes(facility_stops, index);

    let user_union: BTreeSet<&RouteId> = user_side.iter().flat_map(|s| &s.0).collect();
    let facility_union: BTreeSet<&RouteId> = facility_side.iter().flat_map(|s| &s.0).collect();
    let direct_routes: Vec<RouteId> =
        user_union.intersection(&facility_union).map(|&r| r.clone()).collect();

    let mut direct_connections = Vec::new();
    for (user_routes, user_name) in &user_side {
        for (facility_routes, facility_name) in &facility_side {
            for route in user_routes.intersection(facility_routes) {
                direct_connections.push(DirectConnection {
                    route:         route.clone(),
                    user_stop:     user_name.clone(),
                    facility_stop: facility_name.clone(),
                });
            }
        }
    }

    MatchResult {
        user_side: into_stop_routes(user_side),
        facility_side: into_stop_routes(facility_side),
        direct_routes,
        direct_connections,
    }
}

/// `(name, stop id)` pairs for ranked bus-stop records, whose `id` is the
/// stop id.
pub fn stop_pairs(candidates: &[RankedCandidate<Place>]) -> Vec<(String, StopId)> {
    candidates
        .iter()
        .map(|c| (c.record.name.clone(), StopId::new(&c.record.id)))
        .collect()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Merged route sets keyed by display name, in first-seen order.
fn side_routes(stops: &[(String, StopId)], index: &StopRouteIndex) -> Vec<(BTreeSet<RouteId>, String)> {
    let mut side: Vec<(BTreeSet<RouteId>, String)> = Vec::with_capacity(stops.len());
    for (name, stop_id) in stops {
        let key = match name.trim() {
            "" => stop_id.as_str(),
            trimmed => trimmed,
        };
        let routes = index.lookup_routes(stop_id);
        match side.iter_mut().find(|(_, existing)| existing.as_str() == key) {
            Some((merged, _)) => merged.extend(routes.iter().cloned()),
            None => side.push((routes.clone(), key.to_owned())),
        }
    }
    side
}

fn into_stop_routes(side: Vec<(BTreeSet<RouteId>, String)>) -> Vec<StopRoutes> {
    side.into_iter()
        .map(|(routes, stop_name)| StopRoutes { stop_name, routes: routes.into_iter().collect() })
        .collect()
}
