//! Unit tests for cn-transit.

use cn_core::{RouteId, StopId};

use crate::RouteRow;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn row(stop: &str, route: &str, seq: Option<u32>) -> RouteRow {
    RouteRow::new(stop, route, seq)
}

fn routes(ids: &[&str]) -> Vec<RouteId> {
    ids.iter().map(|&r| RouteId::from(r)).collect()
}

fn stops(ids: &[&str]) -> Vec<StopId> {
    ids.iter().map(|&s| StopId::from(s)).collect()
}

fn named(name: &str, id: &str) -> (String, StopId) {
    (name.to_owned(), StopId::from(id))
}

// ── StopRouteIndex ────────────────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use super::*;
    use crate::StopRouteIndex;

    #[test]
    fn basic_stop_and_route_maps() {
        let index = StopRouteIndex::build([
            row("S1", "A", Some(1)),
            row("S1", "B", Some(1)),
            row("S2", "A", Some(2)),
        ]);

        let s1: Vec<RouteId> = index.lookup_routes(&"S1".into()).iter().cloned().collect();
        assert_eq!(s1, routes(&["A", "B"]));
        assert_eq!(index.route_stops(&"A".into()), stops(&["S1", "S2"]).as_slice());
        assert_eq!(index.stop_count(), 2);
        assert_eq!(index.route_count(), 2);
    }

    #[test]
    fn sequence_orders_stops() {
        let index = StopRouteIndex::build([
            row("S3", "A", Some(3)),
            row("S1", "A", Some(1)),
            row("S2", "A", Some(2)),
        ]);
        assert_eq!(index.route_stops(&"A".into()), stops(&["S1", "S2", "S3"]).as_slice());
    }

    #[test]
    fn no_sequence_keeps_input_order() {
        let index = StopRouteIndex::build([
            row("S3", "A", None),
            row("S1", "A", None),
            row("S2", "A", None),
        ]);
        assert_eq!(index.route_stops(&"A".into()), stops(&["S3", "S1", "S2"]).as_slice());
        assert!(index.unsequenced_stops(&"A".into()).is_empty());
    }

    #[test]
    fn equal_sequences_keep_input_order() {
        let index = StopRouteIndex::build([
            row("S2", "A", Some(1)),
            row("S1", "A", Some(1)),
        ]);
        assert_eq!(index.route_stops(&"A".into()), stops(&["S2", "S1"]).as_slice());
    }

    #[test]
    fn unsequenced_rows_leave_ordering_but_stay_indexed() {
        let index = StopRouteIndex::build([
            row("S2", "A", Some(2)),
            row("SX", "A", None),
            row("S1", "A", Some(1)),
        ]);
        let a = RouteId::from("A");
        assert_eq!(index.route_stops(&a), stops(&["S1", "S2"]).as_slice());
        assert_eq!(index.unsequenced_stops(&a), stops(&["SX"]).as_slice());
        assert!(index.lookup_routes(&"SX".into()).contains(&a));
    }

    #[test]
    fn every_stop_reachable_from_some_route() {
        let index = StopRouteIndex::build([
            row("S1", "A", Some(1)),
            row("S2", "A", None),
            row("S3", "B", None),
            row("S2", "B", None),
        ]);
        for stop in stops(&["S1", "S2", "S3"]) {
            let on_some_route = index.lookup_routes(&stop).iter().any(|r| {
                index.route_stops(r).contains(&stop) || index.unsequenced_stops(r).contains(&stop)
            });
            assert!(on_some_route, "{stop} unreachable");
        }
    }

    #[test]
    fn unknown_stop_is_empty_not_error() {
        let index = StopRouteIndex::build([row("S1", "A", None)]);
        assert!(index.lookup_routes(&"nope".into()).is_empty());
        assert!(index.route_stops(&"Z".into()).is_empty());
    }

    #[test]
    fn empty_build() {
        let index = StopRouteIndex::build(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.route_count(), 0);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use super::*;
    use crate::{TransitError, load_route_rows_csv, load_route_rows_reader};

    #[test]
    fn reads_triples_and_ignores_extra_columns() {
        let csv = "stop_id,route_id,sequence,stop_name\n\
                   89001,5,1,City Hall\n\
                   89002, 5 ,2,Market\n\
                   89002,21,,Market\n";
        let rows = load_route_rows_reader(Cursor::new(csv)).unwrap();
        assert_eq!(
            rows,
            vec![
                row("89001", "5", Some(1)),
                row("89002", "5", Some(2)),
                row("89002", "21", None),
            ]
        );
    }

    #[test]
    fn sequence_column_is_optional() {
        let csv = "stop_id,route_id\nS1,A\nS2,A\n";
        let rows = load_route_rows_reader(Cursor::new(csv)).unwrap();
        assert!(rows.iter().all(|r| r.sequence.is_none()));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn blank_ids_are_skipped() {
        let csv = "stop_id,route_id,sequence\n,A,1\nS1,,2\nS2,A,3\n";
        let rows = load_route_rows_reader(Cursor::new(csv)).unwrap();
        assert_eq!(rows, vec![row("S2", "A", Some(3))]);
    }

    #[test]
    fn bad_sequence_is_parse_error() {
        let csv = "stop_id,route_id,sequence\nS1,A,first\n";
        let err = load_route_rows_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, TransitError::Parse(_)));
    }

    #[test]
    fn from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.csv");
        std::fs::write(&path, "stop_id,route_id,sequence\nS1,A,1\nS2,A,2\n").unwrap();
        let rows = load_route_rows_csv(&path).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_route_rows_csv(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, TransitError::Io(_)));
        // Converts into the engine error type.
        let core: cn_core::CoreError = err.into();
        assert!(matches!(core, cn_core::CoreError::Io(_)));
    }
}

// ── RouteIntersectionMatcher ──────────────────────────────────────────────────

#[cfg(test)]
mod matcher {
    use cn_core::{GeoPoint, Place, RankedCandidate};

    use super::*;
    use crate::{DirectConnection, StopRouteIndex, match_routes, stop_pairs};

    /// S1→{A}, S2→{A,C}, S3→{A,B}, S4→{B}.
    fn index() -> StopRouteIndex {
        StopRouteIndex::build([
            row("S1", "A", None),
            row("S2", "A", None),
            row("S2", "C", None),
            row("S3", "A", None),
            row("S3", "B", None),
            row("S4", "B", None),
        ])
    }

    #[test]
    fn single_shared_route() {
        let result = match_routes(&[named("Stop1", "S1")], &[named("Stop2", "S2")], &index());

        assert_eq!(result.direct_routes, routes(&["A"]));
        assert_eq!(
            result.direct_connections,
            vec![DirectConnection {
                route:         "A".into(),
                user_stop:     "Stop1".into(),
                facility_stop: "Stop2".into(),
            }]
        );
        assert_eq!(result.user_side[0].routes, routes(&["A"]));
        assert_eq!(result.facility_side[0].routes, routes(&["A", "C"]));
        assert!(result.has_direct_route());
    }

    #[test]
    fn route_reported_once_per_pair() {
        let result = match_routes(
            &[named("Stop1", "S1"), named("Stop3", "S3")],
            &[named("Stop2", "S2")],
            &index(),
        );
        assert_eq!(result.direct_routes, routes(&["A"]));
        let pairs: Vec<(&str, &str)> = result
            .direct_connections
            .iter()
            .map(|c| (c.user_stop.as_str(), c.facility_stop.as_str()))
            .collect();
        assert_eq!(pairs, vec![("Stop1", "Stop2"), ("Stop3", "Stop2")]);
    }

    #[test]
    fn no_shared_route() {
        let result = match_routes(&[named("Stop1", "S1")], &[named("Stop4", "S4")], &index());
        assert!(result.direct_routes.is_empty());
        assert!(result.direct_connections.is_empty());
        assert!(!result.has_direct_route());
    }

    #[test]
    fn blank_and_unknown_ids_have_no_routes() {
        let result = match_routes(
            &[named("Nowhere", ""), named("Ghost", "S99")],
            &[named("Stop2", "S2")],
            &index(),
        );
        assert_eq!(result.user_side.len(), 2);
        assert!(result.user_side.iter().all(|s| s.routes.is_empty()));
        assert!(result.direct_routes.is_empty());
    }

    #[test]
    fn duplicate_names_merge_routes() {
        // Same stop name on both sides of the road, different ids.
        let result = match_routes(
            &[named("Market", "S1"), named("Market", "S4")],
            &[named("Stop3", "S3")],
            &index(),
        );
        assert_eq!(result.user_side.len(), 1);
        assert_eq!(result.user_side[0].routes, routes(&["A", "B"]));
        assert_eq!(result.direct_routes, routes(&["A", "B"]));
        assert_eq!(result.direct_connections.len(), 2);
    }

    #[test]
    fn blank_name_falls_back_to_id() {
        let result = match_routes(&[named("  ", "S1")], &[], &index());
        assert_eq!(result.user_side[0].stop_name, "S1");
    }

    #[test]
    fn direct_routes_subset_of_both_sides() {
        let idx = index();
        let result = match_routes(
            &[named("a", "S1"), named("b", "S4")],
            &[named("c", "S2"), named("d", "S3")],
            &idx,
        );
        let user: Vec<&RouteId> = result.user_side.iter().flat_map(|s| &s.routes).collect();
        let facility: Vec<&RouteId> = result.facility_side.iter().flat_map(|s| &s.routes).collect();
        for r in &result.direct_routes {
            assert!(user.contains(&r) && facility.contains(&r));
        }
        for c in &result.direct_connections {
            let u = result.user_side.iter().find(|s| s.stop_name == c.user_stop).unwrap();
            let f = result.facility_side.iter().find(|s| s.stop_name == c.facility_stop).unwrap();
            assert!(u.routes.contains(&c.route) && f.routes.contains(&c.route));
        }
        assert!(result.direct_routes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn stop_pairs_from_candidates() {
        let stop = Place::new(" 89001 ", "City Hall", "bus_stop", Some(GeoPoint::new(37.45, 126.70)));
        let pairs = stop_pairs(&[RankedCandidate::straight_line(0, stop, 12.0)]);
        assert_eq!(pairs, vec![named("City Hall", "89001")]);
    }
}
