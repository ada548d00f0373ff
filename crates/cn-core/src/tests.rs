//! Unit tests for cn-core primitives.

#[cfg(test)]
mod geo {
    use approx::assert_relative_eq;

    use crate::{CoreError, GeoPoint, haversine_m};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(37.4563, 126.7052);
        assert_eq!(p.distance_m(p), 0.0);
    }

    #[test]
    fn symmetric() {
        let a = GeoPoint::new(37.4563, 126.7052);
        let b = GeoPoint::new(37.5665, 126.9780);
        assert_relative_eq!(haversine_m(a, b), haversine_m(b, a), epsilon = 1e-6);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111.2 km
        let a = GeoPoint::new(37.0, 126.0);
        let b = GeoPoint::new(38.0, 126.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn incheon_to_seoul() {
        // Incheon city hall → Seoul city hall, roughly 27 km.
        let incheon = GeoPoint::new(37.4563, 126.7052);
        let seoul = GeoPoint::new(37.5665, 126.9780);
        let d = incheon.distance_m(seoul);
        assert!((26_000.0..28_500.0).contains(&d), "got {d}");
    }

    #[test]
    fn antipodal_is_finite() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let d = a.distance_m(b);
        assert!(d.is_finite());
        assert_relative_eq!(d, std::f64::consts::PI * crate::EARTH_RADIUS_M, epsilon = 1.0);
    }

    #[test]
    fn validation_rejects_non_finite() {
        assert!(matches!(
            GeoPoint::validated(f64::NAN, 126.0),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(GeoPoint::validated(37.0, f64::INFINITY).is_err());
    }

    #[test]
    fn validation_rejects_out_of_range() {
        assert!(GeoPoint::validated(90.5, 0.0).is_err());
        assert!(GeoPoint::validated(0.0, -180.1).is_err());
        assert!(GeoPoint::validated(-90.0, 180.0).is_ok());
    }

    #[test]
    fn unit_vector_order_matches_haversine() {
        let anchor = GeoPoint::new(37.45, 126.70);
        let near = GeoPoint::new(37.46, 126.70);
        let far = GeoPoint::new(37.60, 126.90);

        let chord2 = |a: [f64; 3], b: [f64; 3]| {
            (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
        };
        let u = anchor.to_unit_vector();
        assert!(chord2(u, near.to_unit_vector()) < chord2(u, far.to_unit_vector()));
        assert!(anchor.distance_m(near) < anchor.distance_m(far));
    }
}

#[cfg(test)]
mod ids {
    use crate::{NodeId, RouteId, StopId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn keys_are_trimmed() {
        let stop = StopId::new("  89000123 ");
        assert_eq!(stop.as_str(), "89000123");
        assert!(StopId::new("   ").is_empty());
    }

    #[test]
    fn route_keys_sort_lexicographically() {
        let mut routes = vec![RouteId::from("8"), RouteId::from("13"), RouteId::from("102")];
        routes.sort();
        assert_eq!(routes, vec![RouteId::from("102"), RouteId::from("13"), RouteId::from("8")]);
    }
}

#[cfg(test)]
mod place {
    use crate::{GeoPoint, Located, Place};

    #[test]
    fn invalid_location_is_not_located() {
        let p = Place::new("x", "Broken", "welfare", Some(GeoPoint::new(f64::NAN, 0.0)));
        assert!(p.location().is_none());

        let missing = Place::new("y", "Missing", "welfare", None);
        assert!(missing.location().is_none());
    }

    #[test]
    fn attributes() {
        let p = Place::new("s1", "Bupyeong Station", "bus_stop", None)
            .with_attribute("district", "Bupyeong 1-dong");
        assert_eq!(p.attribute("district"), Some("Bupyeong 1-dong"));
        assert_eq!(p.attribute("address"), None);
    }
}

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{CoreError, load_places_reader};

    const CSV: &str = "\
id,name,category,lat,lon,address
f1,Bupyeong Senior Welfare Center,welfare,37.4895,126.7245,Bupyeong-daero 1
f2,Namdong Day Care,daycare,37.4470,126.7310,
f3,No Coordinates,welfare,,126.7,
f4,Bad Latitude,welfare,137.0,126.7,
";

    #[test]
    fn loads_canonical_and_extra_columns() {
        let places = load_places_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(places.len(), 4);

        let first = &places[0];
        assert_eq!(first.id, "f1");
        assert_eq!(first.category, "welfare");
        let loc = first.location.unwrap();
        assert_eq!(loc.lat, 37.4895);
        assert_eq!(first.attribute("address"), Some("Bupyeong-daero 1"));
        assert!(!first.attributes.contains_key("lat"));
    }

    #[test]
    fn unusable_coordinates_become_none() {
        let places = load_places_reader(Cursor::new(CSV)).unwrap();
        assert!(places[2].location.is_none());
        assert!(places[3].location.is_none());
    }

    #[test]
    fn missing_id_defaults_to_row_number() {
        let csv = "name,category,lat,lon\nA,welfare,37.0,126.0\nB,welfare,37.1,126.1\n";
        let places = load_places_reader(Cursor::new(csv)).unwrap();
        assert_eq!(places[0].id, "0");
        assert_eq!(places[1].id, "1");
    }

    #[test]
    fn missing_required_column_is_a_parse_error() {
        let csv = "name,lat,lon\nA,37.0,126.0\n";
        let err = load_places_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, CoreError::Parse(msg) if msg.contains("category")));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facilities.csv");
        std::fs::write(&path, CSV).unwrap();
        let places = crate::load_places_csv(&path).unwrap();
        assert_eq!(places.len(), 4);
    }
}

#[cfg(test)]
mod ranking {
    use crate::{Degradation, EmptyReason, RankedCandidate, Ranking};

    #[test]
    fn straight_line_candidate_is_approximate() {
        let c = RankedCandidate::straight_line(3, "x", 120.0);
        assert!(c.is_approximate());
        assert_eq!(c.refined_m, 120.0);
    }

    #[test]
    fn empty_ranking_carries_reason() {
        let r: Ranking<()> = Ranking::empty(EmptyReason::OutsideRadius);
        assert!(r.is_empty());
        assert_eq!(r.empty, Some(EmptyReason::OutsideRadius));
        assert!(!r.is_degraded());
    }

    #[test]
    fn degradation_flag() {
        let mut r: Ranking<()> = Ranking::empty(EmptyReason::NoCandidates);
        r.degradation = Some(Degradation::StraightLineOnly);
        assert!(r.is_degraded());
    }
}

#[cfg(test)]
mod snapshot {
    use crate::Snapshot;

    #[test]
    fn replace_keeps_old_readers_alive() {
        let snap = Snapshot::new(vec![1, 2, 3]);
        let before = snap.current();
        let old = snap.replace(vec![4]);
        assert_eq!(*before, vec![1, 2, 3]);
        assert_eq!(*old, vec![1, 2, 3]);
        assert_eq!(*snap.current(), vec![4]);
    }
}
