//! Unit tests for ruta-core primitives.

#[cfg(test)]
mod ids {
    use crate::NodeId;

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(NodeId(0) < NodeId(1));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{CellId, Coordinate};

    #[test]
    fn zero_distance() {
        let p = Coordinate::new(10.491, -66.879);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_of_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = Coordinate::new(10.0, -66.0);
        let b = Coordinate::new(11.0, -66.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn non_finite_detected() {
        assert!(Coordinate::new(10.0, -66.0).is_finite());
        assert!(!Coordinate::new(f64::NAN, -66.0).is_finite());
        assert!(!Coordinate::new(10.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn cell_roundtrip_is_submeter() {
        let coords = [
            Coordinate::new(10.4912345, -66.8791234),
            Coordinate::new(-33.447487, -70.673676),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(89.9, 179.9),
            Coordinate::new(-89.9, -179.9),
        ];
        for c in coords {
            let back = CellId::from_coordinate(c).to_coordinate();
            assert!(c.distance_m(back) < 1.0, "{c} drifted to {back}");
        }
    }

    #[test]
    fn cell_id_is_stable() {
        let c = Coordinate::new(10.4912345, -66.8791234);
        assert_eq!(CellId::from_coordinate(c), CellId::from_coordinate(c));
    }
}
