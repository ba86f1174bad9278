//! Great-circle distance on a spherical Earth.

use attest_types::GeoPoint;

/// Mean Earth radius in meters (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters, via the
/// haversine formula.
///
/// Symmetric in its arguments and numerically stable for the short
/// distances a geofence cares about.
pub fn great_circle_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat_deg.to_radians();
    let lat_b = b.lat_deg.to_radians();
    let d_lat = (b.lat_deg - a.lat_deg).to_radians();
    let d_lon = (b.lon_deg - a.lon_deg).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    // Clamp guards against rounding pushing h a hair past 1.0 for antipodes.
    let c = 2.0 * h.sqrt().clamp(0.0, 1.0).asin();

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_distance_for_identical_points() {
        let p = GeoPoint::new(48.8584, 2.2945);
        assert_eq!(great_circle_distance_m(p, p), 0.0);
    }

    #[test]
    fn known_distance_paris_to_london() {
        // Eiffel Tower to Big Ben, roughly 340 km.
        let paris = GeoPoint::new(48.8584, 2.2945);
        let london = GeoPoint::new(51.5007, -0.1246);
        let d = great_circle_distance_m(paris, london);
        assert!((330_000.0..350_000.0).contains(&d), "got {d}");
    }

    #[test]
    fn short_distance_is_metre_accurate() {
        // ~111.32 m per 0.001 degree of latitude.
        let a = GeoPoint::new(40.0, -74.0);
        let b = GeoPoint::new(40.001, -74.0);
        let d = great_circle_distance_m(a, b);
        assert!((110.0..113.0).contains(&d), "got {d}");
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(
            lat_a in -90.0f64..90.0, lon_a in -180.0f64..180.0,
            lat_b in -90.0f64..90.0, lon_b in -180.0f64..180.0,
        ) {
            let a = GeoPoint::new(lat_a, lon_a);
            let b = GeoPoint::new(lat_b, lon_b);
            let ab = great_circle_distance_m(a, b);
            let ba = great_circle_distance_m(b, a);
            prop_assert!((ab - ba).abs() < 1e-6);
        }

        #[test]
        fn distance_is_non_negative_and_bounded(
            lat_a in -90.0f64..90.0, lon_a in -180.0f64..180.0,
            lat_b in -90.0f64..90.0, lon_b in -180.0f64..180.0,
        ) {
            let d = great_circle_distance_m(
                GeoPoint::new(lat_a, lon_a),
                GeoPoint::new(lat_b, lon_b),
            );
            // Half the Earth's circumference is the farthest apart two
            // points can be.
            prop_assert!(d >= 0.0);
            prop_assert!(d <= EARTH_RADIUS_M * std::f64::consts::PI + 1.0);
        }
    }
}
