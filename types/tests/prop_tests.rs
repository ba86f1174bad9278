use proptest::prelude::*;

use attest_types::{GeoPoint, RegistrationId, Timestamp};

proptest! {
    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Timestamp elapsed_since: elapsed_since(now) = now - self (saturating).
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.elapsed_since(now), offset);
    }

    /// Timestamp elapsed_since saturates to 0 when now < self.
    #[test]
    fn timestamp_elapsed_since_saturates(
        base in 1u64..1_000_000,
        deficit in 1u64..1_000_000,
    ) {
        let later = Timestamp::new(base + deficit);
        let earlier = Timestamp::new(base);
        prop_assert_eq!(later.elapsed_since(earlier), 0);
    }

    /// Coordinates inside the WGS-84 range are always valid.
    #[test]
    fn in_range_coordinates_are_valid(
        lat in -90.0f64..=90.0,
        lon in -180.0f64..=180.0,
    ) {
        prop_assert!(GeoPoint::new(lat, lon).is_valid());
    }

    /// Coordinates above the latitude range are never valid.
    #[test]
    fn out_of_range_latitude_is_invalid(
        lat in 91.0f64..1_000.0,
        lon in -180.0f64..=180.0,
    ) {
        prop_assert!(!GeoPoint::new(lat, lon).is_valid());
    }

    /// Identifiers serialize transparently: JSON of the id is JSON of the
    /// raw string, and the roundtrip is lossless.
    #[test]
    fn id_json_is_the_raw_string(raw in "[a-z0-9_-]{1,32}") {
        let id = RegistrationId::new(raw.clone());
        let json = serde_json::to_string(&id).unwrap();
        prop_assert_eq!(&json, &serde_json::to_string(&raw).unwrap());
        let back: RegistrationId = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, id);
    }
}
