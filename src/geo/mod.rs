//! Geo utilities
//!
//! Pure helpers shared by the query engine and the presentation layer:
//! haversine distance with unit selection, short id generation, and
//! relative-time formatting.

use crate::store::types::Position;
use chrono::Utc;

/// Mean Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;
/// Kilometers-to-miles scaling
const MILES_PER_KM: f64 = 0.621_371;
/// Length of generated record ids
const ID_LEN: usize = 6;

/// Unit for distance results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Miles,
}

/// Great-circle distance between two positions via the haversine formula,
/// rounded to two decimals.
///
/// Never fails; validity of the inputs is the caller's responsibility
/// (null-guard with [`Position::is_valid`] before calling).
pub fn distance(a: Position, b: Position, unit: DistanceUnit) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let km = 2.0 * EARTH_RADIUS_KM * h.sqrt().asin();

    let d = match unit {
        DistanceUnit::Kilometers => km,
        DistanceUnit::Miles => km * MILES_PER_KM,
    };
    (d * 100.0).round() / 100.0
}

/// Generate a short opaque record id
///
/// Uniqueness is sufficient within one store, not cryptographic: the id is
/// the leading hex of a v4 UUID.
pub fn make_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..ID_LEN].to_string()
}

/// Human-readable relative time for an epoch-milliseconds timestamp
/// ("3 minutes ago" style). Presentation helper only.
pub fn elapsed_time(epoch_millis: i64) -> String {
    let now = Utc::now().timestamp_millis();
    let secs = (now - epoch_millis) / 1000;

    if secs < 0 {
        return "in the future".to_string();
    }
    if secs < 60 {
        return "just now".to_string();
    }

    let (count, unit) = if secs < 3600 {
        (secs / 60, "minute")
    } else if secs < 86_400 {
        (secs / 3600, "hour")
    } else if secs < 2_592_000 {
        (secs / 86_400, "day")
    } else if secs < 31_536_000 {
        (secs / 2_592_000, "month")
    } else {
        (secs / 31_536_000, "year")
    };

    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_same_point_is_zero() {
        let p = Position::new(28.5096676, 34.5165187);
        assert_eq!(distance(p, p, DistanceUnit::Kilometers), 0.0);
    }

    #[test]
    fn test_distance_known_pair() {
        // Ben Gurion Airport to Dahab, roughly 390 km
        let tlv = Position::new(32.0004465, 34.8706095);
        let dahab = Position::new(28.5096676, 34.5165187);

        let km = distance(tlv, dahab, DistanceUnit::Kilometers);
        assert!((385.0..395.0).contains(&km), "got {km}");

        let mi = distance(tlv, dahab, DistanceUnit::Miles);
        assert!((mi - km * MILES_PER_KM).abs() < 0.01);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Position::new(29.5393848, 34.9457792);
        let b = Position::new(28.5096676, 34.5165187);
        assert_eq!(
            distance(a, b, DistanceUnit::Kilometers),
            distance(b, a, DistanceUnit::Kilometers)
        );
    }

    #[test]
    fn test_make_id_shape() {
        let id = make_id();
        assert_eq!(id.len(), ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

        // Not a collision proof, just a sanity check
        assert_ne!(make_id(), make_id());
    }

    #[test]
    fn test_elapsed_time_buckets() {
        let now = Utc::now().timestamp_millis();
        assert_eq!(elapsed_time(now), "just now");
        assert_eq!(elapsed_time(now - 3 * 60 * 1000), "3 minutes ago");
        assert_eq!(elapsed_time(now - 60 * 60 * 1000), "1 hour ago");
        assert_eq!(elapsed_time(now - 3 * 86_400 * 1000), "3 days ago");
        assert_eq!(elapsed_time(now + 60_000), "in the future");
    }
}
