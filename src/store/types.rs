//! Core data types for the locstash record store
//!
//! This module defines the fundamental types used throughout the crate:
//! - `Loc`: A stored location record (identity, rating, geo, timestamps)
//! - `Geo`: A resolved map position (address + coordinates + zoom)
//! - `Position`: A bare coordinate pair (the query-time reference point)

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Rating bounds for a location record (inclusive).
pub const MIN_RATE: u8 = 1;
pub const MAX_RATE: u8 = 5;

/// A resolved geographic position, as reported by a map/geocoding widget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Geo {
    /// Human-readable address
    pub address: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// Map zoom level the position was picked at
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

fn default_zoom() -> u8 {
    11
}

impl Geo {
    pub fn new(address: impl Into<String>, lat: f64, lng: f64, zoom: u8) -> Self {
        Self {
            address: address.into(),
            lat,
            lng,
            zoom,
        }
    }

    /// Whether both coordinates are usable for distance math
    pub fn has_coords(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Coordinate pair of this geo
    pub fn position(&self) -> Position {
        Position {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// A bare coordinate pair
///
/// Used as the reference point for per-record distance annotation. The
/// origin `(0, 0)` is what the map widget reports before the user position
/// is known, so it is treated as "no position".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// A valid reference position has finite, non-zero coordinates
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite() && self.lat != 0.0 && self.lng != 0.0
    }
}

/// A stored location record
///
/// `id` is empty until the record is first saved; the service assigns a
/// short opaque id and `created_at` at creation. `updated_at` is only set
/// when an existing record is modified. `distance` is derived at query time
/// relative to a reference position and is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Loc {
    /// Opaque unique id, assigned at creation, immutable thereafter
    #[serde(default)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Rating, 1-5 inclusive
    pub rate: u8,
    /// Where the record is pinned
    pub geo: Geo,
    /// Epoch milliseconds, set once at creation
    #[serde(default)]
    pub created_at: i64,
    /// Epoch milliseconds, set only on update of an existing record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    /// Distance from the reference position, recomputed every query
    #[serde(skip)]
    pub distance: Option<f64>,
}

impl Loc {
    /// Create an unsaved record (empty id; save assigns id and created_at)
    pub fn new(name: impl Into<String>, rate: u8, geo: Geo) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            rate,
            geo,
            created_at: 0,
            updated_at: None,
            distance: None,
        }
    }

    /// Whether this record has been persisted yet
    pub fn is_saved(&self) -> bool {
        !self.id.is_empty()
    }

    /// Whether the rating is within the allowed 1-5 range
    pub fn rate_in_range(&self) -> bool {
        (MIN_RATE..=MAX_RATE).contains(&self.rate)
    }

    /// Whether this record was ever modified after creation
    pub fn was_updated(&self) -> bool {
        match self.updated_at {
            Some(updated) => updated != self.created_at,
            None => false,
        }
    }
}

/// Current time in epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_validity() {
        assert!(Position::new(32.0, 34.8).is_valid());
        assert!(!Position::new(0.0, 0.0).is_valid());
        assert!(!Position::new(0.0, 34.8).is_valid());
        assert!(!Position::new(32.0, 0.0).is_valid());
        assert!(!Position::new(f64::NAN, 34.8).is_valid());
    }

    #[test]
    fn test_loc_creation() {
        let loc = Loc::new("Dahab, Egypt", 5, Geo::new("Dahab, South Sinai, Egypt", 28.5, 34.5, 11));

        assert!(!loc.is_saved());
        assert!(loc.rate_in_range());
        assert!(!loc.was_updated());
        assert_eq!(loc.distance, None);
    }

    #[test]
    fn test_distance_never_serialized() {
        let mut loc = Loc::new("Dekel Beach", 4, Geo::new("Eilat, Israel", 29.5, 34.9, 15));
        loc.distance = Some(12.34);

        let json = serde_json::to_string(&loc).unwrap();
        assert!(!json.contains("distance"));

        let restored: Loc = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.distance, None);
    }

    #[test]
    fn test_updated_at_absent_round_trip() {
        let loc = Loc::new("Ben Gurion Airport", 2, Geo::new("Israel", 32.0, 34.8, 12));
        let json = serde_json::to_string(&loc).unwrap();
        assert!(!json.contains("updated_at"));

        let restored: Loc = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.updated_at, None);
    }

    #[test]
    fn test_rate_bounds() {
        let mut loc = Loc::new("x", 0, Geo::new("", 1.0, 1.0, 10));
        assert!(!loc.rate_in_range());
        loc.rate = 5;
        assert!(loc.rate_in_range());
        loc.rate = 6;
        assert!(!loc.rate_in_range());
    }
}
