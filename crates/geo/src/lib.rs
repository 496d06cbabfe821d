//! Geospatial primitives for hazardline.
//!
//! This crate provides:
//! - Haversine distance in kilometres and miles
//! - Coordinate validation, including the `(0, 0)` "no location" sentinel
//! - Point parsing for stored locations (GeoJSON, WKT, `{lat, lng}` objects)
//! - Representative points for GeoJSON geometries (vertex mean)
//! - Radius filtering over anything that has a location, with optional parallelism
//!
//! # Example
//!
//! ```
//! use hazardline_geo::{distance_miles, Coordinate};
//!
//! let origin = Coordinate::new(40.0, -75.0);
//! let nearby = Coordinate::new(40.05, -75.0);
//!
//! let miles = distance_miles(&origin, &nearby).unwrap();
//! assert!((miles - 3.45).abs() < 0.01);
//! ```

mod centroid;
mod error;
mod haversine;
mod point;
pub mod radius;

pub use centroid::{Geometry, Position};
pub use error::{GeoError, GeoErrorCode, Result};
pub use haversine::{
    distance_miles, haversine_distance, haversine_distance_miles, EARTH_RADIUS_KM, MILES_PER_KM,
};
pub use point::{parse_point, parse_point_strict};
pub use radius::{filter_within_radius, Located, RadiusOutcome, WithinRadius};

use serde::{Deserialize, Serialize};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// The reserved "no location set" value. Never a real origin.
    pub const SENTINEL: Coordinate = Coordinate {
        latitude: 0.0,
        longitude: 0.0,
    };

    /// Creates a new coordinate without validating it.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate at an ingestion boundary.
    ///
    /// Returns `None` for non-finite or out-of-range values and for the
    /// `(0, 0)` sentinel, so callers never see a magic-number location.
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        let coord = Self::new(latitude, longitude);
        (coord.is_valid() && !coord.is_sentinel()).then_some(coord)
    }

    /// Returns true if both components are finite and within range.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Returns true for the reserved `(0, 0)` "no location" value.
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }

    /// Fails with [`GeoError::InvalidCoordinate`] when the coordinate is unusable
    /// for distance computation.
    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "({}, {})",
                self.latitude, self.longitude
            )))
        }
    }

    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 10.0).is_valid());
        assert!(!Coordinate::new(10.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_checked_rejects_sentinel() {
        assert!(Coordinate::checked(0.0, 0.0).is_none());
        assert!(Coordinate::checked(-0.0, 0.0).is_none());
        assert!(Coordinate::checked(0.0, 12.5).is_some());
        assert!(Coordinate::checked(95.0, 12.5).is_none());
    }

    #[test]
    fn test_validate_reports_values() {
        let err = Coordinate::new(f64::NAN, 1.0).validate().unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::InvalidCoordinate);
        assert!(err.to_string().contains("NaN"));
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (40.7128, -74.0060).into();
        assert_eq!(coord.latitude, 40.7128);
        assert_eq!(coord.longitude, -74.0060);
    }
}
