//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes. Every "is this within the
//! alert radius" decision in hazardline goes through [`distance_miles`].

use crate::{Coordinate, Result};

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometre to statute mile conversion factor.
pub const MILES_PER_KM: f64 = 0.621371;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// Does not validate its inputs; NaN in, NaN out.
///
/// # Example
/// ```
/// use hazardline_geo::{haversine_distance, Coordinate};
///
/// let berlin = Coordinate::new(52.5200, 13.4050);
/// let paris = Coordinate::new(48.8566, 2.3522);
///
/// let distance = haversine_distance(&berlin, &paris);
/// assert!((distance - 878.0).abs() < 10.0);
/// ```
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * central_angle
}

/// Unvalidated great-circle distance in miles.
#[inline]
pub fn haversine_distance_miles(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance(from, to) * MILES_PER_KM
}

/// Great-circle distance in miles between two validated coordinates.
///
/// # Errors
/// [`GeoError::InvalidCoordinate`](crate::GeoError::InvalidCoordinate) if either
/// side has a NaN, infinite or out-of-range component.
pub fn distance_miles(from: &Coordinate, to: &Coordinate) -> Result<f64> {
    from.validate()?;
    to.validate()?;
    Ok(haversine_distance_miles(from, to))
}
