//! Stored point parsing.
//!
//! Community posts keep their location in whatever shape the document store
//! handed back. Supported:
//! - GeoJSON: `{"type": "Point", "coordinates": [lng, lat]}`
//! - WKT: `POINT(lng lat)`
//! - Plain objects: `{"lat": .., "lng": ..}` or `{"latitude": .., "longitude": ..}`

use crate::{Coordinate, GeoError, Result};

/// Parse a stored point, mapping anything unusable to "absent".
///
/// Malformed values, out-of-range values and the `(0, 0)` sentinel all
/// return `None`.
///
/// # Example
/// ```
/// use hazardline_geo::parse_point;
/// use serde_json::json;
///
/// let point = json!({"type": "Point", "coordinates": [-75.0, 40.0]});
/// let coord = parse_point(&point).unwrap();
/// assert_eq!(coord.latitude, 40.0);
///
/// assert!(parse_point(&json!({"type": "Point", "coordinates": [0.0, 0.0]})).is_none());
/// assert!(parse_point(&json!(null)).is_none());
/// ```
pub fn parse_point(value: &serde_json::Value) -> Option<Coordinate> {
    let coord = parse_point_strict(value).ok()?;
    Coordinate::checked(coord.latitude, coord.longitude)
}

/// Parse a stored point, reporting why it could not be read.
///
/// Range is not checked here; the sentinel is returned as-is.
pub fn parse_point_strict(value: &serde_json::Value) -> Result<Coordinate> {
    match value {
        serde_json::Value::Null => Err(GeoError::InvalidGeometry("null point".into())),
        serde_json::Value::Object(map) => {
            if let Some(coords) = map.get("coordinates") {
                return parse_position_array(coords);
            }
            let lat = map.get("lat").or_else(|| map.get("latitude"));
            let lng = map
                .get("lng")
                .or_else(|| map.get("lon"))
                .or_else(|| map.get("longitude"));
            match (lat.and_then(number_like), lng.and_then(number_like)) {
                (Some(lat), Some(lng)) => Ok(Coordinate::new(lat, lng)),
                _ => Err(GeoError::InvalidGeometry(format!(
                    "object has no usable coordinates: {}",
                    value
                ))),
            }
        }
        serde_json::Value::String(wkt) => parse_wkt_point(wkt),
        other => Err(GeoError::InvalidGeometry(format!(
            "unsupported point value: {}",
            other
        ))),
    }
}

fn parse_position_array(value: &serde_json::Value) -> Result<Coordinate> {
    let coords = value
        .as_array()
        .ok_or_else(|| GeoError::InvalidGeometry("coordinates is not an array".into()))?;
    if coords.len() < 2 {
        return Err(GeoError::InvalidGeometry(format!(
            "expected [lng, lat], got {} values",
            coords.len()
        )));
    }
    let lng = number_like(&coords[0])
        .ok_or_else(|| GeoError::InvalidGeometry(format!("invalid longitude: {}", coords[0])))?;
    let lat = number_like(&coords[1])
        .ok_or_else(|| GeoError::InvalidGeometry(format!("invalid latitude: {}", coords[1])))?;
    Ok(Coordinate::new(lat, lng))
}

// Numbers sometimes arrive as strings from form posts.
fn number_like(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a WKT POINT string.
///
/// Format: `POINT(longitude latitude)`
fn parse_wkt_point(wkt: &str) -> Result<Coordinate> {
    let wkt = wkt.trim();

    if !wkt.starts_with("POINT(") && !wkt.starts_with("POINT (") {
        return Err(GeoError::InvalidGeometry(format!(
            "Expected POINT, got: {}",
            wkt
        )));
    }

    let start = wkt
        .find('(')
        .ok_or_else(|| GeoError::InvalidGeometry("Missing '('".into()))?;
    let end = wkt
        .find(')')
        .ok_or_else(|| GeoError::InvalidGeometry("Missing ')'".into()))?;

    if start >= end {
        return Err(GeoError::InvalidGeometry("Invalid parentheses".into()));
    }

    let parts: Vec<&str> = wkt[start + 1..end].split_whitespace().collect();

    if parts.len() != 2 {
        return Err(GeoError::InvalidGeometry(format!(
            "Expected 2 coordinates, got {}",
            parts.len()
        )));
    }

    let lng: f64 = parts[0]
        .parse()
        .map_err(|_| GeoError::InvalidGeometry(format!("Invalid longitude: {}", parts[0])))?;
    let lat: f64 = parts[1]
        .parse()
        .map_err(|_| GeoError::InvalidGeometry(format!("Invalid latitude: {}", parts[1])))?;

    Ok(Coordinate::new(lat, lng))
}
