//! Representative points for GeoJSON geometries.
//!
//! Alert feeds describe affected areas as polygons. Radius filtering needs a
//! single point, so polygons are reduced to the arithmetic mean of their
//! vertices. This is not a true area centroid; closing vertices count twice.

use crate::{Coordinate, GeoError, Result};
use serde::{Deserialize, Serialize};

/// A GeoJSON position: `[lng, lat]` with an optional altitude/depth.
pub type Position = Vec<f64>;

/// The GeoJSON geometry shapes alert feeds send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single position
    Point {
        /// `[lng, lat, ...]`
        coordinates: Position,
    },
    /// Outer ring plus holes
    Polygon {
        /// Rings of positions
        coordinates: Vec<Vec<Position>>,
    },
    /// Several polygons
    MultiPolygon {
        /// Polygons of rings of positions
        coordinates: Vec<Vec<Vec<Position>>>,
    },
}

impl Geometry {
    /// Reduce the geometry to one coordinate.
    ///
    /// Points are used directly; polygons use the mean of every vertex in
    /// every ring.
    ///
    /// # Errors
    /// [`GeoError::InvalidGeometry`] for empty geometries or short positions,
    /// [`GeoError::InvalidCoordinate`] if the result is out of range.
    ///
    /// # Example
    /// ```
    /// use hazardline_geo::Geometry;
    ///
    /// let square = Geometry::Polygon {
    ///     coordinates: vec![vec![
    ///         vec![-76.0, 40.0],
    ///         vec![-74.0, 40.0],
    ///         vec![-74.0, 42.0],
    ///         vec![-76.0, 42.0],
    ///     ]],
    /// };
    /// let c = square.representative_point().unwrap();
    /// assert_eq!((c.latitude, c.longitude), (41.0, -75.0));
    /// ```
    pub fn representative_point(&self) -> Result<Coordinate> {
        let coord = match self {
            Geometry::Point { coordinates } => position_to_coordinate(coordinates)?,
            Geometry::Polygon { coordinates } => vertex_mean(coordinates.iter().flatten())?,
            Geometry::MultiPolygon { coordinates } => {
                vertex_mean(coordinates.iter().flatten().flatten())?
            }
        };
        coord.validate()?;
        Ok(coord)
    }

    /// Parse a GeoJSON geometry value. `null` yields `Ok(None)`.
    pub fn from_value(value: &serde_json::Value) -> Result<Option<Self>> {
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value.clone())?))
    }
}

fn position_to_coordinate(position: &[f64]) -> Result<Coordinate> {
    match position {
        [lng, lat, ..] => Ok(Coordinate::new(*lat, *lng)),
        _ => Err(GeoError::InvalidGeometry(format!(
            "position needs at least 2 values, got {}",
            position.len()
        ))),
    }
}

fn vertex_mean<'a>(positions: impl Iterator<Item = &'a Position>) -> Result<Coordinate> {
    let mut lat_sum = 0.0;
    let mut lng_sum = 0.0;
    let mut count = 0usize;

    for position in positions {
        let coord = position_to_coordinate(position)?;
        lat_sum += coord.latitude;
        lng_sum += coord.longitude;
        count += 1;
    }

    if count == 0 {
        return Err(GeoError::InvalidGeometry("geometry has no vertices".into()));
    }

    Ok(Coordinate::new(
        lat_sum / count as f64,
        lng_sum / count as f64,
    ))
}
