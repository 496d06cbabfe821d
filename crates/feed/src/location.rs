//! Origin resolution
//!
//! Works out which coordinate and radius a feed run filters against. A
//! request override beats the stored profile, and the `(0, 0)` sentinel
//! never becomes an origin. A run with no coordinate is the global,
//! unfiltered view, not an error.

use crate::error::{FeedError, FeedResult};
use hazardline_api_client::endpoints::ProfileDto;
use hazardline_core::config::{FeedConfig, ProfileConfig};
use hazardline_geo::{parse_point, Coordinate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The location settings stored for a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Home location; `None` when unset
    pub coordinate: Option<Coordinate>,
    /// Alert radius in miles
    pub radius_miles: Option<u32>,
}

impl Profile {
    /// Create a profile, dropping a sentinel or invalid coordinate
    pub fn new(coordinate: Option<Coordinate>, radius_miles: Option<u32>) -> Self {
        Self {
            coordinate: coordinate.and_then(|c| Coordinate::checked(c.latitude, c.longitude)),
            radius_miles,
        }
    }

    /// Read the location fields of a profile returned by the profile store
    pub fn from_dto(dto: &ProfileDto) -> Self {
        Self {
            coordinate: parse_point(&dto.location),
            radius_miles: dto.alert_radius.as_ref().and_then(radius_from_value),
        }
    }

    /// Read the `[profile]` section of the configuration. `None` when empty.
    pub fn from_config(config: &ProfileConfig) -> Option<Self> {
        if config.is_empty() {
            return None;
        }
        let coordinate = match (config.latitude, config.longitude) {
            (Some(lat), Some(lng)) => Coordinate::checked(lat, lng),
            _ => None,
        };
        Some(Self {
            coordinate,
            radius_miles: config.radius_miles,
        })
    }
}

// Radii are stored as numbers or numeric strings depending on the client.
fn radius_from_value(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|r| u32::try_from(r).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Raw request parameters that may override the profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOverride {
    /// Latitude, as supplied
    pub lat: Option<String>,
    /// Longitude, as supplied
    pub lng: Option<String>,
    /// Radius in miles, as supplied
    pub radius: Option<String>,
}

impl QueryOverride {
    /// An empty override
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the latitude
    #[must_use]
    pub fn with_lat(mut self, lat: impl Into<String>) -> Self {
        self.lat = Some(lat.into());
        self
    }

    /// Set the longitude
    #[must_use]
    pub fn with_lng(mut self, lng: impl Into<String>) -> Self {
        self.lng = Some(lng.into());
        self
    }

    /// Set the radius
    #[must_use]
    pub fn with_radius(mut self, radius: impl Into<String>) -> Self {
        self.radius = Some(radius.into());
        self
    }

    /// Both latitude and longitude, parsed, if they form a usable origin
    pub fn coordinate(&self) -> Option<Coordinate> {
        let lat: f64 = self.lat.as_deref()?.trim().parse().ok()?;
        let lng: f64 = self.lng.as_deref()?.trim().parse().ok()?;
        Coordinate::checked(lat, lng)
    }
}

/// Which input supplied the origin coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginSource {
    /// The stored profile (also used when there is no coordinate at all)
    Profile,
    /// The request's lat/lng parameters
    QueryOverride,
}

/// The coordinate and radius one feed run filters against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginSpec {
    /// `None` means no filtering: every record is returned
    pub coordinate: Option<Coordinate>,
    /// Inclusive radius in miles
    pub radius_miles: u32,
    /// Where the coordinate came from
    pub source: OriginSource,
}

impl OriginSpec {
    /// An origin with a coordinate
    pub fn at(coordinate: Coordinate, radius_miles: u32, source: OriginSource) -> Self {
        Self {
            coordinate: Some(coordinate),
            radius_miles,
            source,
        }
    }

    /// The global view: no coordinate
    pub fn unlocated(radius_miles: u32) -> Self {
        Self {
            coordinate: None,
            radius_miles,
            source: OriginSource::Profile,
        }
    }
}

/// Accepted radius range and fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadiusBounds {
    /// Smallest accepted radius
    pub min: u32,
    /// Largest accepted radius
    pub max: u32,
    /// Used when nothing else supplies a valid radius
    pub default: u32,
}

impl Default for RadiusBounds {
    fn default() -> Self {
        Self {
            min: 1,
            max: 200,
            default: 50,
        }
    }
}

impl From<&FeedConfig> for RadiusBounds {
    fn from(config: &FeedConfig) -> Self {
        Self {
            min: config.min_radius_miles,
            max: config.max_radius_miles,
            default: config.default_radius_miles,
        }
    }
}

impl RadiusBounds {
    /// True if `radius` is within `[min, max]`
    pub fn contains(&self, radius: u32) -> bool {
        (self.min..=self.max).contains(&radius)
    }
}

/// Parse a radius override: a whole number of miles within `bounds`.
pub fn parse_radius_override(raw: &str, bounds: &RadiusBounds) -> FeedResult<u32> {
    let radius: u32 = raw
        .trim()
        .parse()
        .map_err(|_| FeedError::invalid_radius(raw, "not a whole number of miles"))?;
    if !bounds.contains(radius) {
        return Err(FeedError::invalid_radius(
            raw,
            format!("outside [{}, {}]", bounds.min, bounds.max),
        ));
    }
    Ok(radius)
}

/// Resolve the origin for one feed run.
///
/// Coordinate: the override's lat/lng if both parse into a usable
/// coordinate, else the profile's, else none. Radius: the override if
/// valid, else the profile's if in range, else `bounds.default`. An invalid
/// override radius is ignored.
pub fn resolve(
    profile: Option<&Profile>,
    query: Option<&QueryOverride>,
    bounds: &RadiusBounds,
) -> OriginSpec {
    let radius_miles = resolve_radius(profile, query, bounds);

    if let Some(coordinate) = query.and_then(QueryOverride::coordinate) {
        return OriginSpec::at(coordinate, radius_miles, OriginSource::QueryOverride);
    }

    match profile.and_then(|p| p.coordinate).filter(|c| !c.is_sentinel()) {
        Some(coordinate) => OriginSpec::at(coordinate, radius_miles, OriginSource::Profile),
        None => OriginSpec::unlocated(radius_miles),
    }
}

fn resolve_radius(
    profile: Option<&Profile>,
    query: Option<&QueryOverride>,
    bounds: &RadiusBounds,
) -> u32 {
    if let Some(raw) = query.and_then(|q| q.radius.as_deref()) {
        match parse_radius_override(raw, bounds) {
            Ok(radius) => return radius,
            Err(e) => debug!(error = %e, "Ignoring radius override"),
        }
    }

    profile
        .and_then(|p| p.radius_miles)
        .filter(|r| bounds.contains(*r))
        .unwrap_or(bounds.default)
}
