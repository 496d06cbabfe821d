//! The common record shape every source is normalised into

use chrono::{DateTime, NaiveDateTime, Utc};
use hazardline_geo::{Coordinate, Located};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// User-submitted post
    Community,
    /// Severe-weather alert feed
    WeatherAlert,
    /// Earthquake catalogue
    Earthquake,
}

impl SourceKind {
    /// Every source, in merge order
    pub const ALL: [SourceKind; 3] = [
        SourceKind::Community,
        SourceKind::WeatherAlert,
        SourceKind::Earthquake,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Community => "community",
            SourceKind::WeatherAlert => "weather-alert",
            SourceKind::Earthquake => "earthquake",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disaster types a reporter can pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisasterType {
    /// Wildfire or structure fire
    Fire,
    /// Flood
    Flood,
    /// Earthquake
    Earthquake,
    /// Hurricane or tropical storm
    Hurricane,
    /// Tornado
    Tornado,
    /// Anything else
    Other,
}

impl DisasterType {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            DisasterType::Fire => "fire",
            DisasterType::Flood => "flood",
            DisasterType::Earthquake => "earthquake",
            DisasterType::Hurricane => "hurricane",
            DisasterType::Tornado => "tornado",
            DisasterType::Other => "other",
        }
    }
}

impl FromStr for DisasterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fire" => Ok(DisasterType::Fire),
            "flood" => Ok(DisasterType::Flood),
            "earthquake" => Ok(DisasterType::Earthquake),
            "hurricane" => Ok(DisasterType::Hurricane),
            "tornado" => Ok(DisasterType::Tornado),
            "other" => Ok(DisasterType::Other),
            other => Err(format!(
                "unknown disaster type '{other}' (expected fire, flood, earthquake, hurricane, tornado or other)"
            )),
        }
    }
}

/// A record's category, kept exactly as the upstream wrote it: a disaster
/// type picked by a reporter ("Flood"), an alert event name ("Flash Flood
/// Warning") or a magnitude class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// A category with the given display text
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The canonical lowercase category for a disaster type
    pub fn known(disaster_type: DisasterType) -> Self {
        Self(disaster_type.as_str().to_string())
    }

    /// Display text, as received
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The disaster type this text names, matched case-insensitively
    pub fn disaster_type(&self) -> Option<DisasterType> {
        self.0.parse().ok()
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<DisasterType> for Category {
    fn from(t: DisasterType) -> Self {
        Category::known(t)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Severity, following the CAP levels the weather feed uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Extraordinary threat to life or property
    Extreme,
    /// Significant threat
    Severe,
    /// Possible threat
    Moderate,
    /// Minimal threat
    Minor,
    /// Not stated
    Unknown,
}

impl Severity {
    /// Parse a free-text severity. Unrecognised text is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "extreme" => Severity::Extreme,
            "severe" => Severity::Severe,
            "moderate" => Severity::Moderate,
            "minor" => Severity::Minor,
            _ => Severity::Unknown,
        }
    }

    /// Severity of a seismic event
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude >= 7.0 {
            Severity::Extreme
        } else if magnitude >= 5.0 {
            Severity::Severe
        } else if magnitude >= 3.0 {
            Severity::Moderate
        } else {
            Severity::Minor
        }
    }
}

/// A disaster-related item from any source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    /// Source-scoped identifier
    pub id: String,
    /// Headline
    pub title: String,
    /// Body text
    pub description: String,
    /// Disaster type or free-text class
    pub category: Category,
    /// Location; `None` when the source had no usable point
    pub coordinate: Option<Coordinate>,
    /// When the event happened or the report was made
    pub occurred_at: DateTime<Utc>,
    /// Which adapter produced the record
    pub source_kind: SourceKind,
    /// Human-readable origin ("Community", "National Weather Service", ...)
    pub source_label: String,
    /// Severity, if the source gives one
    pub severity: Option<Severity>,
    /// Link to the original item
    pub external_link: Option<String>,
}

impl Located for NormalizedRecord {
    fn location(&self) -> Option<Coordinate> {
        self.coordinate
    }
}

/// A record after radius filtering.
///
/// `distance_miles` is set when an origin was present and omitted in the
/// global view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredRecord {
    /// The record
    #[serde(flatten)]
    pub record: NormalizedRecord,
    /// Distance from the origin used for this pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
}

impl FilteredRecord {
    /// Wrap a record without a distance (no origin)
    pub fn unfiltered(record: NormalizedRecord) -> Self {
        Self {
            record,
            distance_miles: None,
        }
    }
}

/// Parse an upstream timestamp.
///
/// Accepts RFC 3339, naive ISO-8601 (taken as UTC) and epoch milliseconds.
/// Anything else sorts as the epoch, i.e. last.
pub fn parse_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(try_parse_timestamp)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn try_parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}
