//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    /// Feed shaping (radius bounds, preview size, magnitude floor)
    #[serde(default)]
    pub feed: FeedConfig,

    /// Upstream collaborators
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Local profile used when no profile service token is given
    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Feed shaping settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedConfig {
    /// Radius used when neither the request nor the profile supplies one
    #[serde(default = "default_radius_miles")]
    pub default_radius_miles: u32,

    /// Smallest accepted radius
    #[serde(default = "default_min_radius_miles")]
    pub min_radius_miles: u32,

    /// Largest accepted radius
    #[serde(default = "default_max_radius_miles")]
    pub max_radius_miles: u32,

    /// Items per partition on the dashboard preview
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,

    /// Earthquakes below this magnitude are ignored
    #[serde(default = "default_min_magnitude")]
    pub min_earthquake_magnitude: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_radius_miles: default_radius_miles(),
            min_radius_miles: default_min_radius_miles(),
            max_radius_miles: default_max_radius_miles(),
            preview_limit: default_preview_limit(),
            min_earthquake_magnitude: default_min_magnitude(),
        }
    }
}

fn default_radius_miles() -> u32 {
    50
}

fn default_min_radius_miles() -> u32 {
    1
}

fn default_max_radius_miles() -> u32 {
    200
}

fn default_preview_limit() -> usize {
    5
}

fn default_min_magnitude() -> f64 {
    2.5
}

/// Upstream collaborator endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourcesConfig {
    /// Community posts listing (returns every post, unfiltered)
    #[serde(default = "default_posts_url")]
    pub posts_url: String,

    /// Authenticated profile lookup
    #[serde(default = "default_profile_url")]
    pub profile_url: String,

    /// Active weather alerts, GeoJSON
    #[serde(default = "default_weather_alerts_url")]
    pub weather_alerts_url: String,

    /// Recent earthquakes, GeoJSON
    #[serde(default = "default_earthquakes_url")]
    pub earthquakes_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent sent upstream (api.weather.gov rejects requests without one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            posts_url: default_posts_url(),
            profile_url: default_profile_url(),
            weather_alerts_url: default_weather_alerts_url(),
            earthquakes_url: default_earthquakes_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_posts_url() -> String {
    "http://localhost:5000/api/posts".to_string()
}

fn default_profile_url() -> String {
    "http://localhost:5000/api/users/profile".to_string()
}

fn default_weather_alerts_url() -> String {
    "https://api.weather.gov/alerts/active".to_string()
}

fn default_earthquakes_url() -> String {
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("hazardline/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// A locally configured home location
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileConfig {
    /// Home latitude
    pub latitude: Option<f64>,
    /// Home longitude
    pub longitude: Option<f64>,
    /// Alert radius in miles
    pub radius_miles: Option<u32>,
}

impl ProfileConfig {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.latitude.is_none() && self.longitude.is_none() && self.radius_miles.is_none()
    }
}
