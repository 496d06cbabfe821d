//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::env;
use std::path::Path;

/// Environment variables that override file settings.
pub const ENV_POSTS_URL: &str = "HAZARDLINE_POSTS_URL";
/// Profile service override
pub const ENV_PROFILE_URL: &str = "HAZARDLINE_PROFILE_URL";
/// Weather alerts feed override
pub const ENV_WEATHER_URL: &str = "HAZARDLINE_WEATHER_URL";
/// Earthquake feed override
pub const ENV_EARTHQUAKES_URL: &str = "HAZARDLINE_EARTHQUAKES_URL";
/// Request timeout override, in seconds
pub const ENV_TIMEOUT_SECS: &str = "HAZARDLINE_TIMEOUT_SECS";

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed settings
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or the standard locations,
    /// apply environment overrides, then validate.
    ///
    /// An explicit path that does not exist is an error; a missing file in
    /// the standard locations just means defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
        }

        let config_path = path.map(String::from).or_else(find_config_file);

        let mut schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        apply_env_overrides(&mut schema)?;

        let config = Self {
            schema,
            path: config_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults only (no file, no environment)
    pub fn defaults() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        let feed = &self.schema.feed;
        if feed.min_radius_miles == 0 || feed.min_radius_miles > feed.max_radius_miles {
            return Err(Error::config_invalid(format!(
                "radius bounds must satisfy 1 <= min <= max, got [{}, {}]",
                feed.min_radius_miles, feed.max_radius_miles
            )));
        }
        if !(feed.min_radius_miles..=feed.max_radius_miles).contains(&feed.default_radius_miles) {
            return Err(Error::config_invalid(format!(
                "default radius {} is outside [{}, {}]",
                feed.default_radius_miles, feed.min_radius_miles, feed.max_radius_miles
            )));
        }
        if feed.preview_limit == 0 {
            return Err(Error::config_invalid("preview_limit must be at least 1"));
        }
        if !feed.min_earthquake_magnitude.is_finite() {
            return Err(Error::config_invalid("min_earthquake_magnitude must be finite"));
        }

        let sources = &self.schema.sources;
        for (name, url) in [
            ("posts_url", &sources.posts_url),
            ("profile_url", &sources.profile_url),
            ("weather_alerts_url", &sources.weather_alerts_url),
            ("earthquakes_url", &sources.earthquakes_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::config_invalid(format!(
                    "{} must start with http:// or https://, got '{}'",
                    name, url
                )));
            }
        }
        if sources.timeout_secs == 0 {
            return Err(Error::config_invalid("timeout_secs cannot be zero"));
        }

        Ok(())
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [
        "hazardline.toml",
        ".hazardline.toml",
        ".config/hazardline.toml",
    ];

    candidates
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(String::from)
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("reading config file {}", path))?;

    toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("parsing config file {}", path))
}

fn apply_env_overrides(schema: &mut ConfigSchema) -> Result<()> {
    let sources = &mut schema.sources;
    if let Ok(url) = env::var(ENV_POSTS_URL) {
        sources.posts_url = url;
    }
    if let Ok(url) = env::var(ENV_PROFILE_URL) {
        sources.profile_url = url;
    }
    if let Ok(url) = env::var(ENV_WEATHER_URL) {
        sources.weather_alerts_url = url;
    }
    if let Ok(url) = env::var(ENV_EARTHQUAKES_URL) {
        sources.earthquakes_url = url;
    }
    if let Ok(raw) = env::var(ENV_TIMEOUT_SECS) {
        sources.timeout_secs = raw.trim().parse().map_err(|_| {
            Error::config_invalid(format!("{} must be a whole number, got '{}'", ENV_TIMEOUT_SECS, raw))
        })?;
    }
    Ok(())
}
