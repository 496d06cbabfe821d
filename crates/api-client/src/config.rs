//! Configuration for the hazardline API client
//!
//! Built from the `[sources]` section of `hazardline.toml`, or straight from
//! the environment with the same defaults.

use crate::error::{ApiError, ApiResult};
use hazardline_core::config::{Config, SourcesConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Bearer token for the profile service
pub const ENV_TOKEN: &str = "HAZARDLINE_TOKEN";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Community posts listing URL
    pub posts_url: String,
    /// Profile lookup URL
    pub profile_url: String,
    /// Weather alerts GeoJSON URL
    pub weather_alerts_url: String,
    /// Earthquake GeoJSON URL
    pub earthquakes_url: String,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Bearer token for the profile service
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_sources(&SourcesConfig::default())
    }
}

impl ClientConfig {
    /// Build from the `[sources]` configuration section
    #[must_use]
    pub fn from_sources(sources: &SourcesConfig) -> Self {
        Self {
            posts_url: sources.posts_url.clone(),
            profile_url: sources.profile_url.clone(),
            weather_alerts_url: sources.weather_alerts_url.clone(),
            earthquakes_url: sources.earthquakes_url.clone(),
            timeout: Duration::from_secs(sources.timeout_secs),
            user_agent: sources.user_agent.clone(),
            token: None,
        }
    }

    /// Create configuration from `hazardline.toml` (if present) and environment variables
    ///
    /// Reads `HAZARDLINE_POSTS_URL`, `HAZARDLINE_PROFILE_URL`,
    /// `HAZARDLINE_WEATHER_URL`, `HAZARDLINE_EARTHQUAKES_URL`,
    /// `HAZARDLINE_TIMEOUT_SECS` and `HAZARDLINE_TOKEN`.
    pub fn from_env() -> ApiResult<Self> {
        let config = Config::load(None).map_err(|e| ApiError::config(e.message))?;
        let mut client_config = Self::from_sources(&config.schema.sources);
        client_config.token = env::var(ENV_TOKEN).ok().filter(|t| !t.trim().is_empty());
        Ok(client_config)
    }

    /// Builder-style method to set the posts URL
    #[must_use]
    pub fn with_posts_url(mut self, url: impl Into<String>) -> Self {
        self.posts_url = url.into();
        self
    }

    /// Builder-style method to set the profile URL
    #[must_use]
    pub fn with_profile_url(mut self, url: impl Into<String>) -> Self {
        self.profile_url = url.into();
        self
    }

    /// Builder-style method to set the weather alerts URL
    #[must_use]
    pub fn with_weather_alerts_url(mut self, url: impl Into<String>) -> Self {
        self.weather_alerts_url = url.into();
        self
    }

    /// Builder-style method to set the earthquakes URL
    #[must_use]
    pub fn with_earthquakes_url(mut self, url: impl Into<String>) -> Self {
        self.earthquakes_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the profile token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        for url in [
            &self.posts_url,
            &self.profile_url,
            &self.weather_alerts_url,
            &self.earthquakes_url,
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ApiError::InvalidUrl(url.clone()));
            }
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ApiError::config("user_agent cannot be empty"));
        }

        Ok(())
    }
}
