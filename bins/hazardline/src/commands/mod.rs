//! Subcommands

pub mod config;
pub mod distance;
pub mod feed;
pub mod resolve;

use anyhow::{Context, Result};
use clap::Args;
use hazardline_api_client::{ClientConfig, HazardClient};
use hazardline_core::config::Config;
use hazardline_feed::{Profile, QueryOverride};
use serde::Serialize;
use tracing::{debug, warn};

/// Location arguments shared by `feed` and `resolve`
#[derive(Args, Debug, Clone, Default)]
pub struct OriginArgs {
    /// Latitude override (needs --lng)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<String>,

    /// Longitude override (needs --lat)
    #[arg(long, allow_negative_numbers = true)]
    pub lng: Option<String>,

    /// Radius override in whole miles
    #[arg(short, long)]
    pub radius: Option<String>,

    /// Bearer token for the profile service
    #[arg(long, env = "HAZARDLINE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl OriginArgs {
    /// The request override, if any override flag was given
    pub fn query(&self) -> Option<QueryOverride> {
        if self.lat.is_none() && self.lng.is_none() && self.radius.is_none() {
            return None;
        }
        Some(QueryOverride {
            lat: self.lat.clone(),
            lng: self.lng.clone(),
            radius: self.radius.clone(),
        })
    }
}

/// Build the shared HTTP client from the `[sources]` section
pub fn http_client(config: &Config, token: Option<&str>) -> Result<HazardClient> {
    let mut client_config = ClientConfig::from_sources(&config.schema.sources);
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        client_config = client_config.with_token(token);
    }
    HazardClient::with_config(client_config).context("building HTTP client")
}

/// The user's profile: from the profile service when a token is given,
/// else the `[profile]` section. A failed lookup falls back to the file.
pub async fn load_profile(client: &HazardClient, config: &Config) -> Option<Profile> {
    let local = Profile::from_config(&config.schema.profile);

    if client.config().token.is_none() {
        debug!(configured = local.is_some(), "Using local profile");
        return local;
    }

    match client.profile().me().await {
        Ok(dto) => Some(Profile::from_dto(&dto)),
        Err(e) => {
            warn!(error = %e, "Profile lookup failed, using local profile");
            local
        }
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
