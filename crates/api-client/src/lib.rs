//! HTTP clients for the hazardline upstream collaborators
//!
//! One client, four collaborators:
//!
//! - **Posts store**: every community post, unfiltered
//! - **Profile store**: the authenticated user's home location and radius
//! - **Weather alerts**: the National Weather Service active alerts GeoJSON feed
//! - **Earthquakes**: the USGS recent events GeoJSON feed
//!
//! Responses are returned as typed wire DTOs; normalisation happens in
//! `hazardline-feed`.
//!
//! # Example
//!
//! ```rust,no_run
//! use hazardline_api_client::HazardClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HazardClient::new()?;
//!
//!     let quakes = client.earthquakes().recent().await?;
//!     println!("{} events, {} unreadable", quakes.items.len(), quakes.rejected.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::HazardClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::HazardClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{Decoded, EarthquakesApi, PostsApi, ProfileApi, WeatherApi};
    pub use crate::error::{ApiError, ApiResult};
}
