//! Nearby disaster feed for hazardline
//!
//! One pipeline per request:
//!
//! 1. [`location::resolve`] picks the origin coordinate and radius
//! 2. the three [`adapters`] fetch concurrently and normalise their upstreams
//! 3. [`filter::filter_records`] keeps what is within the radius
//! 4. [`aggregate::aggregate`] splits community reports from alerts, sorts
//!    newest first and truncates the dashboard preview
//!
//! A failing upstream contributes nothing; the feed is only unavailable when
//! every upstream fails.
//!
//! # Example
//!
//! ```rust,no_run
//! use hazardline_api_client::HazardClient;
//! use hazardline_core::config::FeedConfig;
//! use hazardline_feed::{HttpFeedService, Profile};
//! use hazardline_geo::Coordinate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = HttpFeedService::from_client(HazardClient::new()?, &FeedConfig::default());
//!     let home = Profile::new(Some(Coordinate::new(40.0, -75.0)), Some(25));
//!
//!     let feed = service.get_feed(Some(&home), None, true).await;
//!     println!("{} reports nearby", feed.community_reports.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod aggregate;
pub mod classify;
mod error;
pub mod filter;
pub mod location;
pub mod pipeline;
pub mod record;

pub use error::{FeedError, FeedResult};
pub use location::{OriginSource, OriginSpec, Profile, QueryOverride, RadiusBounds};
pub use pipeline::{compute_distance, Feed, FeedService, FeedSettings, FeedView, HttpFeedService};
pub use record::{Category, DisasterType, FilteredRecord, NormalizedRecord, Severity, SourceKind};
