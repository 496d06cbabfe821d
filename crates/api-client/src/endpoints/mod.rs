//! Endpoint-specific API implementations
//!
//! | Module | Collaborator | Shape |
//! |--------|--------------|-------|
//! | `posts` | community posts store | JSON array of posts |
//! | `profile` | user profile store | JSON profile, bearer auth |
//! | `weather` | NWS `alerts/active` | GeoJSON `FeatureCollection` |
//! | `earthquakes` | USGS summary feed | GeoJSON `FeatureCollection` |
//!
//! Collections are read element by element: one unreadable post or feature
//! is reported in [`Decoded::rejected`] instead of failing the whole fetch.

pub mod earthquakes;
pub mod posts;
pub mod profile;
pub mod weather;

pub use earthquakes::{EarthquakesApi, QuakeCollection, QuakeFeature, QuakeProperties};
pub use posts::{PostDto, PostsApi, PostsEnvelope};
pub use profile::{ProfileApi, ProfileDto};
pub use weather::{AlertCollection, AlertFeature, AlertProperties, WeatherApi};

use serde::de::DeserializeOwned;

/// The readable elements of an upstream collection, plus the ones that
/// were not
#[derive(Debug)]
pub struct Decoded<T> {
    /// Elements that matched the wire type, in upstream order
    pub items: Vec<T>,
    /// Elements that did not
    pub rejected: Vec<Rejected>,
}

/// An element that could not be read
#[derive(Debug)]
pub struct Rejected {
    /// Position in the upstream collection
    pub index: usize,
    /// Why it was rejected
    pub error: serde_json::Error,
}

impl<T: DeserializeOwned> Decoded<T> {
    /// Decode each raw element on its own
    pub fn from_values(raw: Vec<serde_json::Value>) -> Self {
        let mut items = Vec::with_capacity(raw.len());
        let mut rejected = Vec::new();
        for (index, value) in raw.into_iter().enumerate() {
            match serde_json::from_value(value) {
                Ok(item) => items.push(item),
                Err(error) => rejected.push(Rejected { index, error }),
            }
        }
        Self { items, rejected }
    }
}
