//! USGS earthquake summary feed
//!
//! Maps to the `summary/*.geojson` feeds at `earthquake.usgs.gov`. Event
//! times are milliseconds since the Unix epoch.

use super::Decoded;
use crate::client::HazardClient;
use crate::error::ApiResult;
use serde::{Deserialize, Deserializer, Serialize};

/// Earthquake API interface
#[derive(Clone)]
pub struct EarthquakesApi {
    client: HazardClient,
}

impl EarthquakesApi {
    /// Create a new earthquake API interface
    pub(crate) fn new(client: HazardClient) -> Self {
        Self { client }
    }

    /// Fetch recent events. Features that do not match [`QuakeFeature`]
    /// are returned as rejected.
    pub async fn recent(&self) -> ApiResult<Decoded<QuakeFeature>> {
        let collection: QuakeCollection = self
            .client
            .get_url(&self.client.config().earthquakes_url)
            .await?;
        Ok(collection.decode())
    }
}

/// GeoJSON feature collection of seismic events, features still raw
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuakeCollection {
    /// Events
    pub features: Vec<serde_json::Value>,
}

impl QuakeCollection {
    /// Decode each feature on its own
    pub fn decode(self) -> Decoded<QuakeFeature> {
        Decoded::from_values(self.features)
    }
}

/// One seismic event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuakeFeature {
    /// USGS event ID, e.g. `ci40123456`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    /// `Point` with `[lng, lat, depth_km]`
    #[serde(default)]
    pub geometry: serde_json::Value,
    /// Event details
    pub properties: QuakeProperties,
}

/// The event properties the pipeline reads
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuakeProperties {
    #[serde(default)]
    pub mag: Option<f64>,
    #[serde(default)]
    pub place: Option<String>,
    /// Milliseconds since the epoch
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// "earthquake", "quarry blast", ...
    #[serde(default, rename = "type")]
    pub event_type: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quake_collection_deserialize() {
        let json = r#"{
            "type": "FeatureCollection",
            "metadata": {"generated": 1714564800000, "count": 2},
            "features": [
                {
                    "type": "Feature",
                    "id": "us7000abcd",
                    "properties": {
                        "mag": 5.4,
                        "place": "10 km SSW of Somewhere, CA",
                        "time": 1714564000000,
                        "url": "https://earthquake.usgs.gov/earthquakes/eventpage/us7000abcd",
                        "title": "M 5.4 - 10 km SSW of Somewhere, CA",
                        "type": "earthquake"
                    },
                    "geometry": {"type": "Point", "coordinates": [-117.5, 35.7, 8.2]}
                },
                {
                    "type": "Feature",
                    "id": "nc123",
                    "properties": {"mag": null, "place": null, "time": 1714563000000},
                    "geometry": {"type": "Point", "coordinates": [-122.0, 37.0, 1.0]}
                }
            ]
        }"#;

        let quakes = serde_json::from_str::<QuakeCollection>(json).unwrap().decode();
        assert_eq!(quakes.items.len(), 2);
        assert!(quakes.rejected.is_empty());
        assert_eq!(quakes.items[0].properties.mag, Some(5.4));
        assert_eq!(quakes.items[0].properties.event_type.as_deref(), Some("earthquake"));
        assert!(quakes.items[1].properties.mag.is_none());
    }

    #[test]
    fn test_feature_without_properties_is_rejected_alone() {
        let json = r#"{"features": [
            {"id": "a", "properties": {"mag": 3.1}},
            {"id": "b", "geometry": null},
            {"id": null, "properties": {"mag": 4.0}}
        ]}"#;

        let quakes = serde_json::from_str::<QuakeCollection>(json).unwrap().decode();
        assert_eq!(quakes.items.len(), 2);
        assert_eq!(quakes.items[1].id, "");
        assert_eq!(quakes.rejected.len(), 1);
        assert_eq!(quakes.rejected[0].index, 1);
    }

    #[test]
    fn test_body_without_features_is_an_error() {
        assert!(serde_json::from_str::<QuakeCollection>(r#"{"error": "rate limited"}"#).is_err());
    }
}
