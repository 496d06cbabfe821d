//! National Weather Service active alerts
//!
//! Maps to `GET https://api.weather.gov/alerts/active`, a GeoJSON
//! `FeatureCollection`. Only the fields the feed pipeline reads are modelled.

use super::Decoded;
use crate::client::HazardClient;
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};

/// Weather alerts API interface
#[derive(Clone)]
pub struct WeatherApi {
    client: HazardClient,
}

impl WeatherApi {
    /// Create a new weather API interface
    pub(crate) fn new(client: HazardClient) -> Self {
        Self { client }
    }

    /// Fetch the currently active alerts. Features that do not match
    /// [`AlertFeature`] are returned as rejected.
    pub async fn active_alerts(&self) -> ApiResult<Decoded<AlertFeature>> {
        let collection: AlertCollection = self
            .client
            .get_url(&self.client.config().weather_alerts_url)
            .await?;
        Ok(collection.decode())
    }
}

/// GeoJSON feature collection of alerts, features still raw
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertCollection {
    /// Alerts
    pub features: Vec<serde_json::Value>,
}

impl AlertCollection {
    /// Decode each feature on its own
    pub fn decode(self) -> Decoded<AlertFeature> {
        Decoded::from_values(self.features)
    }
}

/// One alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertFeature {
    /// Feature ID (an `api.weather.gov` URL)
    #[serde(default)]
    pub id: Option<String>,
    /// Point, Polygon, MultiPolygon or null (zone-only alerts)
    #[serde(default)]
    pub geometry: serde_json::Value,
    /// Alert details
    pub properties: AlertProperties,
}

/// The alert properties the pipeline reads
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertProperties {
    #[serde(default, rename = "@id")]
    pub at_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    /// e.g. "Flood Warning"
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// "Extreme", "Severe", "Moderate", "Minor" or "Unknown"
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub sent: Option<String>,
    #[serde(default)]
    pub effective: Option<String>,
    #[serde(default)]
    pub onset: Option<String>,
    #[serde(default, rename = "senderName")]
    pub sender_name: Option<String>,
    #[serde(default, rename = "areaDesc")]
    pub area_desc: Option<String>,
}
