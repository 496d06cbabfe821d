//! National Weather Service active alerts

use super::{keep_readable, SourceAdapter};
use crate::error::{FeedError, FeedResult};
use crate::location::OriginSpec;
use crate::record::{parse_timestamp, Category, NormalizedRecord, Severity, SourceKind};
use chrono::{DateTime, Utc};
use hazardline_api_client::endpoints::AlertFeature;
use hazardline_api_client::HazardClient;
use hazardline_geo::{Coordinate, Geometry};
use tracing::debug;

/// Source label for weather alerts
pub const NWS_LABEL: &str = "National Weather Service";

/// Reads active alerts from the weather service
#[derive(Clone)]
pub struct WeatherAlertAdapter {
    client: HazardClient,
}

impl WeatherAlertAdapter {
    /// Create an adapter over a shared client
    pub fn new(client: HazardClient) -> Self {
        Self { client }
    }
}

impl SourceAdapter for WeatherAlertAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::WeatherAlert
    }

    async fn fetch(&self, _origin: &OriginSpec) -> FeedResult<Vec<NormalizedRecord>> {
        let alerts = self
            .client
            .weather()
            .active_alerts()
            .await
            .map_err(|e| FeedError::source_fetch(SourceKind::WeatherAlert, e))?;
        Ok(normalize_alerts(keep_readable(SourceKind::WeatherAlert, alerts)))
    }
}

/// Normalise every readable alert
pub fn normalize_alerts(features: Vec<AlertFeature>) -> Vec<NormalizedRecord> {
    features.into_iter().map(normalize_alert).collect()
}

/// Map one alert to a record.
///
/// Points are used directly; polygons become the mean of their vertices.
/// Zone-only alerts (null geometry) have no coordinate.
pub fn normalize_alert(feature: AlertFeature) -> NormalizedRecord {
    let coordinate = alert_coordinate(&feature);
    let props = feature.properties;

    let occurred_at = [&props.sent, &props.effective, &props.onset]
        .into_iter()
        .flatten()
        .map(|raw| parse_timestamp(Some(raw.as_str())))
        .find(|ts| *ts != DateTime::<Utc>::UNIX_EPOCH)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    let link = props.at_id.clone().or_else(|| feature.id.clone());
    let id = feature
        .id
        .or(props.id)
        .or(props.at_id)
        .unwrap_or_default();

    NormalizedRecord {
        id,
        title: props
            .headline
            .clone()
            .or_else(|| props.event.clone())
            .unwrap_or_else(|| "Weather Alert".to_string()),
        description: props.description.or(props.area_desc).unwrap_or_default(),
        category: Category::from(props.event.unwrap_or_else(|| "Weather Alert".to_string())),
        coordinate,
        occurred_at,
        source_kind: SourceKind::WeatherAlert,
        source_label: NWS_LABEL.to_string(),
        severity: props.severity.as_deref().map(Severity::parse),
        external_link: link,
    }
}

fn alert_coordinate(feature: &AlertFeature) -> Option<Coordinate> {
    let geometry = match Geometry::from_value(&feature.geometry) {
        Ok(Some(geometry)) => geometry,
        Ok(None) => return None,
        Err(e) => {
            debug!(alert = ?feature.id, error = %e, "Unreadable alert geometry");
            return None;
        }
    };
    match geometry.representative_point() {
        Ok(c) => Coordinate::checked(c.latitude, c.longitude),
        Err(e) => {
            debug!(alert = ?feature.id, error = %e, "Alert geometry has no usable point");
            None
        }
    }
}
