//! USGS earthquake catalogue

use super::{keep_readable, SourceAdapter};
use crate::error::{FeedError, FeedResult};
use crate::location::OriginSpec;
use crate::record::{Category, NormalizedRecord, Severity, SourceKind};
use chrono::{DateTime, Utc};
use hazardline_api_client::endpoints::QuakeFeature;
use hazardline_api_client::HazardClient;
use hazardline_geo::parse_point;

/// Source label for earthquakes
pub const USGS_LABEL: &str = "USGS Earthquake Hazards Program";

/// Reads recent events from the earthquake catalogue
#[derive(Clone)]
pub struct EarthquakeAdapter {
    client: HazardClient,
    min_magnitude: f64,
}

impl EarthquakeAdapter {
    /// Create an adapter that ignores events below `min_magnitude`
    pub fn new(client: HazardClient, min_magnitude: f64) -> Self {
        Self {
            client,
            min_magnitude,
        }
    }
}

impl SourceAdapter for EarthquakeAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Earthquake
    }

    async fn fetch(&self, _origin: &OriginSpec) -> FeedResult<Vec<NormalizedRecord>> {
        let quakes = self
            .client
            .earthquakes()
            .recent()
            .await
            .map_err(|e| FeedError::source_fetch(SourceKind::Earthquake, e))?;
        Ok(normalize_quakes(
            keep_readable(SourceKind::Earthquake, quakes),
            self.min_magnitude,
        ))
    }
}

/// Magnitude class used as the record category
pub fn magnitude_category(magnitude: f64) -> &'static str {
    if magnitude >= 7.0 {
        "Major Earthquake"
    } else if magnitude >= 5.0 {
        "Moderate Earthquake"
    } else {
        "Minor Earthquake"
    }
}

/// Normalise readable events, dropping non-earthquakes and events below
/// `min_magnitude`
pub fn normalize_quakes(features: Vec<QuakeFeature>, min_magnitude: f64) -> Vec<NormalizedRecord> {
    features
        .into_iter()
        .filter_map(|f| normalize_quake(f, min_magnitude))
        .collect()
}

/// Map one event to a record. `None` for quarry blasts, explosions and
/// other non-tectonic events, and for events with no magnitude or one
/// below `min_magnitude`. An event without a type is taken as an earthquake.
pub fn normalize_quake(feature: QuakeFeature, min_magnitude: f64) -> Option<NormalizedRecord> {
    let props = feature.properties;
    if !props
        .event_type
        .as_deref()
        .is_none_or(|t| t.trim().eq_ignore_ascii_case("earthquake"))
    {
        return None;
    }
    let magnitude = props.mag.filter(|m| m.is_finite() && *m >= min_magnitude)?;

    let place = props.place.unwrap_or_default();
    let title = props
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| format!("M {magnitude:.1} - {place}"));

    Some(NormalizedRecord {
        id: feature.id,
        title,
        description: place,
        category: Category::from(magnitude_category(magnitude)),
        coordinate: parse_point(&feature.geometry),
        occurred_at: props
            .time
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        source_kind: SourceKind::Earthquake,
        source_label: USGS_LABEL.to_string(),
        severity: Some(Severity::from_magnitude(magnitude)),
        external_link: props.url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_timestamp;
    use hazardline_api_client::endpoints::QuakeCollection;
    use hazardline_geo::Coordinate;

    fn features(json: &str) -> Vec<QuakeFeature> {
        let collection: QuakeCollection = serde_json::from_str(json).unwrap();
        collection.decode().items
    }

    const FEED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"id": "us1", "geometry": {"type": "Point", "coordinates": [-117.5, 35.7, 8.2]},
             "properties": {"mag": 7.1, "place": "Ridgecrest, CA", "time": 1714564800000,
                            "url": "https://earthquake.usgs.gov/earthquakes/eventpage/us1",
                            "title": "M 7.1 - Ridgecrest, CA"}},
            {"id": "us2", "geometry": {"type": "Point", "coordinates": [-122.0, 37.0, 5.0]},
             "properties": {"mag": 5.0, "place": "Santa Cruz, CA", "time": 1714564800000}},
            {"id": "us3", "geometry": {"type": "Point", "coordinates": [-150.0, 61.0, 30.0]},
             "properties": {"mag": 2.5, "place": "Anchorage, AK", "time": 1714564800000}},
            {"id": "us4", "geometry": {"type": "Point", "coordinates": [-155.0, 19.4, 1.0]},
             "properties": {"mag": 2.49, "place": "Volcano, HI", "time": 1714564800000}},
            {"id": "us5", "geometry": {"type": "Point", "coordinates": [-155.0, 19.4, 1.0]},
             "properties": {"mag": null, "place": "Volcano, HI"}}
        ]
    }"#;

    fn records() -> Vec<NormalizedRecord> {
        normalize_quakes(features(FEED), 2.5)
    }

    #[test]
    fn test_magnitude_floor_is_inclusive() {
        let ids: Vec<_> = records().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["us1", "us2", "us3"]);
    }

    #[test]
    fn test_categories_and_severities() {
        let records = records();
        assert_eq!(records[0].category.as_str(), "Major Earthquake");
        assert_eq!(records[0].severity, Some(Severity::Extreme));
        assert_eq!(records[1].category.as_str(), "Moderate Earthquake");
        assert_eq!(records[1].severity, Some(Severity::Severe));
        assert_eq!(records[2].category.as_str(), "Minor Earthquake");
        assert_eq!(records[2].severity, Some(Severity::Minor));
    }

    #[test]
    fn test_fields() {
        let records = records();
        let first = &records[0];
        assert_eq!(first.coordinate, Some(Coordinate::new(35.7, -117.5)));
        assert_eq!(first.title, "M 7.1 - Ridgecrest, CA");
        assert_eq!(first.source_label, USGS_LABEL);
        assert_eq!(first.occurred_at, parse_timestamp(Some("2024-05-01T12:00:00Z")));
        assert!(first.external_link.as_deref().unwrap().contains("us1"));

        assert_eq!(records[1].title, "M 5.0 - Santa Cruz, CA");
        assert!(records[1].external_link.is_none());
    }

    #[test]
    fn test_configurable_floor() {
        let records = normalize_quakes(features(FEED), 4.5);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_only_earthquake_events_are_kept() {
        let records = normalize_quakes(
            features(
                r#"{"features": [
                    {"id": "q1", "properties": {"mag": 3.0, "type": "earthquake"}},
                    {"id": "q2", "properties": {"mag": 3.0, "type": "quarry blast"}},
                    {"id": "q3", "properties": {"mag": 3.0, "type": "explosion"}},
                    {"id": "q4", "properties": {"mag": 3.0, "type": "Earthquake"}}
                ]}"#,
            ),
            2.5,
        );
        let ids: Vec<_> = records.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["q1", "q4"]);
    }

    #[test]
    fn test_magnitude_category_boundaries() {
        assert_eq!(magnitude_category(7.0), "Major Earthquake");
        assert_eq!(magnitude_category(6.99), "Moderate Earthquake");
        assert_eq!(magnitude_category(5.0), "Moderate Earthquake");
        assert_eq!(magnitude_category(4.99), "Minor Earthquake");
    }
}
