//! User-submitted posts

use super::{keep_readable, SourceAdapter};
use crate::error::{FeedError, FeedResult};
use crate::location::OriginSpec;
use crate::record::{parse_timestamp, Category, DisasterType, NormalizedRecord, Severity, SourceKind};
use hazardline_api_client::endpoints::PostDto;
use hazardline_api_client::HazardClient;
use hazardline_geo::parse_point;

/// Label for posts without an explicit `source`
pub const COMMUNITY_LABEL: &str = "Community";

/// Reads every post from the posts store
#[derive(Clone)]
pub struct CommunityAdapter {
    client: HazardClient,
}

impl CommunityAdapter {
    /// Create an adapter over a shared client
    pub fn new(client: HazardClient) -> Self {
        Self { client }
    }
}

impl SourceAdapter for CommunityAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Community
    }

    async fn fetch(&self, _origin: &OriginSpec) -> FeedResult<Vec<NormalizedRecord>> {
        let posts = self
            .client
            .posts()
            .list()
            .await
            .map_err(|e| FeedError::source_fetch(SourceKind::Community, e))?;
        Ok(keep_readable(SourceKind::Community, posts)
            .into_iter()
            .map(normalize_post)
            .collect())
    }
}

/// Map a stored post to a record.
///
/// The disaster type is kept verbatim; a missing one is `other`. A sentinel
/// or malformed point leaves the record without a coordinate.
pub fn normalize_post(post: PostDto) -> NormalizedRecord {
    let category = post
        .disaster_type
        .filter(|t| !t.trim().is_empty())
        .map(Category::from)
        .unwrap_or_else(|| Category::known(DisasterType::Other));

    NormalizedRecord {
        coordinate: parse_point(&post.location),
        occurred_at: parse_timestamp(post.created_at.as_deref()),
        source_label: post
            .source
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| COMMUNITY_LABEL.to_string()),
        severity: post.severity.as_deref().map(Severity::parse),
        external_link: post.link,
        id: post.id,
        title: post.title,
        description: post.description,
        category,
        source_kind: SourceKind::Community,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hazardline_geo::Coordinate;

    fn post(json: &str) -> PostDto {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_normalize_geojson_post() {
        let record = normalize_post(post(
            r#"{
                "_id": "p1",
                "title": "Creek over the road",
                "description": "Mill Rd closed",
                "disasterType": "flood",
                "location": {"type": "Point", "coordinates": [-75.0, 40.05]},
                "createdAt": "2024-05-01T12:00:00Z",
                "severity": "Moderate"
            }"#,
        ));

        assert_eq!(record.source_kind, SourceKind::Community);
        assert_eq!(record.source_label, COMMUNITY_LABEL);
        assert_eq!(record.category.disaster_type(), Some(DisasterType::Flood));
        assert_eq!(record.coordinate, Some(Coordinate::new(40.05, -75.0)));
        assert_eq!(record.severity, Some(Severity::Moderate));
        assert_eq!(record.occurred_at, parse_timestamp(Some("2024-05-01T12:00:00Z")));
    }

    #[test]
    fn test_sentinel_and_malformed_points_are_absent() {
        let sentinel = normalize_post(post(
            r#"{"_id": "p2", "location": {"type": "Point", "coordinates": [0, 0]}}"#,
        ));
        assert!(sentinel.coordinate.is_none());

        let junk = normalize_post(post(r#"{"_id": "p3", "location": "somewhere downtown"}"#));
        assert!(junk.coordinate.is_none());

        let missing = normalize_post(post(r#"{"_id": "p4"}"#));
        assert!(missing.coordinate.is_none());
    }

    #[test]
    fn test_wkt_and_object_points() {
        let wkt = normalize_post(post(r#"{"_id": "p5", "location": "POINT(-75.0 40.0)"}"#));
        assert_eq!(wkt.coordinate, Some(Coordinate::new(40.0, -75.0)));

        let obj = normalize_post(post(
            r#"{"_id": "p6", "location": {"lat": "40.0", "lng": "-75.0"}}"#,
        ));
        assert_eq!(obj.coordinate, Some(Coordinate::new(40.0, -75.0)));
    }

    #[test]
    fn test_free_text_type_and_missing_type() {
        let free = normalize_post(post(r#"{"_id": "p7", "disasterType": "Landslide"}"#));
        assert_eq!(free.category.as_str(), "Landslide");
        assert_eq!(free.category.disaster_type(), None);

        let none = normalize_post(post(r#"{"_id": "p8"}"#));
        assert_eq!(none.category, Category::known(DisasterType::Other));
    }

    #[test]
    fn test_disaster_type_text_is_verbatim() {
        let record = normalize_post(post(r#"{"_id": "p10", "disasterType": "Flood"}"#));
        assert_eq!(record.category.as_str(), "Flood");
        assert_eq!(record.category.disaster_type(), Some(DisasterType::Flood));
    }

    #[test]
    fn test_reposted_alert_keeps_source_label() {
        let record = normalize_post(post(
            r#"{"_id": "p9", "title": "Tornado Warning", "source": "National Weather Service"}"#,
        ));
        assert_eq!(record.source_label, "National Weather Service");
        assert_eq!(record.source_kind, SourceKind::Community);
    }
}
