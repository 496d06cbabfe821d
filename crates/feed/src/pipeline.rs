//! The feed pipeline: resolve, fetch concurrently, filter, aggregate

use crate::adapters::{
    fetch_best_effort, CommunityAdapter, EarthquakeAdapter, Fetched, SourceAdapter,
    WeatherAlertAdapter,
};
use crate::aggregate::{aggregate, PerSource};
use crate::error::FeedResult;
use crate::filter::filter_records;
use crate::location::{resolve, OriginSpec, Profile, QueryOverride, RadiusBounds};
use crate::record::{DisasterType, FilteredRecord, SourceKind};
use hazardline_api_client::HazardClient;
use hazardline_core::config::FeedConfig;
use hazardline_geo::{distance_miles, Coordinate};
use hazardline_telemetry::{metrics, names, Timer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// How the feed will be presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedView {
    /// Bounded preview per partition
    #[default]
    Dashboard,
    /// Everything
    List,
    /// Everything that can be plotted
    Map,
}

impl FeedView {
    /// `true` is the dashboard preview, `false` the full list
    pub fn from_bounded_preview(bounded_preview: bool) -> Self {
        if bounded_preview {
            FeedView::Dashboard
        } else {
            FeedView::List
        }
    }

    /// Per-partition cap for this view
    pub fn limit(&self, preview_limit: usize) -> Option<usize> {
        match self {
            FeedView::Dashboard => Some(preview_limit),
            FeedView::List | FeedView::Map => None,
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedView::Dashboard => "dashboard",
            FeedView::List => "list",
            FeedView::Map => "map",
        }
    }
}

impl fmt::Display for FeedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dashboard" => Ok(FeedView::Dashboard),
            "list" => Ok(FeedView::List),
            "map" => Ok(FeedView::Map),
            other => Err(format!("unknown view '{other}' (expected dashboard, list or map)")),
        }
    }
}

/// One feed, ready for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    /// The origin records were filtered against
    pub origin: OriginSpec,
    /// The view this feed was shaped for
    pub view: FeedView,
    /// Ordinary user reports, newest first
    pub community_reports: Vec<FilteredRecord>,
    /// Alerts and news, newest first
    pub alerts_and_news: Vec<FilteredRecord>,
    /// Sources that could not be read this run
    pub failed_sources: Vec<SourceKind>,
    /// True when every source failed ("feed temporarily unavailable")
    pub unavailable: bool,
}

/// Pipeline settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedSettings {
    /// Radius bounds and default
    pub bounds: RadiusBounds,
    /// Per-partition cap for the dashboard preview
    pub preview_limit: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            bounds: RadiusBounds::default(),
            preview_limit: 5,
        }
    }
}

impl From<&FeedConfig> for FeedSettings {
    fn from(config: &FeedConfig) -> Self {
        Self {
            bounds: RadiusBounds::from(config),
            preview_limit: config.preview_limit,
        }
    }
}

/// Runs the feed pipeline over three adapters
pub struct FeedService<C, W, E> {
    community: C,
    weather: W,
    earthquakes: E,
    settings: FeedSettings,
}

/// The service wired to the real upstreams
pub type HttpFeedService = FeedService<CommunityAdapter, WeatherAlertAdapter, EarthquakeAdapter>;

impl HttpFeedService {
    /// Wire every adapter to one shared HTTP client
    pub fn from_client(client: HazardClient, config: &FeedConfig) -> Self {
        FeedService::new(
            CommunityAdapter::new(client.clone()),
            WeatherAlertAdapter::new(client.clone()),
            EarthquakeAdapter::new(client, config.min_earthquake_magnitude),
            FeedSettings::from(config),
        )
    }
}

impl<C, W, E> FeedService<C, W, E>
where
    C: SourceAdapter,
    W: SourceAdapter,
    E: SourceAdapter,
{
    /// Create a service from adapters and settings
    pub fn new(community: C, weather: W, earthquakes: E, settings: FeedSettings) -> Self {
        Self {
            community,
            weather,
            earthquakes,
            settings,
        }
    }

    /// Settings in use
    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    /// Resolve the origin a run would use, without fetching anything
    pub fn resolve_origin(&self, profile: Option<&Profile>, query: Option<&QueryOverride>) -> OriginSpec {
        resolve(profile, query, &self.settings.bounds)
    }

    /// Build a feed: `bounded_preview` selects the dashboard preview over
    /// the full list.
    pub async fn get_feed(
        &self,
        profile: Option<&Profile>,
        query: Option<&QueryOverride>,
        bounded_preview: bool,
    ) -> Feed {
        self.get_feed_view(profile, query, FeedView::from_bounded_preview(bounded_preview), &[])
            .await
    }

    /// Build a feed for a view, optionally keeping only community reports of
    /// the given types. Never fails: unreadable sources contribute nothing.
    pub async fn get_feed_view(
        &self,
        profile: Option<&Profile>,
        query: Option<&QueryOverride>,
        view: FeedView,
        categories: &[DisasterType],
    ) -> Feed {
        let timer = Timer::start(names::FEED_PIPELINE_MS);
        metrics().increment(names::FEED_RUNS);

        let origin = self.resolve_origin(profile, query);

        let (community, weather, earthquakes) = tokio::join!(
            fetch_best_effort(&self.community, &origin),
            fetch_best_effort(&self.weather, &origin),
            fetch_best_effort(&self.earthquakes, &origin),
        );
        let fetched = [community, weather, earthquakes];

        let failed_sources: Vec<SourceKind> =
            fetched.iter().filter(|f| f.failed).map(|f| f.kind).collect();
        let unavailable = failed_sources.len() == fetched.len();
        if unavailable {
            warn!("Every source failed; feed unavailable");
            metrics().increment(names::FEED_UNAVAILABLE);
        }

        let mut per_source = PerSource::new();
        for source in fetched {
            let kind = source.kind;
            let records = self.filter_source(source, &origin, view, categories);
            per_source.entry(kind).or_default().extend(records);
        }

        let partitions = aggregate(per_source, view.limit(self.settings.preview_limit));
        let elapsed = timer.stop();

        info!(
            view = %view,
            has_origin = origin.coordinate.is_some(),
            radius_miles = origin.radius_miles,
            community = partitions.community_reports.len(),
            alerts = partitions.alerts_and_news.len(),
            failed = failed_sources.len(),
            elapsed_ms = elapsed.as_millis(),
            "Feed built"
        );

        Feed {
            origin,
            view,
            community_reports: partitions.community_reports,
            alerts_and_news: partitions.alerts_and_news,
            failed_sources,
            unavailable,
        }
    }

    fn filter_source(
        &self,
        source: Fetched,
        origin: &OriginSpec,
        view: FeedView,
        categories: &[DisasterType],
    ) -> Vec<FilteredRecord> {
        let mut records = source.records;

        if source.kind == SourceKind::Community && !categories.is_empty() {
            records.retain(|r| {
                r.category
                    .disaster_type()
                    .is_some_and(|t| categories.contains(&t))
            });
        }

        // Map markers need a position even in the global view.
        if view == FeedView::Map {
            records.retain(|r| r.coordinate.is_some());
        }

        let outcome = filter_records(records, origin);
        metrics().increment_by(
            names::RECORDS_DROPPED_INVALID,
            (outcome.unlocated + outcome.invalid) as u64,
        );
        if origin.coordinate.is_some() {
            metrics().increment_by(names::RECORDS_WITHIN_RADIUS, outcome.records.len() as u64);
        }
        outcome.records
    }
}

/// Great-circle distance in miles between two coordinates
pub fn compute_distance(a: &Coordinate, b: &Coordinate) -> FeedResult<f64> {
    Ok(distance_miles(a, b)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stub::StubAdapter;
    use crate::location::OriginSource;
    use crate::record::{fixtures, Category, NormalizedRecord};

    fn service(
        community: Option<Vec<NormalizedRecord>>,
        weather: Option<Vec<NormalizedRecord>>,
        earthquakes: Option<Vec<NormalizedRecord>>,
    ) -> FeedService<StubAdapter, StubAdapter, StubAdapter> {
        let stub = |kind, records: Option<Vec<NormalizedRecord>>| match records {
            Some(r) => StubAdapter::ok(kind, r),
            None => StubAdapter::failing(kind),
        };
        FeedService::new(
            stub(SourceKind::Community, community),
            stub(SourceKind::WeatherAlert, weather),
            stub(SourceKind::Earthquake, earthquakes),
            FeedSettings::default(),
        )
    }

    fn home(radius: u32) -> Profile {
        Profile::new(Some(Coordinate::new(40.0, -75.0)), Some(radius))
    }

    #[tokio::test]
    async fn test_ten_mile_scenario() {
        let svc = service(
            Some(vec![
                fixtures::community("a", 40.05, -75.0, 0),
                fixtures::community("b", 40.5, -75.0, 0),
            ]),
            Some(vec![]),
            Some(vec![]),
        );

        let feed = svc.get_feed(Some(&home(10)), None, false).await;
        assert_eq!(feed.community_reports.len(), 1);
        assert_eq!(feed.community_reports[0].record.id, "a");
        let d = feed.community_reports[0].distance_miles.unwrap();
        assert!((d - 3.45).abs() < 0.01);
        assert!(feed.alerts_and_news.is_empty());
        assert!(!feed.unavailable);
    }

    #[tokio::test]
    async fn test_all_sources_failing_is_empty_not_error() {
        let svc = service(None, None, None);
        let feed = svc.get_feed(Some(&home(10)), None, true).await;

        assert!(feed.community_reports.is_empty());
        assert!(feed.alerts_and_news.is_empty());
        assert!(feed.unavailable);
        assert_eq!(
            feed.failed_sources,
            [SourceKind::Community, SourceKind::WeatherAlert, SourceKind::Earthquake]
        );
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_sources() {
        let svc = service(
            None,
            Some(vec![fixtures::of_kind(SourceKind::WeatherAlert, "w1", 40.01, -75.0, 0)]),
            None,
        );
        let feed = svc.get_feed(Some(&home(10)), None, true).await;

        assert_eq!(feed.alerts_and_news.len(), 1);
        assert!(!feed.unavailable);
        assert_eq!(feed.failed_sources, [SourceKind::Community, SourceKind::Earthquake]);
    }

    #[tokio::test]
    async fn test_reposted_alert_moves_to_alerts() {
        let mut repost = fixtures::community("r1", 40.01, -75.0, 0);
        repost.title = "Flood Warning issued by NWS for County X".into();
        let svc = service(Some(vec![repost]), Some(vec![]), Some(vec![]));

        let feed = svc.get_feed(Some(&home(10)), None, true).await;
        assert!(feed.community_reports.is_empty());
        assert_eq!(feed.alerts_and_news[0].record.id, "r1");
    }

    #[tokio::test]
    async fn test_sentinel_profile_is_global_view() {
        let profile = Profile {
            coordinate: Some(Coordinate::SENTINEL),
            radius_miles: Some(10),
        };
        let svc = service(
            Some(vec![
                fixtures::community("near", 40.0, -75.0, 0),
                fixtures::community("far", -33.9, 151.2, 1),
                fixtures::community("nowhere", 0.0, 0.0, 2),
            ]),
            Some(vec![]),
            Some(vec![]),
        );

        let feed = svc.get_feed(Some(&profile), None, false).await;
        assert!(feed.origin.coordinate.is_none());
        assert_eq!(feed.community_reports.len(), 3);
        assert!(feed.community_reports.iter().all(|r| r.distance_miles.is_none()));
    }

    #[tokio::test]
    async fn test_dashboard_preview_caps_at_five() {
        let community: Vec<_> = (0..9)
            .map(|i| fixtures::community(&format!("c{i}"), 40.0, -75.0, i))
            .collect();
        let svc = service(Some(community), Some(vec![]), Some(vec![]));

        let dashboard = svc.get_feed(Some(&home(10)), None, true).await;
        assert_eq!(dashboard.community_reports.len(), 5);
        assert_eq!(dashboard.community_reports[0].record.id, "c8");

        let list = svc.get_feed(Some(&home(10)), None, false).await;
        assert_eq!(list.community_reports.len(), 9);
    }

    #[tokio::test]
    async fn test_map_view_drops_unplottable_records() {
        let svc = service(
            Some(vec![
                fixtures::community("plotted", 40.0, -75.0, 0),
                fixtures::community("unplotted", 0.0, 0.0, 0),
            ]),
            Some(vec![]),
            Some(vec![]),
        );

        let feed = svc.get_feed_view(None, None, FeedView::Map, &[]).await;
        assert_eq!(feed.community_reports.len(), 1);
        assert_eq!(feed.community_reports[0].record.id, "plotted");
    }

    #[tokio::test]
    async fn test_category_filter_applies_to_community_only() {
        let mut fire = fixtures::community("fire", 40.0, -75.0, 0);
        fire.category = Category::from("Fire");
        let flood = fixtures::community("flood", 40.0, -75.0, 0);
        let quake = fixtures::of_kind(SourceKind::Earthquake, "q1", 40.0, -75.0, 0);
        let svc = service(Some(vec![fire, flood]), Some(vec![]), Some(vec![quake]));

        let feed = svc
            .get_feed_view(Some(&home(10)), None, FeedView::List, &[DisasterType::Fire])
            .await;
        assert_eq!(feed.community_reports.len(), 1);
        assert_eq!(feed.community_reports[0].record.id, "fire");
        assert_eq!(feed.alerts_and_news.len(), 1);
    }

    #[tokio::test]
    async fn test_query_override_origin() {
        let svc = service(
            Some(vec![
                fixtures::community("la", 34.06, -118.25, 0),
                fixtures::community("philly", 40.0, -75.0, 0),
            ]),
            Some(vec![]),
            Some(vec![]),
        );
        let query = QueryOverride::new()
            .with_lat("34.05")
            .with_lng("-118.25")
            .with_radius("5");

        let feed = svc.get_feed(Some(&home(10)), Some(&query), false).await;
        assert_eq!(feed.origin.source, OriginSource::QueryOverride);
        assert_eq!(feed.origin.radius_miles, 5);
        assert_eq!(feed.community_reports.len(), 1);
        assert_eq!(feed.community_reports[0].record.id, "la");
    }

    #[tokio::test]
    async fn test_feed_is_stable_across_runs() {
        let records: Vec<_> = (0..6)
            .map(|i| fixtures::community(&format!("t{i}"), 40.0, -75.0, 0))
            .collect();
        let svc = service(Some(records), Some(vec![]), Some(vec![]));

        let first = svc.get_feed(Some(&home(10)), None, false).await;
        let second = svc.get_feed(Some(&home(10)), None, false).await;
        assert_eq!(first, second);
    }

    #[test]
    fn test_feed_json_uses_camel_case() {
        let feed = Feed {
            origin: OriginSpec::unlocated(50),
            view: FeedView::Dashboard,
            community_reports: vec![],
            alerts_and_news: vec![],
            failed_sources: vec![SourceKind::WeatherAlert],
            unavailable: false,
        };
        let json = serde_json::to_value(&feed).unwrap();
        assert_eq!(json["origin"]["radiusMiles"], 50);
        assert_eq!(json["failedSources"][0], "weather-alert");
        assert!(json["communityReports"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_compute_distance() {
        let a = Coordinate::new(40.0, -75.0);
        let b = Coordinate::new(40.5, -75.0);
        let d = compute_distance(&a, &b).unwrap();
        assert!((d - 34.546).abs() < 0.01);
        assert!(compute_distance(&a, &Coordinate::new(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn test_feed_view_parse() {
        assert_eq!("MAP".parse::<FeedView>().unwrap(), FeedView::Map);
        assert!("grid".parse::<FeedView>().is_err());
        assert_eq!(FeedView::from_bounded_preview(true), FeedView::Dashboard);
        assert_eq!(FeedView::Dashboard.limit(5), Some(5));
        assert_eq!(FeedView::Map.limit(5), None);
    }
}
