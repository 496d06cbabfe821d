//! Source adapters
//!
//! Each adapter fetches one upstream and normalises it into
//! [`NormalizedRecord`]s. Normalisation lives in plain functions next to
//! each adapter so it can be tested against JSON fixtures without a network.
//!
//! | Adapter | Upstream | Source kind |
//! |---------|----------|-------------|
//! | [`CommunityAdapter`] | posts store | `community` |
//! | [`WeatherAlertAdapter`] | NWS active alerts | `weather-alert` |
//! | [`EarthquakeAdapter`] | USGS summary feed | `earthquake` |

mod community;
mod earthquake;
mod weather;

pub use community::{normalize_post, CommunityAdapter, COMMUNITY_LABEL};
pub use earthquake::{magnitude_category, normalize_quake, normalize_quakes, EarthquakeAdapter, USGS_LABEL};
pub use weather::{normalize_alert, normalize_alerts, WeatherAlertAdapter, NWS_LABEL};

use crate::error::{FeedError, FeedResult};
use crate::location::OriginSpec;
use crate::record::{NormalizedRecord, SourceKind};
use hazardline_api_client::endpoints::Decoded;
use hazardline_telemetry::{metrics, names};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// One upstream feed, normalised
pub trait SourceAdapter: Send + Sync {
    /// Which source this adapter reads
    fn kind(&self) -> SourceKind;

    /// Fetch and normalise every record the upstream currently has.
    ///
    /// The origin is informational; upstreams are never asked to filter.
    fn fetch(
        &self,
        origin: &OriginSpec,
    ) -> impl Future<Output = FeedResult<Vec<NormalizedRecord>>> + Send;
}

/// What one adapter produced during a feed run
#[derive(Debug, Clone)]
pub struct Fetched {
    /// Which adapter
    pub kind: SourceKind,
    /// Normalised records; empty when the fetch failed
    pub records: Vec<NormalizedRecord>,
    /// True if the upstream could not be read
    pub failed: bool,
    /// Wall time of the fetch
    pub elapsed: Duration,
}

/// Keep the readable elements of one upstream collection. Each unreadable
/// one is logged and counted, never failing the source.
pub fn keep_readable<T>(kind: SourceKind, decoded: Decoded<T>) -> Vec<T> {
    if !decoded.rejected.is_empty() {
        for rejected in &decoded.rejected {
            let err = FeedError::malformed(kind, rejected.index, &rejected.error);
            debug!(source = %kind, error = %err, "Skipping unreadable record");
        }
        metrics().increment_by(names::RECORDS_DROPPED_MALFORMED, decoded.rejected.len() as u64);
    }
    decoded.items
}

/// Run an adapter, turning a failure into an empty result.
pub async fn fetch_best_effort<A: SourceAdapter>(adapter: &A, origin: &OriginSpec) -> Fetched {
    let kind = adapter.kind();
    let start = Instant::now();
    let result = adapter.fetch(origin).await;
    let elapsed = start.elapsed();
    metrics().histogram(names::SOURCE_FETCH_MS, elapsed.as_secs_f64() * 1000.0);

    match result {
        Ok(records) => {
            debug!(source = %kind, count = records.len(), elapsed_ms = elapsed.as_millis(), "Source fetched");
            metrics().increment_by(names::RECORDS_FETCHED, records.len() as u64);
            Fetched {
                kind,
                records,
                failed: false,
                elapsed,
            }
        }
        Err(e) => {
            warn!(source = %kind, error = %e, "Source unavailable, continuing without it");
            metrics().increment(names::SOURCE_FETCH_FAILURES);
            Fetched {
                kind,
                records: Vec::new(),
                failed: true,
                elapsed,
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::stub::StubAdapter;
    use super::*;
    use crate::record::fixtures;
    use hazardline_api_client::endpoints::{PostDto, PostsEnvelope};

    #[tokio::test]
    async fn test_best_effort_passes_records_through() {
        let adapter = StubAdapter::ok(
            SourceKind::Community,
            vec![fixtures::community("p1", 40.0, -75.0, 0)],
        );
        let fetched = fetch_best_effort(&adapter, &OriginSpec::unlocated(50)).await;
        assert!(!fetched.failed);
        assert_eq!(fetched.records.len(), 1);
        assert_eq!(fetched.kind, SourceKind::Community);
    }

    #[tokio::test]
    async fn test_best_effort_swallows_failure() {
        let adapter = StubAdapter::failing(SourceKind::WeatherAlert);
        let fetched = fetch_best_effort(&adapter, &OriginSpec::unlocated(50)).await;
        assert!(fetched.failed);
        assert!(fetched.records.is_empty());
    }

    #[test]
    fn test_unreadable_post_only_costs_itself() {
        let envelope: PostsEnvelope = serde_json::from_str(
            r#"[
                {"_id": "good1", "title": "Creek rising",
                 "location": {"type": "Point", "coordinates": [-75.0, 40.05]}},
                {"title": "no id"},
                {"_id": "good2", "title": "Smoke", "description": null}
            ]"#,
        )
        .unwrap();

        let posts: Vec<PostDto> = keep_readable(SourceKind::Community, envelope.into_posts());
        let records: Vec<_> = posts.into_iter().map(normalize_post).collect();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["good1", "good2"]);
        assert!(records[0].coordinate.is_some());
        assert_eq!(records[1].description, "");
    }
}
