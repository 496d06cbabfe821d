//! Merging filtered sources into one feed

use crate::classify::{partition_of, Partition};
use crate::record::{FilteredRecord, SourceKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Filtered records keyed by source. Iteration order is the merge order.
pub type PerSource = BTreeMap<SourceKind, Vec<FilteredRecord>>;

/// The two halves of a feed, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partitions {
    /// Ordinary user reports
    pub community_reports: Vec<FilteredRecord>,
    /// Weather alerts, earthquakes and reposted alerts
    pub alerts_and_news: Vec<FilteredRecord>,
}

impl Partitions {
    /// Total records across both halves
    pub fn len(&self) -> usize {
        self.community_reports.len() + self.alerts_and_news.len()
    }

    /// True if both halves are empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition, sort newest-first and optionally truncate.
///
/// Records are concatenated community, weather, earthquake; the sort is
/// stable so equal timestamps keep that order. `limit` caps each partition
/// separately.
pub fn aggregate(per_source: PerSource, limit: Option<usize>) -> Partitions {
    let mut partitions = Partitions::default();

    for record in per_source.into_values().flatten() {
        match partition_of(&record.record) {
            Partition::CommunityReports => partitions.community_reports.push(record),
            Partition::AlertsAndNews => partitions.alerts_and_news.push(record),
        }
    }

    for half in [
        &mut partitions.community_reports,
        &mut partitions.alerts_and_news,
    ] {
        half.sort_by(|a, b| b.record.occurred_at.cmp(&a.record.occurred_at));
        if let Some(limit) = limit {
            half.truncate(limit);
        }
    }

    partitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures;

    fn unfiltered(kind: SourceKind, id: &str, minutes: i64) -> FilteredRecord {
        FilteredRecord::unfiltered(fixtures::of_kind(kind, id, 40.0, -75.0, minutes))
    }

    fn ids(records: &[FilteredRecord]) -> Vec<&str> {
        records.iter().map(|r| r.record.id.as_str()).collect()
    }

    fn sample() -> PerSource {
        let mut reposted = unfiltered(SourceKind::Community, "repost", 30);
        reposted.record.title = "Flood Warning issued by NWS for County X".into();

        let mut per_source = PerSource::new();
        per_source.insert(
            SourceKind::Earthquake,
            vec![unfiltered(SourceKind::Earthquake, "q1", 10)],
        );
        per_source.insert(
            SourceKind::Community,
            vec![
                unfiltered(SourceKind::Community, "c-old", 0),
                reposted,
                unfiltered(SourceKind::Community, "c-new", 20),
            ],
        );
        per_source.insert(
            SourceKind::WeatherAlert,
            vec![unfiltered(SourceKind::WeatherAlert, "w1", 10)],
        );
        per_source
    }

    #[test]
    fn test_partition_and_sort() {
        let feed = aggregate(sample(), None);
        assert_eq!(ids(&feed.community_reports), ["c-new", "c-old"]);
        // w1 and q1 tie; weather is merged before earthquakes.
        assert_eq!(ids(&feed.alerts_and_news), ["repost", "w1", "q1"]);
    }

    #[test]
    fn test_preview_truncates_each_partition() {
        let community: Vec<_> = (0..8)
            .map(|i| unfiltered(SourceKind::Community, &format!("c{i}"), i))
            .collect();
        let quakes: Vec<_> = (0..3)
            .map(|i| unfiltered(SourceKind::Earthquake, &format!("q{i}"), i))
            .collect();
        let mut per_source = PerSource::new();
        per_source.insert(SourceKind::Community, community);
        per_source.insert(SourceKind::Earthquake, quakes);

        let feed = aggregate(per_source.clone(), Some(5));
        assert_eq!(ids(&feed.community_reports), ["c7", "c6", "c5", "c4", "c3"]);
        assert_eq!(feed.alerts_and_news.len(), 3);

        let full = aggregate(per_source, None);
        assert_eq!(full.community_reports.len(), 8);
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let mut per_source = sample();
        per_source
            .get_mut(&SourceKind::Community)
            .unwrap()
            .extend((0..5).map(|i| unfiltered(SourceKind::Community, &format!("tie{i}"), 20)));

        let first = aggregate(per_source.clone(), None);
        let second = aggregate(per_source, None);
        assert_eq!(first, second);
        assert_eq!(
            ids(&first.community_reports),
            ["c-new", "tie0", "tie1", "tie2", "tie3", "tie4", "c-old"]
        );
    }

    #[test]
    fn test_empty_input() {
        let feed = aggregate(PerSource::new(), Some(5));
        assert!(feed.is_empty());
    }
}
