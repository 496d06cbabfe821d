//! Alert-like community records
//!
//! Some community posts are reposts of official alerts. They go with the
//! alerts so they don't count twice as user reports. This is string
//! matching and will misfile a genuine report that mentions "NWS".

use crate::adapters::{NWS_LABEL, USGS_LABEL};
use crate::record::{NormalizedRecord, SourceKind};
use serde::Serialize;

/// Which half of the feed a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Partition {
    /// Ordinary user reports
    CommunityReports,
    /// Weather alerts, earthquakes and reposted alerts
    AlertsAndNews,
}

/// True if a record's label or title marks it as an official alert.
///
/// Case-sensitive: the label is one of the official source names or
/// contains "NWS", or the title contains both "issued" and "NWS".
pub fn is_alert_like(record: &NormalizedRecord) -> bool {
    let label = record.source_label.as_str();
    if label == NWS_LABEL || label == USGS_LABEL || label.contains("NWS") {
        return true;
    }
    record.title.contains("issued") && record.title.contains("NWS")
}

/// Partition a record. Only community records are inspected; everything
/// else is always an alert.
pub fn partition_of(record: &NormalizedRecord) -> Partition {
    match record.source_kind {
        SourceKind::Community if !is_alert_like(record) => Partition::CommunityReports,
        _ => Partition::AlertsAndNews,
    }
}
