//! Radius filtering of normalised records

use crate::location::OriginSpec;
use crate::record::{FilteredRecord, NormalizedRecord};
use hazardline_geo::filter_within_radius;
use tracing::debug;

/// Result of filtering one source's records
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Records kept, in input order
    pub records: Vec<FilteredRecord>,
    /// Dropped for having no coordinate
    pub unlocated: usize,
    /// Dropped because the coordinate failed validation
    pub invalid: usize,
    /// Dropped for being beyond the radius
    pub out_of_range: usize,
}

/// Keep the records within the origin's radius, annotated with distance.
///
/// With no origin coordinate every record is kept, unannotated. Otherwise a
/// record without a coordinate is dropped, and one at exactly the radius is
/// kept.
pub fn filter_records(records: Vec<NormalizedRecord>, origin: &OriginSpec) -> FilterOutcome {
    let Some(center) = origin.coordinate else {
        return FilterOutcome {
            records: records.into_iter().map(FilteredRecord::unfiltered).collect(),
            ..FilterOutcome::default()
        };
    };

    let outcome = filter_within_radius(records, &center, f64::from(origin.radius_miles));
    if outcome.dropped() > 0 {
        debug!(
            unlocated = outcome.unlocated,
            invalid = outcome.invalid,
            out_of_range = outcome.out_of_range,
            radius_miles = origin.radius_miles,
            "Records dropped by radius filter"
        );
    }

    FilterOutcome {
        records: outcome
            .kept
            .into_iter()
            .map(|w| FilteredRecord {
                record: w.item,
                distance_miles: Some(w.distance_miles),
            })
            .collect(),
        unlocated: outcome.unlocated,
        invalid: outcome.invalid,
        out_of_range: outcome.out_of_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::OriginSource;
    use crate::record::fixtures;
    use hazardline_geo::{haversine_distance_miles, Coordinate};
    use proptest::prelude::*;

    fn origin(radius: u32) -> OriginSpec {
        OriginSpec::at(Coordinate::new(40.0, -75.0), radius, OriginSource::Profile)
    }

    #[test]
    fn test_ten_mile_scenario() {
        let records = vec![
            fixtures::community("a", 40.05, -75.0, 0),
            fixtures::community("b", 40.5, -75.0, 0),
        ];
        let outcome = filter_records(records, &origin(10));

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].record.id, "a");
        let d = outcome.records[0].distance_miles.unwrap();
        assert!((d - 3.4546).abs() < 0.01, "got {d}");
        assert_eq!(outcome.out_of_range, 1);
    }

    #[test]
    fn test_no_origin_returns_everything_unannotated() {
        let records = vec![
            fixtures::community("a", 40.05, -75.0, 0),
            fixtures::community("b", 0.0, 0.0, 0),
            fixtures::community("c", -33.9, 151.2, 0),
        ];
        let outcome = filter_records(records, &OriginSpec::unlocated(10));

        assert_eq!(outcome.records.len(), 3);
        assert!(outcome.records.iter().all(|r| r.distance_miles.is_none()));
    }

    #[test]
    fn test_unlocated_records_are_dropped_with_origin() {
        let mut bad = fixtures::community("bad", 40.0, -75.0, 0);
        bad.coordinate = Some(Coordinate::new(f64::NAN, -75.0));
        let records = vec![
            fixtures::community("none", 0.0, 0.0, 0),
            bad,
            fixtures::community("ok", 40.0, -75.0, 0),
        ];
        let outcome = filter_records(records, &origin(10));

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.unlocated, 1);
        assert_eq!(outcome.invalid, 1);
        assert_eq!(outcome.records[0].distance_miles, Some(0.0));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let center = Coordinate::new(40.0, -75.0);
        // Bisect for the northernmost latitude still within 69 miles.
        let (mut lo, mut hi) = (40.0f64, 42.0f64);
        for _ in 0..100 {
            let mid = (lo + hi) / 2.0;
            if haversine_distance_miles(&center, &Coordinate::new(mid, -75.0)) <= 69.0 {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let mut record = fixtures::community("edge", 40.0, -75.0, 0);
        record.coordinate = Some(Coordinate::new(lo, -75.0));
        let kept = filter_records(vec![record.clone()], &origin(69));
        assert_eq!(kept.records.len(), 1);
        assert!((kept.records[0].distance_miles.unwrap() - 69.0).abs() < 1e-6);

        record.coordinate = Some(Coordinate::new(lo + 1e-4, -75.0));
        let beyond = filter_records(vec![record], &origin(69));
        assert!(beyond.records.is_empty());
        assert_eq!(beyond.out_of_range, 1);
    }

    #[test]
    fn test_order_is_preserved() {
        let records: Vec<_> = (0..20)
            .map(|i| fixtures::community(&format!("r{i}"), 40.0 + f64::from(i) * 0.001, -75.0, 0))
            .collect();
        let outcome = filter_records(records, &origin(50));
        let ids: Vec<_> = outcome.records.iter().map(|r| r.record.id.clone()).collect();
        let expected: Vec<_> = (0..20).map(|i| format!("r{i}")).collect();
        assert_eq!(ids, expected);
    }

    proptest! {
        #[test]
        fn prop_smaller_radius_is_subset(
            points in prop::collection::vec((39.0f64..41.0, -76.0f64..-74.0), 1..40),
            small in 1u32..60,
            extra in 0u32..60,
        ) {
            let records: Vec<_> = points
                .iter()
                .enumerate()
                .map(|(i, (lat, lng))| fixtures::community(&i.to_string(), *lat, *lng, 0))
                .collect();
            let wide = filter_records(records, &origin(small + extra));
            let narrow_input: Vec<_> = wide.records.iter().map(|r| r.record.clone()).collect();
            let narrow = filter_records(narrow_input, &origin(small));

            for r in &narrow.records {
                prop_assert!(r.distance_miles.unwrap() <= f64::from(small));
            }
            for r in &wide.records {
                let d = r.distance_miles.unwrap();
                let kept = narrow.records.iter().any(|n| n.record.id == r.record.id);
                prop_assert_eq!(kept, d <= f64::from(small));
            }
        }
    }
}
