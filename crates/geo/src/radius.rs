//! Radius filtering with optional parallelism.
//!
//! Works over anything implementing [`Located`], so the feed crate can filter
//! its own record type without this crate knowing about it. Input order is
//! preserved in the output, including on the parallel path.

use crate::{distance_miles, Coordinate};

/// Something that may have a position on the map.
pub trait Located {
    /// The item's coordinate, or `None` when it has no usable location.
    fn location(&self) -> Option<Coordinate>;
}

impl Located for Coordinate {
    fn location(&self) -> Option<Coordinate> {
        Some(*self)
    }
}

/// An item that passed the radius check, with its distance from the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct WithinRadius<T> {
    /// The original item
    pub item: T,
    /// Great-circle distance from the origin, in miles
    pub distance_miles: f64,
}

/// Result of one radius filtering pass.
#[derive(Debug, Clone)]
pub struct RadiusOutcome<T> {
    /// Items within the radius, in input order
    pub kept: Vec<WithinRadius<T>>,
    /// Items dropped because they had no location
    pub unlocated: usize,
    /// Items dropped because their location failed validation
    pub invalid: usize,
    /// Items dropped because they were farther than the radius
    pub out_of_range: usize,
}

impl<T> RadiusOutcome<T> {
    /// Total number of dropped items.
    pub fn dropped(&self) -> usize {
        self.unlocated + self.invalid + self.out_of_range
    }
}

enum Verdict {
    Keep(f64),
    Unlocated,
    Invalid,
    OutOfRange,
}

#[inline]
fn judge<T: Located>(origin: &Coordinate, radius_miles: f64, item: &T) -> Verdict {
    let Some(location) = item.location() else {
        return Verdict::Unlocated;
    };
    match distance_miles(origin, &location) {
        // Boundary is inclusive.
        Ok(d) if d <= radius_miles => Verdict::Keep(d),
        Ok(_) => Verdict::OutOfRange,
        Err(_) => Verdict::Invalid,
    }
}

/// Keep the items within `radius_miles` of `origin`, annotated with distance.
///
/// # Example
/// ```
/// use hazardline_geo::{filter_within_radius, Coordinate};
///
/// let origin = Coordinate::new(40.0, -75.0);
/// let points = vec![Coordinate::new(40.05, -75.0), Coordinate::new(40.5, -75.0)];
///
/// let outcome = filter_within_radius(points, &origin, 10.0);
/// assert_eq!(outcome.kept.len(), 1);
/// assert_eq!(outcome.out_of_range, 1);
/// ```
pub fn filter_within_radius<T>(items: Vec<T>, origin: &Coordinate, radius_miles: f64) -> RadiusOutcome<T>
where
    T: Located + Send,
{
    #[cfg(feature = "parallel")]
    let judged: Vec<(T, Verdict)> = {
        use rayon::prelude::*;
        items
            .into_par_iter()
            .map(|item| {
                let verdict = judge(origin, radius_miles, &item);
                (item, verdict)
            })
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let judged: Vec<(T, Verdict)> = items
        .into_iter()
        .map(|item| {
            let verdict = judge(origin, radius_miles, &item);
            (item, verdict)
        })
        .collect();

    let mut outcome = RadiusOutcome {
        kept: Vec::with_capacity(judged.len()),
        unlocated: 0,
        invalid: 0,
        out_of_range: 0,
    };

    for (item, verdict) in judged {
        match verdict {
            Verdict::Keep(distance_miles) => outcome.kept.push(WithinRadius {
                item,
                distance_miles,
            }),
            Verdict::Unlocated => outcome.unlocated += 1,
            Verdict::Invalid => outcome.invalid += 1,
            Verdict::OutOfRange => outcome.out_of_range += 1,
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Pin {
        id: u32,
        at: Option<Coordinate>,
    }

    impl Located for Pin {
        fn location(&self) -> Option<Coordinate> {
            self.at
        }
    }

    fn pin(id: u32, lat: f64, lng: f64) -> Pin {
        Pin {
            id,
            at: Some(Coordinate::new(lat, lng)),
        }
    }

    const ORIGIN: Coordinate = Coordinate::new(40.0, -75.0);

    #[test]
    fn test_keeps_near_and_drops_far() {
        let pins = vec![pin(1, 40.05, -75.0), pin(2, 40.5, -75.0)];
        let outcome = filter_within_radius(pins, &ORIGIN, 10.0);

        assert_eq!(outcome.kept.len(), 1);
        assert_eq!(outcome.kept[0].item.id, 1);
        assert!((outcome.kept[0].distance_miles - 3.4546).abs() < 0.001);
        assert_eq!(outcome.out_of_range, 1);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let edge = Coordinate::new(40.1, -75.0);
        let exact = distance_miles(&ORIGIN, &edge).unwrap();
        let pins = vec![
            Pin { id: 1, at: Some(edge) },
            pin(2, 40.1 + 1e-6, -75.0),
        ];

        let outcome = filter_within_radius(pins, &ORIGIN, exact);
        let ids: Vec<u32> = outcome.kept.iter().map(|w| w.item.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_unlocated_and_invalid_are_counted() {
        let pins = vec![
            Pin { id: 1, at: None },
            pin(2, f64::NAN, -75.0),
            pin(3, 40.0, -75.0),
        ];
        let outcome = filter_within_radius(pins, &ORIGIN, 5.0);

        assert_eq!(outcome.kept.len(), 1);
        assert_eq!(outcome.kept[0].distance_miles, 0.0);
        assert_eq!(outcome.unlocated, 1);
        assert_eq!(outcome.invalid, 1);
        assert_eq!(outcome.dropped(), 2);
    }

    #[test]
    fn test_preserves_input_order() {
        let pins: Vec<Pin> = (0..500)
            .map(|i| pin(i, 40.0 + (i % 7) as f64 * 0.01, -75.0))
            .collect();
        let outcome = filter_within_radius(pins, &ORIGIN, 100.0);
        let ids: Vec<u32> = outcome.kept.iter().map(|w| w.item.id).collect();
        let expected: Vec<u32> = (0..500).collect();
        assert_eq!(ids, expected);
    }

    proptest! {
        #[test]
        fn prop_smaller_radius_is_subset(
            points in prop::collection::vec((39.0f64..41.0, -76.0f64..-74.0), 0..40),
            radius in 1.0f64..120.0,
            shrink in 0.0f64..1.0,
        ) {
            let pins: Vec<Pin> = points
                .iter()
                .enumerate()
                .map(|(i, (lat, lng))| pin(i as u32, *lat, *lng))
                .collect();
            let smaller = radius * shrink;

            let wide = filter_within_radius(pins.clone(), &ORIGIN, radius);
            let narrow = filter_within_radius(pins, &ORIGIN, smaller);

            for kept in &narrow.kept {
                prop_assert!(kept.distance_miles <= smaller);
                prop_assert!(wide.kept.iter().any(|w| w.item.id == kept.item.id));
            }
            for kept in &wide.kept {
                if kept.distance_miles > smaller {
                    prop_assert!(!narrow.kept.iter().any(|w| w.item.id == kept.item.id));
                }
            }
        }
    }
}
