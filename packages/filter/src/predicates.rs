//! Row-level predicates used by the filter engine.

use chrono::NaiveDate;

/// Inclusive range membership.
fn within<T: PartialOrd>(value: T, lo: T, hi: T) -> bool {
    lo <= value && value <= hi
}

/// Whether a bloom period overlaps the query window.
///
/// A tree is blooming during the window when any of these holds, all
/// inclusive: the query start falls in the bloom period, the query end
/// falls in the bloom period, the bloom start falls in the query window,
/// or the bloom end falls in the query window.
///
/// For well-formed intervals this is plain interval intersection. Reversed
/// intervals are not rejected up front; they pass whenever one of the four
/// clauses happens to hold.
#[must_use]
pub fn bloom_overlaps(
    bloom_start: NaiveDate,
    bloom_end: NaiveDate,
    query_start: NaiveDate,
    query_end: NaiveDate,
) -> bool {
    within(query_start, bloom_start, bloom_end)
        || within(query_end, bloom_start, bloom_end)
        || within(bloom_start, query_start, query_end)
        || within(bloom_end, query_start, query_end)
}

/// Whether a native diameter lies in `[min, max]`.
#[must_use]
pub fn diameter_within(diameter: f64, min: f64, max: f64) -> bool {
    within(diameter, min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, m, d).unwrap()
    }

    #[test]
    fn includes_bloom_covering_query_start() {
        assert!(bloom_overlaps(
            date(3, 1),
            date(3, 15),
            date(3, 10),
            date(4, 1)
        ));
    }

    #[test]
    fn excludes_bloom_ending_before_query() {
        assert!(!bloom_overlaps(
            date(3, 1),
            date(3, 15),
            date(4, 1),
            date(4, 30)
        ));
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(bloom_overlaps(date(3, 1), date(3, 15), date(3, 15), date(3, 20)));
        assert!(bloom_overlaps(date(3, 1), date(3, 15), date(2, 20), date(3, 1)));
        assert!(!bloom_overlaps(date(3, 1), date(3, 15), date(3, 16), date(3, 20)));
    }

    #[test]
    fn includes_bloom_inside_query() {
        assert!(bloom_overlaps(date(3, 5), date(3, 10), date(3, 1), date(3, 31)));
    }

    #[test]
    fn includes_query_inside_bloom() {
        assert!(bloom_overlaps(date(3, 1), date(3, 31), date(3, 5), date(3, 10)));
    }

    #[test]
    fn reversed_bloom_period_inside_query_still_matches() {
        assert!(bloom_overlaps(date(3, 10), date(3, 1), date(3, 5), date(3, 15)));
        assert!(!bloom_overlaps(date(3, 10), date(3, 1), date(4, 1), date(4, 15)));
    }

    #[test]
    fn reversed_query_window_matches_only_through_its_endpoints() {
        // Start inside the bloom.
        assert!(bloom_overlaps(date(3, 1), date(3, 15), date(3, 14), date(3, 5)));
        // End inside the bloom.
        assert!(bloom_overlaps(date(3, 1), date(3, 15), date(3, 20), date(3, 10)));
        // Neither endpoint inside, and an empty window contains no bloom date.
        assert!(!bloom_overlaps(date(3, 1), date(3, 15), date(3, 25), date(3, 20)));
        assert!(!bloom_overlaps(date(3, 5), date(3, 10), date(3, 31), date(3, 1)));
    }

    #[test]
    fn matches_interval_intersection_for_well_formed_intervals() {
        let base = date(3, 1);
        let days: Vec<NaiveDate> = (0..16)
            .map(|i| base.checked_add_days(Days::new(i)).unwrap())
            .collect();

        for (i, &bs) in days.iter().enumerate() {
            for &be in &days[i..] {
                for (j, &qs) in days.iter().enumerate() {
                    for &qe in &days[j..] {
                        let intersects = bs <= qe && qs <= be;
                        assert_eq!(
                            bloom_overlaps(bs, be, qs, qe),
                            intersects,
                            "bloom {bs}..{be} query {qs}..{qe}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn diameter_bounds_are_inclusive() {
        assert!(diameter_within(10.0, 10.0, 20.0));
        assert!(diameter_within(20.0, 10.0, 20.0));
        assert!(!diameter_within(20.1, 10.0, 20.0));
        assert!(!diameter_within(f64::NAN, 0.0, 20.0));
    }
}
