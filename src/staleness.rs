use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One rung of the staleness ladder: an elapsed-day count of at least
/// `min_days` earns this badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StalenessThreshold {
    pub label: String,
    pub min_days: i64,
}

/// Default ladder, sorted descending as the evaluator requires.
pub fn default_staleness_thresholds() -> Vec<StalenessThreshold> {
    vec![
        StalenessThreshold { label: "Abandoned".to_string(), min_days: 30 },
        StalenessThreshold { label: "Stale".to_string(), min_days: 14 },
        StalenessThreshold { label: "Aging".to_string(), min_days: 7 },
    ]
}

/// Map the elapsed time since `reference` to a staleness badge.
///
/// Precondition: `thresholds` is sorted descending by `min_days` (the
/// config loader enforces this). The first threshold whose `min_days <=
/// elapsed days` wins; anything newer than the smallest threshold is
/// fresh and yields `None`. An empty ladder always yields `None`.
pub fn staleness_badge<'a>(
    reference: DateTime<Utc>,
    thresholds: &'a [StalenessThreshold],
    now: DateTime<Utc>,
) -> Option<&'a str> {
    let elapsed_days = (now - reference).num_days(); // floor of whole days

    thresholds
        .iter()
        .find(|t| t.min_days <= elapsed_days)
        .map(|t| t.label.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(days_ago: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap();
        (now - Duration::days(days_ago), now)
    }

    #[test]
    fn test_boundary_exactness() {
        let thresholds = default_staleness_thresholds();
        let (reference, now) = at(7);
        assert_eq!(staleness_badge(reference, &thresholds, now), Some("Aging"));
        let (reference, now) = at(14);
        assert_eq!(staleness_badge(reference, &thresholds, now), Some("Stale"));
        let (reference, now) = at(30);
        assert_eq!(staleness_badge(reference, &thresholds, now), Some("Abandoned"));
    }

    #[test]
    fn test_fresh_below_smallest_threshold() {
        let thresholds = default_staleness_thresholds();
        let (reference, now) = at(6);
        assert_eq!(staleness_badge(reference, &thresholds, now), None);
    }

    #[test]
    fn test_partial_day_floors() {
        let thresholds = default_staleness_thresholds();
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap();
        // 6 days 23 hours floors to 6 days: still fresh
        let reference = now - Duration::days(6) - Duration::hours(23);
        assert_eq!(staleness_badge(reference, &thresholds, now), None);
    }

    #[test]
    fn test_empty_ladder_yields_none() {
        let (reference, now) = at(100);
        assert_eq!(staleness_badge(reference, &[], now), None);
    }

    #[test]
    fn test_far_past_gets_largest_badge() {
        let thresholds = default_staleness_thresholds();
        let (reference, now) = at(365);
        assert_eq!(staleness_badge(reference, &thresholds, now), Some("Abandoned"));
    }
}
