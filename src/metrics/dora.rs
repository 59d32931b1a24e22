use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::median;

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;

// Rating cutoffs. Values at or better than a cutoff earn that rating.
const LEAD_TIME_ELITE_MAX_DAYS: f64 = 1.0;
const LEAD_TIME_HIGH_MAX_DAYS: f64 = 7.0;
const LEAD_TIME_MEDIUM_MAX_DAYS: f64 = 30.0;

const DEPLOY_FREQ_ELITE_MIN_PER_WEEK: f64 = 7.0;
const DEPLOY_FREQ_HIGH_MIN_PER_WEEK: f64 = 1.0;
const DEPLOY_FREQ_MEDIUM_MIN_PER_WEEK: f64 = 0.25;

const FAILURE_RATE_ELITE_MAX_PCT: f64 = 15.0;
const FAILURE_RATE_HIGH_MAX_PCT: f64 = 30.0;
const FAILURE_RATE_MEDIUM_MAX_PCT: f64 = 45.0;

const RESTORE_ELITE_MAX_HOURS: f64 = 1.0;
const RESTORE_HIGH_MAX_HOURS: f64 = 24.0;
const RESTORE_MEDIUM_MAX_HOURS: f64 = 168.0;

/// Relative change below this is considered flat when comparing windows.
const TREND_TOLERANCE: f64 = 0.05;

/// A PR that merged inside the metrics window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MergedPr {
    pub created_at: DateTime<Utc>,
    pub merged_at: DateTime<Utc>,
}

/// A CI build that finished inside the metrics window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRecord {
    pub id: u64,
    pub succeeded: bool,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DoraRating {
    Elite,
    High,
    Medium,
    Low,
}

/// One delivery-performance indicator with its rating.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DoraMetric {
    pub value: f64,
    pub rating: DoraRating,
}

/// The four DORA indicators over one time window.
#[derive(Debug, Clone, Serialize)]
pub struct DoraMetrics {
    pub window_days: u64,
    pub lead_time_days: DoraMetric,
    pub deployments_per_week: DoraMetric,
    pub change_failure_rate_pct: DoraMetric,
    pub time_to_restore_hours: DoraMetric,
}

/// Compute the four DORA metrics for one window.
pub fn dora_metrics(merged_prs: &[MergedPr], builds: &[BuildRecord], window_days: u64) -> DoraMetrics {
    let lead_time = median(
        merged_prs
            .iter()
            .map(|pr| (pr.merged_at - pr.created_at).num_seconds() as f64 / SECONDS_PER_DAY)
            .collect(),
    );

    let successes = builds.iter().filter(|b| b.succeeded).count();
    let deploy_freq = if window_days == 0 {
        0.0
    } else {
        successes as f64 / (window_days as f64 / 7.0)
    };

    let failure_rate = if builds.is_empty() {
        0.0
    } else {
        let failed = builds.len() - successes;
        failed as f64 / builds.len() as f64 * 100.0
    };

    let restore_hours = median(restore_samples(builds));

    DoraMetrics {
        window_days,
        lead_time_days: DoraMetric { value: lead_time, rating: rate_lead_time(lead_time) },
        deployments_per_week: DoraMetric { value: deploy_freq, rating: rate_deploy_freq(deploy_freq) },
        change_failure_rate_pct: DoraMetric {
            value: failure_rate,
            rating: rate_failure_rate(failure_rate),
        },
        time_to_restore_hours: DoraMetric {
            value: restore_hours,
            rating: rate_restore(restore_hours),
        },
    }
}

/// Hours from each failure streak's first failed finish to the next
/// succeeding finish, over builds sorted by finish time. Every success
/// resets the in-failure state.
fn restore_samples(builds: &[BuildRecord]) -> Vec<f64> {
    let mut sorted: Vec<&BuildRecord> = builds.iter().collect();
    sorted.sort_by_key(|b| (b.finished_at, b.id));

    let mut samples = Vec::new();
    let mut failed_since: Option<DateTime<Utc>> = None;
    for build in sorted {
        if build.succeeded {
            if let Some(start) = failed_since.take() {
                samples.push((build.finished_at - start).num_seconds() as f64 / SECONDS_PER_HOUR);
            }
        } else if failed_since.is_none() {
            failed_since = Some(build.finished_at);
        }
    }
    samples
}

fn rate_lead_time(days: f64) -> DoraRating {
    if days <= LEAD_TIME_ELITE_MAX_DAYS {
        DoraRating::Elite
    } else if days <= LEAD_TIME_HIGH_MAX_DAYS {
        DoraRating::High
    } else if days <= LEAD_TIME_MEDIUM_MAX_DAYS {
        DoraRating::Medium
    } else {
        DoraRating::Low
    }
}

fn rate_deploy_freq(per_week: f64) -> DoraRating {
    if per_week >= DEPLOY_FREQ_ELITE_MIN_PER_WEEK {
        DoraRating::Elite
    } else if per_week >= DEPLOY_FREQ_HIGH_MIN_PER_WEEK {
        DoraRating::High
    } else if per_week >= DEPLOY_FREQ_MEDIUM_MIN_PER_WEEK {
        DoraRating::Medium
    } else {
        DoraRating::Low
    }
}

fn rate_failure_rate(pct: f64) -> DoraRating {
    if pct <= FAILURE_RATE_ELITE_MAX_PCT {
        DoraRating::Elite
    } else if pct <= FAILURE_RATE_HIGH_MAX_PCT {
        DoraRating::High
    } else if pct <= FAILURE_RATE_MEDIUM_MAX_PCT {
        DoraRating::Medium
    } else {
        DoraRating::Low
    }
}

fn rate_restore(hours: f64) -> DoraRating {
    if hours <= RESTORE_ELITE_MAX_HOURS {
        DoraRating::Elite
    } else if hours <= RESTORE_HIGH_MAX_HOURS {
        DoraRating::High
    } else if hours <= RESTORE_MEDIUM_MAX_HOURS {
        DoraRating::Medium
    } else {
        DoraRating::Low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    Improving,
    Stable,
    Degrading,
}

/// Window-over-window direction for each indicator.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DoraTrend {
    pub lead_time: TrendDirection,
    pub deployment_frequency: TrendDirection,
    pub change_failure_rate: TrendDirection,
    pub time_to_restore: TrendDirection,
}

/// Compare a window against the preceding one.
pub fn dora_trend(current: &DoraMetrics, previous: &DoraMetrics) -> DoraTrend {
    DoraTrend {
        lead_time: direction(current.lead_time_days.value, previous.lead_time_days.value, false),
        deployment_frequency: direction(
            current.deployments_per_week.value,
            previous.deployments_per_week.value,
            true,
        ),
        change_failure_rate: direction(
            current.change_failure_rate_pct.value,
            previous.change_failure_rate_pct.value,
            false,
        ),
        time_to_restore: direction(
            current.time_to_restore_hours.value,
            previous.time_to_restore_hours.value,
            false,
        ),
    }
}

fn direction(current: f64, previous: f64, higher_is_better: bool) -> TrendDirection {
    let delta = if previous == 0.0 {
        if current == 0.0 {
            return TrendDirection::Stable;
        }
        // Any movement off zero is a full step
        if current > 0.0 { 1.0 } else { -1.0 }
    } else {
        (current - previous) / previous.abs()
    };

    if delta.abs() <= TREND_TOLERANCE {
        TrendDirection::Stable
    } else if (delta > 0.0) == higher_is_better {
        TrendDirection::Improving
    } else {
        TrendDirection::Degrading
    }
}
