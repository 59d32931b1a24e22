use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::bots::BotFilter;
use crate::metrics::median;
use crate::model::PullRequestRecord;
use crate::triage::timeline::{build_timeline, Activity};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Cycle metrics for one PR.
#[derive(Debug, Clone, Serialize)]
pub struct PrCycleMetrics {
    pub pr_id: u64,
    pub author: String, // display name
    pub age_days: f64,
    /// How long ago review started: now minus the earliest reviewer
    /// activity. None when no reviewer has touched the PR.
    pub time_to_first_review_days: Option<f64>,
    /// Author-to-reviewer back-and-forth count over the sorted timeline.
    /// Consecutive same-side activities collapse into a single run, so
    /// two reviewers commenting back-to-back count as one round.
    pub review_rounds: usize,
}

/// Aggregates for one author's PRs.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorMetrics {
    pub author: String,
    pub pr_count: usize,
    pub median_age_days: f64,
    pub mean_time_to_first_review_days: Option<f64>,
    pub mean_review_rounds: f64,
    pub prs_without_review: usize,
}

/// Per-PR cycle metrics plus snapshot-wide and per-author aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewMetrics {
    pub per_pr: Vec<PrCycleMetrics>,
    pub median_age_days: f64,
    pub mean_time_to_first_review_days: Option<f64>,
    pub mean_review_rounds: f64,
    pub prs_without_review: usize,
    pub per_author: Vec<AuthorMetrics>, // sorted by author name
}

/// Compute cycle metrics for a PR snapshot.
pub fn review_metrics(
    prs: &[PullRequestRecord],
    bots: &BotFilter,
    now: DateTime<Utc>,
) -> ReviewMetrics {
    let per_pr: Vec<PrCycleMetrics> = prs.iter().map(|pr| pr_cycle_metrics(pr, bots, now)).collect();

    let mut by_author: BTreeMap<String, Vec<&PrCycleMetrics>> = BTreeMap::new();
    for metrics in &per_pr {
        by_author.entry(metrics.author.clone()).or_default().push(metrics);
    }

    let per_author = by_author
        .into_iter()
        .map(|(author, group)| {
            let (median_age, mean_ttfr, mean_rounds, without_review) = aggregate(&group);
            AuthorMetrics {
                author,
                pr_count: group.len(),
                median_age_days: median_age,
                mean_time_to_first_review_days: mean_ttfr,
                mean_review_rounds: mean_rounds,
                prs_without_review: without_review,
            }
        })
        .collect();

    let all: Vec<&PrCycleMetrics> = per_pr.iter().collect();
    let (median_age_days, mean_time_to_first_review_days, mean_review_rounds, prs_without_review) =
        aggregate(&all);

    ReviewMetrics {
        per_pr,
        median_age_days,
        mean_time_to_first_review_days,
        mean_review_rounds,
        prs_without_review,
        per_author,
    }
}

fn aggregate(group: &[&PrCycleMetrics]) -> (f64, Option<f64>, f64, usize) {
    let median_age = median(group.iter().map(|m| m.age_days).collect());

    let defined_ttfr: Vec<f64> = group
        .iter()
        .filter_map(|m| m.time_to_first_review_days)
        .collect();
    let mean_ttfr = if defined_ttfr.is_empty() {
        None
    } else {
        Some(defined_ttfr.iter().sum::<f64>() / defined_ttfr.len() as f64)
    };

    let mean_rounds = if group.is_empty() {
        0.0
    } else {
        group.iter().map(|m| m.review_rounds as f64).sum::<f64>() / group.len() as f64
    };

    let without_review = group
        .iter()
        .filter(|m| m.time_to_first_review_days.is_none())
        .count();

    (median_age, mean_ttfr, mean_rounds, without_review)
}

/// Compute the cycle metrics of a single PR.
pub fn pr_cycle_metrics(
    pr: &PullRequestRecord,
    bots: &BotFilter,
    now: DateTime<Utc>,
) -> PrCycleMetrics {
    let timeline = build_timeline(pr, bots);

    let earliest_review = timeline
        .iter()
        .filter(|a| !a.is_author)
        .map(|a| a.timestamp)
        .min();

    PrCycleMetrics {
        pr_id: pr.id,
        author: pr.author.display_name.clone(),
        age_days: (now - pr.created_at).num_seconds() as f64 / SECONDS_PER_DAY,
        time_to_first_review_days: earliest_review
            .map(|t| (now - t).num_seconds() as f64 / SECONDS_PER_DAY),
        review_rounds: count_review_rounds(&timeline),
    }
}

/// Count author-run to reviewer-run transitions in chronological order.
fn count_review_rounds(timeline: &[Activity]) -> usize {
    let mut sorted: Vec<&Activity> = timeline.iter().collect();
    sorted.sort_by_key(|a| a.timestamp);

    let mut rounds = 0;
    let mut last_was_author = false;
    for activity in sorted {
        if last_was_author && !activity.is_author {
            rounds += 1;
        }
        last_was_author = activity.is_author;
    }
    rounds
}
