use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::bots::BotFilter;
use crate::model::{IdentityRef, PullRequestRecord, APPROVAL_VOTE_THRESHOLD};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Upper bounds of one load band. Staying at or under both axes keeps a
/// reviewer inside the band; exceeding either escalates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadBand {
    pub max_pending: usize,
    pub max_avg_response_days: f64,
}

/// The two configurable bands; anything past `medium` is heavy load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkloadBands {
    pub light: LoadBand,
    pub medium: LoadBand,
}

impl Default for WorkloadBands {
    fn default() -> Self {
        Self {
            light: LoadBand { max_pending: 2, max_avg_response_days: 2.0 },
            medium: LoadBand { max_pending: 5, max_avg_response_days: 4.0 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadLevel {
    Light,
    Moderate,
    Heavy,
}

/// Per-reviewer summary of review duty and responsiveness.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewerWorkload {
    pub reviewer: IdentityRef,
    pub assigned: usize,
    pub pending: usize,
    pub completed: usize,
    pub avg_response_days: Option<f64>,
    pub load: LoadLevel,
}

#[derive(Default)]
struct Accumulator {
    display_name: String,
    assigned: usize,
    pending: usize,
    completed: usize,
    response_days: Vec<f64>,
}

/// Summarize the review workload of every non-bot reviewer.
///
/// A reviewer's vote at or above the approval threshold counts the PR as
/// completed; otherwise the PR counts as pending if it currently sits in
/// the needing-review list. Response time is measured from PR creation
/// to the reviewer's earliest comment; comments timestamped before
/// creation are data anomalies and are discarded. Output is sorted by
/// pending count descending (worst bottleneck first), reviewer key
/// ascending on ties.
pub fn reviewer_workloads(
    prs: &[PullRequestRecord],
    needing_review_ids: &HashSet<u64>,
    bots: &BotFilter,
    bands: &WorkloadBands,
) -> Vec<ReviewerWorkload> {
    let mut by_reviewer: BTreeMap<String, Accumulator> = BTreeMap::new();

    for pr in prs {
        if bots.is_bot(&pr.author.key) {
            continue;
        }
        for reviewer in &pr.reviewers {
            let key = &reviewer.identity.key;
            if bots.is_bot(key) {
                continue;
            }

            let acc = by_reviewer.entry(key.clone()).or_default();
            acc.display_name = reviewer.identity.display_name.clone();
            acc.assigned += 1;
            if reviewer.vote >= APPROVAL_VOTE_THRESHOLD {
                acc.completed += 1;
            } else if needing_review_ids.contains(&pr.id) {
                acc.pending += 1;
            }

            if let Some(first_comment) = earliest_comment_at(pr, key) {
                let days = (first_comment - pr.created_at).num_seconds() as f64 / SECONDS_PER_DAY;
                if days >= 0.0 {
                    acc.response_days.push(days);
                }
            }
        }
    }

    let mut workloads: Vec<ReviewerWorkload> = by_reviewer
        .into_iter()
        .map(|(key, acc)| {
            let avg_response_days = if acc.response_days.is_empty() {
                None
            } else {
                Some(acc.response_days.iter().sum::<f64>() / acc.response_days.len() as f64)
            };
            ReviewerWorkload {
                reviewer: IdentityRef { display_name: acc.display_name, key },
                assigned: acc.assigned,
                pending: acc.pending,
                completed: acc.completed,
                avg_response_days,
                load: load_level(acc.pending, avg_response_days, bands),
            }
        })
        .collect();

    workloads.sort_by(|a, b| {
        // Primary: pending descending; tie-break: reviewer key ascending
        b.pending
            .cmp(&a.pending)
            .then_with(|| a.reviewer.key.cmp(&b.reviewer.key))
    });
    workloads
}

fn earliest_comment_at(
    pr: &PullRequestRecord,
    reviewer_key: &str,
) -> Option<chrono::DateTime<chrono::Utc>> {
    pr.threads
        .iter()
        .flat_map(|t| &t.comments)
        .filter(|c| c.author_key == reviewer_key)
        .map(|c| c.posted_at)
        .min()
}

fn load_level(pending: usize, avg_response_days: Option<f64>, bands: &WorkloadBands) -> LoadLevel {
    // No measured latency cannot escalate the level
    let avg = avg_response_days.unwrap_or(0.0);
    if pending <= bands.light.max_pending && avg <= bands.light.max_avg_response_days {
        LoadLevel::Light
    } else if pending <= bands.medium.max_pending && avg <= bands.medium.max_avg_response_days {
        LoadLevel::Moderate
    } else {
        LoadLevel::Heavy
    }
}
