use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::PullRequestRecord;

/// Default mention pattern: "depends on #12", "blocked by !7", "after 33".
pub const DEFAULT_MENTION_PATTERN: &str = r"(?i)(?:depends on|blocked by|after)\s*[#!]?(\d+)";

/// Why one PR depends on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyReason {
    BranchChain,
    Mention,
    FileOverlap,
}

/// A directed edge: `from_pr_id` depends on `to_pr_id`.
#[derive(Debug, Clone, Serialize)]
pub struct PrDependency {
    pub from_pr_id: u64,
    pub to_pr_id: u64,
    pub reason: DependencyReason,
    pub details: String,
}

/// Which detectors run, and their knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyConfig {
    /// Detect PRs targeting another PR's source branch
    #[serde(default = "default_true")]
    pub branch_chains: bool,

    /// Detect textual references in title/description
    #[serde(default = "default_true")]
    pub mentions: bool,

    /// Regex with one numeric capture group for the referenced PR id
    #[serde(default = "default_mention_pattern")]
    pub mention_pattern: String,

    /// Detect PR pairs touching the same files
    #[serde(default = "default_true")]
    pub file_overlap: bool,

    /// Minimum shared-file count for a file-overlap edge
    #[serde(default = "default_min_shared_files")]
    pub min_shared_files: usize,
}

fn default_true() -> bool {
    true
}

fn default_mention_pattern() -> String {
    DEFAULT_MENTION_PATTERN.to_string()
}

fn default_min_shared_files() -> usize {
    3
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            branch_chains: true,
            mentions: true,
            mention_pattern: default_mention_pattern(),
            file_overlap: true,
            min_shared_files: default_min_shared_files(),
        }
    }
}

/// Run the enabled detectors over a PR snapshot.
///
/// Edges are deduplicated by `(from, to, reason)`, keeping the first
/// emission; detector order and input order fix the output order, so
/// identical inputs give identical output.
pub fn detect_dependencies(
    prs: &[PullRequestRecord],
    config: &DependencyConfig,
) -> Vec<PrDependency> {
    let mut edges = Vec::new();

    if config.branch_chains {
        detect_branch_chains(prs, &mut edges);
    }
    if config.mentions {
        detect_mentions(prs, &config.mention_pattern, &mut edges);
    }
    if config.file_overlap {
        detect_file_overlap(prs, config.min_shared_files, &mut edges);
    }

    dedup_edges(edges)
}

/// PR B targeting PR A's source branch means B builds on top of A.
fn detect_branch_chains(prs: &[PullRequestRecord], edges: &mut Vec<PrDependency>) {
    for b in prs {
        let Some(target) = &b.target_branch else { continue };
        for a in prs {
            if a.id == b.id {
                continue;
            }
            if a.source_branch.as_deref() == Some(target.as_str()) {
                edges.push(PrDependency {
                    from_pr_id: b.id,
                    to_pr_id: a.id,
                    reason: DependencyReason::BranchChain,
                    details: format!("targets branch {}", target),
                });
            }
        }
    }
}

fn detect_mentions(prs: &[PullRequestRecord], pattern: &str, edges: &mut Vec<PrDependency>) {
    // The pattern is validated at config load; a broken one just
    // disables this detector
    let Ok(re) = Regex::new(pattern) else { return };

    let known_ids: HashSet<u64> = prs.iter().map(|pr| pr.id).collect();

    for pr in prs {
        let mut text = pr.title.clone();
        if let Some(description) = &pr.description {
            text.push('\n');
            text.push_str(description);
        }

        for captures in re.captures_iter(&text) {
            let Some(id_match) = captures.get(1) else { continue };
            let Ok(referenced) = id_match.as_str().parse::<u64>() else { continue };
            // Only count references to PRs in this snapshot, never self
            if referenced == pr.id || !known_ids.contains(&referenced) {
                continue;
            }
            edges.push(PrDependency {
                from_pr_id: pr.id,
                to_pr_id: referenced,
                reason: DependencyReason::Mention,
                details: format!("mentions #{}", referenced),
            });
        }
    }
}

/// Pairs touching at least `min_shared` of the same files are related.
/// Recorded once per pair, lower id first.
fn detect_file_overlap(prs: &[PullRequestRecord], min_shared: usize, edges: &mut Vec<PrDependency>) {
    let with_files: Vec<(&PullRequestRecord, HashSet<&str>)> = prs
        .iter()
        .filter_map(|pr| {
            pr.changed_files
                .as_ref()
                .map(|files| (pr, files.iter().map(|f| f.as_str()).collect()))
        })
        .collect();

    for (i, (a, a_files)) in with_files.iter().enumerate() {
        for (b, b_files) in &with_files[i + 1..] {
            let mut shared: Vec<&str> = a_files.intersection(b_files).copied().collect();
            if shared.len() < min_shared {
                continue;
            }
            shared.sort_unstable();
            let sample = shared
                .iter()
                .take(3)
                .copied()
                .collect::<Vec<_>>()
                .join(", ");
            edges.push(PrDependency {
                from_pr_id: a.id.min(b.id),
                to_pr_id: a.id.max(b.id),
                reason: DependencyReason::FileOverlap,
                details: format!("{} shared files ({})", shared.len(), sample),
            });
        }
    }
}

fn dedup_edges(edges: Vec<PrDependency>) -> Vec<PrDependency> {
    let mut seen = HashSet::new();
    edges
        .into_iter()
        .filter(|e| seen.insert((e.from_pr_id, e.to_pr_id, e.reason)))
        .collect()
}
