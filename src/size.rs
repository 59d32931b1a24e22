use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::model::{BlockKind, FileDiff, PrSizeInfo, SizeLabel};

/// One rung of the size ladder: `total_changes <= max_changes` lands in
/// this bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeThreshold {
    pub label: SizeLabel,
    pub max_changes: u64,
}

/// Default ladder. The top rung is also the open-ended bucket: anything
/// above it still classifies as XL.
pub fn default_size_thresholds() -> Vec<SizeThreshold> {
    vec![
        SizeThreshold { label: SizeLabel::XS, max_changes: 10 },
        SizeThreshold { label: SizeLabel::S, max_changes: 40 },
        SizeThreshold { label: SizeLabel::M, max_changes: 150 },
        SizeThreshold { label: SizeLabel::L, max_changes: 600 },
        SizeThreshold { label: SizeLabel::XL, max_changes: 1500 },
    ]
}

/// Classify a total line-change count against a threshold ladder.
///
/// Thresholds are evaluated ascending by boundary; the first whose
/// `max_changes >= total_changes` wins (boundaries are inclusive). If
/// nothing matches, the largest-boundary label is returned.
pub fn classify_size(total_changes: u64, thresholds: &[SizeThreshold]) -> SizeLabel {
    let mut sorted: Vec<SizeThreshold> = thresholds.to_vec();
    sorted.sort_by_key(|t| t.max_changes);

    for threshold in &sorted {
        if total_changes <= threshold.max_changes {
            return threshold.label;
        }
    }
    // Open-ended top bucket
    sorted.last().map(|t| t.label).unwrap_or(SizeLabel::XL)
}

/// Count added/deleted lines across file diffs, skipping excluded paths.
///
/// Pure add blocks count toward added, pure delete blocks toward deleted,
/// and edit (replacement) blocks toward both using their respective
/// original/modified line counts.
fn count_diff_lines(diffs: &[FileDiff], exclude: &[Pattern]) -> (u64, u64) {
    let mut added = 0u64;
    let mut deleted = 0u64;

    for diff in diffs {
        if exclude.iter().any(|p| p.matches(&diff.path)) {
            continue;
        }
        for block in &diff.blocks {
            match block.kind {
                BlockKind::Add => added += block.modified_lines,
                BlockKind::Delete => deleted += block.original_lines,
                BlockKind::Edit => {
                    added += block.modified_lines;
                    deleted += block.original_lines;
                }
            }
        }
    }

    (added, deleted)
}

/// Measure a PR's size from its diff data and classify it.
///
/// When line-level diff data is absent, falls back to counting the
/// non-excluded changed-file entries as a rough proxy (added = file
/// count, deleted = 0). Degraded accuracy, never an error.
pub fn measure_pr_size(
    diffs: Option<&[FileDiff]>,
    changed_files: &[String],
    exclude_globs: &[String],
    thresholds: &[SizeThreshold],
) -> PrSizeInfo {
    let exclude: Vec<Pattern> = exclude_globs
        .iter()
        .filter_map(|g| Pattern::new(g).ok())
        .collect();

    let (lines_added, lines_deleted) = match diffs {
        Some(diffs) => count_diff_lines(diffs, &exclude),
        None => {
            // File-count proxy
            let count = changed_files
                .iter()
                .filter(|f| !exclude.iter().any(|p| p.matches(f)))
                .count() as u64;
            (count, 0)
        }
    };

    let total_changes = lines_added + lines_deleted;
    PrSizeInfo {
        lines_added,
        lines_deleted,
        total_changes,
        label: classify_size(total_changes, thresholds),
    }
}
