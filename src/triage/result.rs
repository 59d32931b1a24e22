use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{IdentityRef, PrSizeInfo};

/// What the triage suggests a reader do with a PR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecommendedAction {
    Approve,
    Review,
    Pending,
}

/// The review state of a PR, with the category-specific timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrState {
    /// A reviewer vote at or above the approval threshold exists.
    Approved { created_at: DateTime<Utc> },
    /// The ball is in the reviewers' court since `waiting_since`.
    NeedingReview { waiting_since: DateTime<Utc> },
    /// A reviewer responded last; the author owes the next move.
    WaitingOnAuthor { last_reviewer_activity_at: DateTime<Utc> },
}

impl PrState {
    /// The category timestamp, used as each list's sort key
    pub fn sort_timestamp(&self) -> DateTime<Utc> {
        match self {
            PrState::Approved { created_at } => *created_at,
            PrState::NeedingReview { waiting_since } => *waiting_since,
            PrState::WaitingOnAuthor { last_reviewer_activity_at } => *last_reviewer_activity_at,
        }
    }
}

/// One classified PR as it appears in the triage view.
#[derive(Debug, Clone, Serialize)]
pub struct TriagedPr {
    pub id: u64,
    pub title: String,
    pub author: IdentityRef,
    pub url: String,
    pub has_conflicts: bool,
    pub is_team_member: bool,
    pub action: RecommendedAction,
    pub size: Option<PrSizeInfo>,
    pub file_labels: Vec<String>,
    pub repository: Option<String>, // set in multi-repo mode only
    pub state: PrState,
}

/// The triage view: three disjoint lists. Every input PR not excluded by
/// the ignored-user filter appears in exactly one of them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisResult {
    pub approved: Vec<TriagedPr>,
    pub needing_review: Vec<TriagedPr>,
    pub waiting_on_author: Vec<TriagedPr>,
}

impl AnalysisResult {
    /// Route one classified PR into the list matching its state
    pub(crate) fn push(&mut self, pr: TriagedPr) {
        match pr.state {
            PrState::Approved { .. } => self.approved.push(pr),
            PrState::NeedingReview { .. } => self.needing_review.push(pr),
            PrState::WaitingOnAuthor { .. } => self.waiting_on_author.push(pr),
        }
    }

    /// Apply the triage sort orders: each list ascending by its category
    /// timestamp (oldest-waiting first for NeedingReview), id as the
    /// deterministic tie-break.
    pub(crate) fn sort(&mut self) {
        let key = |pr: &TriagedPr| (pr.state.sort_timestamp(), pr.id);
        self.approved.sort_by_key(key);
        self.needing_review.sort_by_key(key);
        self.waiting_on_author.sort_by_key(key);
    }

    pub fn is_empty(&self) -> bool {
        self.approved.is_empty() && self.needing_review.is_empty() && self.waiting_on_author.is_empty()
    }

    pub fn total(&self) -> usize {
        self.approved.len() + self.needing_review.len() + self.waiting_on_author.len()
    }
}

/// Merge per-repository results into one triage view.
///
/// Concatenates the same-named lists and re-applies the same sort orders,
/// so merging per-repo results is indistinguishable from classifying the
/// concatenated PR set in one call.
pub fn merge_analysis_results(results: Vec<AnalysisResult>) -> AnalysisResult {
    let mut merged = AnalysisResult::default();
    for result in results {
        merged.approved.extend(result.approved);
        merged.needing_review.extend(result.needing_review);
        merged.waiting_on_author.extend(result.waiting_on_author);
    }
    merged.sort();
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn entry(id: u64, state: PrState) -> TriagedPr {
        TriagedPr {
            id,
            title: format!("PR {}", id),
            author: IdentityRef::new("A", "a"),
            url: format!("https://example.com/pr/{}", id),
            has_conflicts: false,
            is_team_member: true,
            action: RecommendedAction::Review,
            size: None,
            file_labels: vec![],
            repository: None,
            state,
        }
    }

    fn t(offset_hours: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap() + Duration::hours(offset_hours)
    }

    #[test]
    fn test_push_routes_by_state() {
        let mut result = AnalysisResult::default();
        result.push(entry(1, PrState::Approved { created_at: t(0) }));
        result.push(entry(2, PrState::NeedingReview { waiting_since: t(1) }));
        result.push(entry(3, PrState::WaitingOnAuthor { last_reviewer_activity_at: t(2) }));
        assert_eq!(result.approved.len(), 1);
        assert_eq!(result.needing_review.len(), 1);
        assert_eq!(result.waiting_on_author.len(), 1);
        assert_eq!(result.total(), 3);
    }

    #[test]
    fn test_needing_review_sorted_oldest_waiting_first() {
        let mut result = AnalysisResult::default();
        result.push(entry(1, PrState::NeedingReview { waiting_since: t(10) }));
        result.push(entry(2, PrState::NeedingReview { waiting_since: t(2) }));
        result.sort();
        assert_eq!(result.needing_review[0].id, 2);
        assert_eq!(result.needing_review[1].id, 1);
    }

    #[test]
    fn test_sort_ties_break_on_id() {
        let mut result = AnalysisResult::default();
        result.push(entry(9, PrState::Approved { created_at: t(0) }));
        result.push(entry(3, PrState::Approved { created_at: t(0) }));
        result.sort();
        assert_eq!(result.approved[0].id, 3);
        assert_eq!(result.approved[1].id, 9);
    }

    #[test]
    fn test_merge_interleaves_and_resorts() {
        let mut a = AnalysisResult::default();
        a.push(entry(1, PrState::Approved { created_at: t(5) }));
        a.sort();
        let mut b = AnalysisResult::default();
        b.push(entry(2, PrState::Approved { created_at: t(1) }));
        b.sort();

        let merged = merge_analysis_results(vec![a, b]);
        assert_eq!(merged.approved.len(), 2);
        assert_eq!(merged.approved[0].id, 2);
        assert_eq!(merged.approved[1].id, 1);
    }

    #[test]
    fn test_merge_empty_is_empty() {
        let merged = merge_analysis_results(vec![]);
        assert!(merged.is_empty());
    }
}
