use std::collections::HashSet;

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::bots::BotFilter;
use crate::model::{PullRequestRecord, APPROVAL_VOTE_THRESHOLD};
use crate::triage::result::{AnalysisResult, PrState, RecommendedAction, TriagedPr};
use crate::triage::timeline::{build_timeline, split_timeline};

/// Tags PRs whose changed files match any of the given globs.
///
/// Example: label "docs" with patterns `["*.md", "docs/**"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileLabelRule {
    pub label: String,
    pub patterns: Vec<String>,
}

/// Classify a snapshot of open PRs into the three triage lists.
///
/// PRs authored by ignored users are dropped entirely. An empty
/// `team_members` set treats everyone as team (opt-out design). The
/// `repo_label` is attached to every entry in multi-repo mode and left
/// off otherwise.
pub fn classify(
    prs: &[PullRequestRecord],
    team_members: &HashSet<String>,
    ignored_users: &HashSet<String>,
    bots: &BotFilter,
    file_label_rules: &[FileLabelRule],
    repo_label: Option<&str>,
) -> AnalysisResult {
    let mut result = AnalysisResult::default();

    for pr in prs {
        if let Some(triaged) =
            classify_pr(pr, team_members, ignored_users, bots, file_label_rules, repo_label)
        {
            result.push(triaged);
        }
    }

    result.sort();
    result
}

fn classify_pr(
    pr: &PullRequestRecord,
    team_members: &HashSet<String>,
    ignored_users: &HashSet<String>,
    bots: &BotFilter,
    file_label_rules: &[FileLabelRule],
    repo_label: Option<&str>,
) -> Option<TriagedPr> {
    if ignored_users.contains(&pr.author.key) {
        return None;
    }

    // Empty team set means everyone is treated as team
    let is_team_member = team_members.is_empty() || team_members.contains(&pr.author.key);

    let state = determine_state(pr, bots);

    // Routine bot PRs should not wait on a human reviewer
    let action = if bots.is_bot(&pr.author.key) {
        RecommendedAction::Approve
    } else {
        match state {
            PrState::Approved { .. } => RecommendedAction::Approve,
            PrState::NeedingReview { .. } => RecommendedAction::Review,
            PrState::WaitingOnAuthor { .. } => RecommendedAction::Pending,
        }
    };

    Some(TriagedPr {
        id: pr.id,
        title: pr.title.clone(),
        author: pr.author.clone(),
        url: pr.url.clone(),
        has_conflicts: pr.has_conflicts,
        is_team_member,
        action,
        size: pr.size,
        file_labels: detect_file_labels(pr, file_label_rules),
        repository: repo_label.map(|l| l.to_string()),
        state,
    })
}

fn determine_state(pr: &PullRequestRecord, bots: &BotFilter) -> PrState {
    // An approval vote decides the category outright, regardless of any
    // later comment activity
    let approved = pr
        .reviewers
        .iter()
        .any(|r| !bots.is_bot(&r.identity.key) && r.vote >= APPROVAL_VOTE_THRESHOLD);
    if approved {
        return PrState::Approved { created_at: pr.created_at };
    }

    let timeline = build_timeline(pr, bots);
    let (author_acts, reviewer_acts) = split_timeline(&timeline);

    // The reviewers owe a response unless their activity is the most
    // recent event. A brand-new PR with no activity needs its initial
    // review.
    let needs_review = match (author_acts.last(), reviewer_acts.last()) {
        (Some(author), Some(reviewer)) => author.timestamp > reviewer.timestamp,
        (Some(_), None) => true,
        (None, None) => true,
        (None, Some(_)) => false,
    };

    if needs_review {
        // How long the ball has been in the reviewers' court: the first
        // author event after the reviewers last spoke, or PR creation if
        // they never have
        let waiting_since = match reviewer_acts.last() {
            Some(last_reviewer) => author_acts
                .iter()
                .find(|a| a.timestamp > last_reviewer.timestamp)
                .map(|a| a.timestamp)
                .unwrap_or(pr.created_at),
            None => pr.created_at,
        };
        PrState::NeedingReview { waiting_since }
    } else {
        // Unreachable without reviewer activity, by the needs_review rule
        let last_reviewer_activity_at = reviewer_acts
            .last()
            .map(|a| a.timestamp)
            .unwrap_or(pr.created_at);
        PrState::WaitingOnAuthor { last_reviewer_activity_at }
    }
}

fn detect_file_labels(pr: &PullRequestRecord, rules: &[FileLabelRule]) -> Vec<String> {
    let files = match &pr.changed_files {
        Some(files) if !files.is_empty() => files,
        _ => return Vec::new(),
    };

    rules
        .iter()
        .filter(|rule| {
            rule.patterns
                .iter()
                .filter_map(|g| Pattern::new(g).ok())
                .any(|p| files.iter().any(|f| p.matches(f)))
        })
        .map(|rule| rule.label.clone())
        .collect()
}
