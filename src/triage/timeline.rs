use chrono::{DateTime, Utc};

use crate::bots::BotFilter;
use crate::model::PullRequestRecord;

/// One author- or reviewer-side event on a PR's timeline.
///
/// Derived and ephemeral: rebuilt from the PR's threads and push
/// timestamp on every analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub timestamp: DateTime<Utc>,
    pub is_author: bool,
}

/// Rebuild a PR's activity events from its comment threads and last push.
///
/// Bot-authored comments are dropped entirely before derivation. A push
/// to the source branch always counts as author activity. No ordering is
/// imposed here; callers sort as needed.
pub fn build_timeline(pr: &PullRequestRecord, bots: &BotFilter) -> Vec<Activity> {
    let mut activities = Vec::new();

    for thread in &pr.threads {
        for comment in &thread.comments {
            if bots.is_bot(&comment.author_key) {
                continue;
            }
            activities.push(Activity {
                timestamp: comment.posted_at,
                is_author: comment.author_key == pr.author.key,
            });
        }
    }

    if let Some(pushed_at) = pr.last_push_at {
        activities.push(Activity {
            timestamp: pushed_at,
            is_author: true,
        });
    }

    activities
}

/// Split a timeline into author and reviewer events, each sorted
/// ascending by timestamp.
pub fn split_timeline(activities: &[Activity]) -> (Vec<Activity>, Vec<Activity>) {
    let mut author: Vec<Activity> = activities.iter().filter(|a| a.is_author).copied().collect();
    let mut reviewer: Vec<Activity> = activities.iter().filter(|a| !a.is_author).copied().collect();
    author.sort_by_key(|a| a.timestamp);
    reviewer.sort_by_key(|a| a.timestamp);
    (author, reviewer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Comment, CommentThread, IdentityRef};
    use chrono::{Duration, TimeZone};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn pr_with_threads(threads: Vec<CommentThread>) -> PullRequestRecord {
        PullRequestRecord {
            id: 7,
            title: "Add retry".to_string(),
            author: IdentityRef::new("Jane", "jane"),
            url: "https://example.com/pr/7".to_string(),
            created_at: base_time(),
            reviewers: vec![],
            threads,
            has_conflicts: false,
            last_push_at: None,
            source_branch: None,
            target_branch: None,
            description: None,
            size: None,
            changed_files: None,
        }
    }

    fn comment(author: &str, offset_hours: i64) -> Comment {
        Comment {
            author_key: author.to_string(),
            posted_at: base_time() + Duration::hours(offset_hours),
        }
    }

    #[test]
    fn test_author_and_reviewer_tagging() {
        let pr = pr_with_threads(vec![CommentThread {
            comments: vec![comment("jane", 1), comment("bob", 2)],
        }]);
        let timeline = build_timeline(&pr, &BotFilter::default());
        assert_eq!(timeline.len(), 2);
        assert!(timeline[0].is_author);
        assert!(!timeline[1].is_author);
    }

    #[test]
    fn test_bot_comments_dropped() {
        let pr = pr_with_threads(vec![CommentThread {
            comments: vec![comment("ci-bot", 1), comment("bob", 2)],
        }]);
        let timeline = build_timeline(&pr, &BotFilter::default());
        assert_eq!(timeline.len(), 1);
        assert!(!timeline[0].is_author);
    }

    #[test]
    fn test_configured_bot_set_dropped() {
        let pr = pr_with_threads(vec![CommentThread {
            comments: vec![comment("service.account", 1)],
        }]);
        let timeline = build_timeline(&pr, &BotFilter::new(["service.account"]));
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_push_is_author_activity() {
        let mut pr = pr_with_threads(vec![]);
        pr.last_push_at = Some(base_time() + Duration::hours(5));
        let timeline = build_timeline(&pr, &BotFilter::default());
        assert_eq!(timeline.len(), 1);
        assert!(timeline[0].is_author);
        assert_eq!(timeline[0].timestamp, base_time() + Duration::hours(5));
    }

    #[test]
    fn test_split_sorts_ascending() {
        let pr = pr_with_threads(vec![CommentThread {
            comments: vec![comment("bob", 3), comment("jane", 2), comment("bob", 1)],
        }]);
        let timeline = build_timeline(&pr, &BotFilter::default());
        let (author, reviewer) = split_timeline(&timeline);
        assert_eq!(author.len(), 1);
        assert_eq!(reviewer.len(), 2);
        assert!(reviewer[0].timestamp < reviewer[1].timestamp);
    }
}
