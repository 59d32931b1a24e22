use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reviewer vote scale used by the hosting service. Fixed ordinal scale,
/// not user-configurable.
pub const VOTE_APPROVED: i32 = 10;
pub const VOTE_APPROVED_WITH_SUGGESTIONS: i32 = 5;
pub const VOTE_NONE: i32 = 0;
pub const VOTE_WAITING_FOR_AUTHOR: i32 = -5;
pub const VOTE_REJECTED: i32 = -10;

/// A vote at or above this counts as an approval.
pub const APPROVAL_VOTE_THRESHOLD: i32 = VOTE_APPROVED_WITH_SUGGESTIONS;

/// A user identity as reported by the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRef {
    pub display_name: String,
    pub key: String, // unique lowercase identity key
}

impl IdentityRef {
    pub fn new(display_name: &str, key: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            key: key.to_lowercase(),
        }
    }
}

/// A reviewer assigned to a PR, with their current vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reviewer {
    pub identity: IdentityRef,
    pub vote: i32,
}

/// A single comment inside a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub author_key: String, // lowercase identity key of the commenter
    pub posted_at: DateTime<Utc>,
}

/// An ordered comment thread on a PR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentThread {
    pub comments: Vec<Comment>,
}

/// Size labels, smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeLabel {
    XS,
    S,
    M,
    L,
    XL,
}

impl std::fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SizeLabel::XS => "XS",
            SizeLabel::S => "S",
            SizeLabel::M => "M",
            SizeLabel::L => "L",
            SizeLabel::XL => "XL",
        };
        write!(f, "{}", s)
    }
}

/// Line-change summary for a PR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrSizeInfo {
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub total_changes: u64, // lines_added + lines_deleted
    pub label: SizeLabel,
}

/// Kind of a diff block within one changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Add,
    Delete,
    Edit, // replacement: contributes to both added and deleted
}

/// One diff block: line counts on the original and modified side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffBlock {
    pub kind: BlockKind,
    pub original_lines: u64,
    pub modified_lines: u64,
}

/// Line-level diff data for one changed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDiff {
    pub path: String,
    pub blocks: Vec<DiffBlock>,
}

/// Immutable snapshot of one open pull request, as normalized by the
/// fetch layer. The engine never mutates these; every analysis pass
/// returns freshly derived values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestRecord {
    pub id: u64,
    pub title: String,
    pub author: IdentityRef,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub reviewers: Vec<Reviewer>,
    pub threads: Vec<CommentThread>,
    pub has_conflicts: bool,
    pub last_push_at: Option<DateTime<Utc>>, // last push to the source branch
    pub source_branch: Option<String>,
    pub target_branch: Option<String>,
    pub description: Option<String>,
    pub size: Option<PrSizeInfo>,
    pub changed_files: Option<Vec<String>>,
}

impl PullRequestRecord {
    /// PR age relative to the given reference time
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.created_at
    }

    /// Highest vote among non-excluded reviewers, if any are assigned
    pub fn max_vote(&self) -> Option<i32> {
        self.reviewers.iter().map(|r| r.vote).max()
    }

    /// Short reference like "#123"
    pub fn short_ref(&self) -> String {
        format!("#{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_identity_key_lowercased() {
        let id = IdentityRef::new("Jane Doe", "Jane.Doe");
        assert_eq!(id.key, "jane.doe");
        assert_eq!(id.display_name, "Jane Doe");
    }

    #[test]
    fn test_size_labels_ordered() {
        assert!(SizeLabel::XS < SizeLabel::S);
        assert!(SizeLabel::L < SizeLabel::XL);
    }

    #[test]
    fn test_pr_age() {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let now = created + Duration::days(3);
        let pr = PullRequestRecord {
            id: 1,
            title: "Test".to_string(),
            author: IdentityRef::new("A", "a"),
            url: "https://example.com/pr/1".to_string(),
            created_at: created,
            reviewers: vec![],
            threads: vec![],
            has_conflicts: false,
            last_push_at: None,
            source_branch: None,
            target_branch: None,
            description: None,
            size: None,
            changed_files: None,
        };
        assert_eq!(pr.age(now), Duration::days(3));
        assert_eq!(pr.short_ref(), "#1");
        assert_eq!(pr.max_vote(), None);
    }
}
