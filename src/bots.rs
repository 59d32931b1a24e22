use std::collections::HashSet;

/// Default substring markers that flag an identity key as a bot account.
/// "[bot]" covers GitHub-style service accounts; "-bot" covers the common
/// self-hosted convention.
const DEFAULT_BOT_MARKERS: &[&str] = &["[bot]", "-bot"];

/// Identifies bot accounts by exact key or name marker.
///
/// Built once per analysis run from configuration; all checks are
/// case-insensitive against lowercase identity keys.
#[derive(Debug, Clone)]
pub struct BotFilter {
    keys: HashSet<String>,
    markers: Vec<String>,
}

impl BotFilter {
    /// Build a filter from configured exact keys plus the default markers
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_markers(keys, DEFAULT_BOT_MARKERS.iter().map(|m| m.to_string()))
    }

    /// Build a filter with custom substring markers (markers replace the defaults)
    pub fn with_markers<I, S, M>(keys: I, markers: M) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        M: IntoIterator<Item = String>,
    {
        Self {
            keys: keys
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            markers: markers.into_iter().map(|m| m.to_lowercase()).collect(),
        }
    }

    /// Whether the given identity key belongs to a bot account
    pub fn is_bot(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.keys.contains(&key) || self.markers.iter().any(|m| key.contains(m.as_str()))
    }
}

impl Default for BotFilter {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_key_match() {
        let filter = BotFilter::new(["ci-runner"]);
        assert!(filter.is_bot("ci-runner"));
        assert!(!filter.is_bot("ci-runner2"));
    }

    #[test]
    fn test_exact_key_case_insensitive() {
        let filter = BotFilter::new(["CI-Runner"]);
        assert!(filter.is_bot("ci-runner"));
        assert!(filter.is_bot("CI-RUNNER"));
    }

    #[test]
    fn test_bot_suffix_marker() {
        let filter = BotFilter::default();
        assert!(filter.is_bot("dependabot[bot]"));
        assert!(filter.is_bot("deploy-bot"));
        assert!(!filter.is_bot("abbot"));
    }

    #[test]
    fn test_human_not_flagged() {
        let filter = BotFilter::new(["service-account"]);
        assert!(!filter.is_bot("jane.doe"));
    }

    #[test]
    fn test_custom_markers_replace_defaults() {
        let filter = BotFilter::with_markers(Vec::<String>::new(), vec!["svc.".to_string()]);
        assert!(filter.is_bot("svc.builds"));
        assert!(!filter.is_bot("dependabot[bot]"));
    }
}
