use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::bots::BotFilter;
use crate::deps::DependencyConfig;
use crate::size::{default_size_thresholds, SizeThreshold};
use crate::staleness::{default_staleness_thresholds, StalenessThreshold};
use crate::triage::FileLabelRule;
use crate::workload::WorkloadBands;

/// Analysis configuration.
///
/// Every section is optional and falls back to the built-in defaults.
///
/// Example YAML:
/// ```yaml
/// team_members: ["jane", "bob"]
/// bot_users: ["svc.pipeline"]
/// size:
///   exclude: ["*.lock", "package-lock.json"]
///   thresholds:
///     - { label: XS, max_changes: 10 }
///     - { label: S, max_changes: 40 }
/// staleness:
///   - { label: Abandoned, min_days: 30 }
///   - { label: Stale, min_days: 14 }
/// dependencies:
///   file_overlap: true
///   min_shared_files: 3
/// file_labels:
///   - { label: docs, patterns: ["*.md", "docs/**"] }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Identity keys of the team; empty means everyone counts as team
    #[serde(default)]
    pub team_members: Vec<String>,

    /// Authors whose PRs are dropped from the analysis entirely
    #[serde(default)]
    pub ignored_users: Vec<String>,

    /// Exact identity keys treated as bots
    #[serde(default)]
    pub bot_users: Vec<String>,

    /// Substring markers flagging bot accounts; None keeps the built-in
    /// markers
    #[serde(default)]
    pub bot_markers: Option<Vec<String>>,

    #[serde(default)]
    pub size: SizeRules,

    /// Staleness ladder; must be sorted descending by min_days (the
    /// loader sorts it)
    #[serde(default = "default_staleness_thresholds")]
    pub staleness: Vec<StalenessThreshold>,

    #[serde(default)]
    pub dependencies: DependencyConfig,

    #[serde(default)]
    pub workload: WorkloadBands,

    /// Glob rules tagging PRs by the files they touch
    #[serde(default)]
    pub file_labels: Vec<FileLabelRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            team_members: Vec::new(),
            ignored_users: Vec::new(),
            bot_users: Vec::new(),
            bot_markers: None,
            size: SizeRules::default(),
            staleness: default_staleness_thresholds(),
            dependencies: DependencyConfig::default(),
            workload: WorkloadBands::default(),
            file_labels: Vec::new(),
        }
    }
}

impl Config {
    /// Lowercase the identity sets and sort both ladders so the engine's
    /// preconditions hold. The loader calls this after parsing; call it
    /// yourself when assembling a Config in code.
    pub fn normalize(&mut self) {
        for key in self
            .team_members
            .iter_mut()
            .chain(self.ignored_users.iter_mut())
            .chain(self.bot_users.iter_mut())
        {
            *key = key.to_lowercase();
        }
        self.size.thresholds.sort_by_key(|t| t.max_changes);
        self.staleness.sort_by_key(|t| std::cmp::Reverse(t.min_days));
    }

    pub fn team_set(&self) -> HashSet<String> {
        self.team_members.iter().map(|k| k.to_lowercase()).collect()
    }

    pub fn ignored_set(&self) -> HashSet<String> {
        self.ignored_users.iter().map(|k| k.to_lowercase()).collect()
    }

    /// Bot filter from the configured keys and markers
    pub fn bot_filter(&self) -> BotFilter {
        match &self.bot_markers {
            Some(markers) => BotFilter::with_markers(&self.bot_users, markers.clone()),
            None => BotFilter::new(&self.bot_users),
        }
    }
}

/// Size measurement rules: exclusion globs plus the threshold ladder.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SizeRules {
    /// Glob patterns for files excluded from line counting
    /// Example: ["*.lock", "package-lock.json"]
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Ladder evaluated ascending; must be sorted (the loader sorts it)
    #[serde(default = "default_size_thresholds")]
    pub thresholds: Vec<SizeThreshold>,
}

impl Default for SizeRules {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            thresholds: default_size_thresholds(),
        }
    }
}
