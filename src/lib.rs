//! Review-state analysis engine: turns a snapshot of open pull requests
//! into triage categories, dependency chains, reviewer workloads, and
//! delivery metrics. Pure and deterministic; fetching and rendering are
//! the caller's concern.

pub mod bots;
pub mod config;
pub mod deps;
pub mod metrics;
pub mod model;
pub mod size;
pub mod staleness;
pub mod triage;
pub mod workload;

pub use bots::BotFilter;
pub use config::{load_config, validate_config, Config};
pub use deps::{
    build_dependency_graph, detect_dependencies, DependencyConfig, DependencyGraph, PrDependency,
};
pub use metrics::{dora_metrics, dora_trend, review_metrics, DoraMetrics, ReviewMetrics};
pub use model::{IdentityRef, PrSizeInfo, PullRequestRecord, Reviewer, SizeLabel};
pub use size::{classify_size, measure_pr_size, SizeThreshold};
pub use staleness::{staleness_badge, StalenessThreshold};
pub use triage::{classify, merge_analysis_results, AnalysisResult, PrState, TriagedPr};
pub use workload::{reviewer_workloads, ReviewerWorkload, WorkloadBands};
