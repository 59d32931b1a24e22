pub mod detect;
pub mod graph;

pub use detect::{detect_dependencies, DependencyConfig, DependencyReason, PrDependency};
pub use graph::{build_dependency_graph, ChainStatus, DependencyChain, DependencyGraph};
