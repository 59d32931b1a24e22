pub mod classifier;
pub mod result;
pub mod timeline;

pub use classifier::{classify, FileLabelRule};
pub use result::{merge_analysis_results, AnalysisResult, PrState, RecommendedAction, TriagedPr};
pub use timeline::{build_timeline, split_timeline, Activity};
