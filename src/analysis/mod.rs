//! Plan-wide analysis
//!
//! Runs the diff engine over every mutating resource change and groups the
//! results by resource type for the renderers.

mod aggregator;
mod types;

pub use aggregator::PlanAnalyzer;
pub use types::{AnalyzedResourceChange, PlanAnalysis, ResourceGroup};
