//! Apply log parsing
//!
//! Reads the console output of a `terraform apply` (or `tofu apply`) run and
//! extracts the outcome, the per-resource operation timeline, statistics and
//! error/warning lines.

mod parser;
mod types;

pub use parser::ApplyLogParser;
pub use types::{
    ApplyDiagnostic, ApplyOutcome, ApplyReport, ApplyStatistics, OperationAction,
    OperationStatus, ResourceOperation, format_duration,
};
