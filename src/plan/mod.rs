//! Infrastructure change plan model and JSON parser
//!
//! # Example
//!
//! ```ignore
//! use planlens::plan::PlanParser;
//!
//! let plan = PlanParser::new().parse_str(&std::fs::read_to_string("plan.json")?)?;
//! println!("{} to create", plan.summary.create);
//! ```

mod error;
mod parser;
mod types;

pub use error::{PlanError, PlanResult};
pub use parser::{PlanParser, normalize_actions};
pub use types::{
    ActionCounts, ActionType, OutputChange, PlanSummary, ResourceChange, ResourceWarning,
    TerraformPlan,
};
