pub mod apply_report;
pub mod error_report;
pub mod report;
pub mod summary;

pub use apply_report::ApplyReportCommand;
pub use error_report::{ErrorReportCommand, ErrorReportRequest};
pub use report::{PublishTarget, ReportCommand, ReportRequest};
pub use summary::SummaryCommand;
