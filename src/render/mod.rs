//! Report renderers
//!
//! `HtmlRenderer` turns a plan analysis, a diagnostics report or an apply
//! report into a self-contained HTML document. `AsciiRenderer` renders a plan
//! analysis as plain text for the terminal.

mod ascii;
mod html;
mod templates;

use chrono::{DateTime, Utc};

use crate::config::ReportConfig;

pub use ascii::AsciiRenderer;
pub use html::HtmlRenderer;

/// Placeholder shown instead of a sensitive value
pub const SENSITIVE_PLACEHOLDER: &str = "(sensitive)";

/// Placeholder shown for values only known after apply
pub const COMPUTED_PLACEHOLDER: &str = "(known after apply)";

/// Everything a report needs besides the data it renders
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub plan_name: String,
    /// Human friendly title, the plan name when absent
    pub display_name: Option<String>,
    pub config: ReportConfig,
    pub generated_at: DateTime<Utc>,
}

impl ReportOptions {
    pub fn new(plan_name: &str) -> Self {
        Self {
            plan_name: plan_name.to_string(),
            display_name: None,
            config: ReportConfig::default(),
            generated_at: Utc::now(),
        }
    }

    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
        self
    }

    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.plan_name)
    }

    fn generated_at_display(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }
}
