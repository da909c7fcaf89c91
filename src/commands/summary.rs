use super::report::load_plan;
use crate::analysis::PlanAnalyzer;
use crate::context::Context as AppContext;
use crate::render::AsciiRenderer;
use anyhow::{Context, Result};
use std::path::Path;

/// Handles the 'summary' command - prints the plan analysis to the terminal
pub struct SummaryCommand;

impl SummaryCommand {
    /// Execute the summary command
    pub fn execute(ctx: &AppContext, plan_path: &str, show_sensitive: bool) -> Result<()> {
        let content = ctx
            .fs
            .read_to_string(Path::new(plan_path))
            .with_context(|| format!("Failed to read plan file {}", plan_path))?;

        let plan = load_plan(ctx, plan_path, &content)?;
        let analysis = PlanAnalyzer::new().analyze(plan);

        let rendered = AsciiRenderer::new()
            .with_show_sensitive(show_sensitive)
            .render(&analysis);

        ctx.output.plain(rendered.trim_end());
        Ok(())
    }
}
