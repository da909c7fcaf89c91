use crate::apply::{ApplyLogParser, ApplyOutcome, ApplyReport, format_duration};
use crate::context::Context as AppContext;
use crate::render::{HtmlRenderer, ReportOptions};
use anyhow::{Context, Result};
use std::path::Path;

const DEFAULT_NAME: &str = "apply";

/// Handles the 'apply-report' command - renders the result of an apply run
pub struct ApplyReportCommand;

impl ApplyReportCommand {
    /// Execute the apply-report command
    pub fn execute(
        ctx: &AppContext,
        log_path: &str,
        exit_code: i32,
        name: Option<&str>,
        output_dir: &str,
    ) -> Result<()> {
        let log = ctx
            .fs
            .read_to_string(Path::new(log_path))
            .with_context(|| format!("Failed to read apply log {}", log_path))?;

        let report = ApplyLogParser::new().parse(&log, exit_code);

        let name = name.unwrap_or(DEFAULT_NAME);
        let html = HtmlRenderer::new()?.render_apply(&report, &ReportOptions::new(name))?;

        let output_path = Path::new(output_dir).join(format!("{}.html", name));
        ctx.fs.write(&output_path, &html)?;

        print_summary(ctx, &report);
        ctx.output
            .success(&format!("Apply report written to {}", output_path.display()));

        Ok(())
    }
}

fn print_summary(ctx: &AppContext, report: &ApplyReport) {
    ctx.output.section("Apply Result");

    match report.outcome {
        ApplyOutcome::SuccessWithChanges | ApplyOutcome::SuccessNoChanges => {
            ctx.output.success(report.outcome.label())
        }
        ApplyOutcome::Failed => ctx.output.error(report.outcome.label()),
        ApplyOutcome::Unknown => ctx.output.warning(report.outcome.label()),
    }

    if let Some(version) = &report.terraform_version {
        ctx.output.key_value("Version", version);
    }

    let stats = &report.statistics;
    ctx.output.key_value("Created", &stats.created.to_string());
    ctx.output.key_value("Modified", &stats.modified.to_string());
    ctx.output.key_value("Destroyed", &stats.destroyed.to_string());
    if stats.failed_operations > 0 {
        ctx.output
            .key_value("Failed operations", &stats.failed_operations.to_string());
    }
    if let Some(duration) = report.total_duration {
        ctx.output.key_value("Duration", &format_duration(duration));
    }

    for error in report.errors() {
        match &error.resource_address {
            Some(address) => ctx.output.error(&format!("{} ({})", error.message, address)),
            None => ctx.output.error(&error.message),
        }
    }
}
