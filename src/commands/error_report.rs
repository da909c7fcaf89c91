use crate::context::Context as AppContext;
use crate::diagnostics::{self, DiagnosticReport};
use crate::render::{HtmlRenderer, ReportOptions};
use anyhow::{Context, Result};
use std::io::{IsTerminal, Read};
use std::path::Path;

const DEFAULT_NAME: &str = "plan-error";

#[derive(Debug, Clone)]
pub struct ErrorReportRequest {
    /// Captured console output; stdin when absent
    pub input: Option<String>,
    /// Plan error payload, JSON diagnostics or text
    pub plan_error: Option<String>,
    pub name: Option<String>,
    pub output_dir: String,
}

impl ErrorReportRequest {
    pub fn new() -> Self {
        Self {
            input: None,
            plan_error: None,
            name: None,
            output_dir: ".".to_string(),
        }
    }
}

impl Default for ErrorReportRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles the 'error-report' command - renders diagnostics of a failed plan
pub struct ErrorReportCommand;

impl ErrorReportCommand {
    /// Execute the error-report command
    pub fn execute(ctx: &AppContext, request: &ErrorReportRequest) -> Result<()> {
        let error_output = match &request.input {
            Some(path) => Some(read_file(ctx, path)?),
            None => read_stdin()?,
        };
        let plan_error = request
            .plan_error
            .as_deref()
            .map(|path| read_file(ctx, path))
            .transpose()?;

        let report = diagnostics::extract(error_output.as_deref(), plan_error.as_deref());

        let name = request.name.as_deref().unwrap_or(DEFAULT_NAME);
        let html = HtmlRenderer::new()?.render_error(&report, &ReportOptions::new(name))?;

        let output_path = Path::new(&request.output_dir).join(format!("{}.html", name));
        ctx.fs.write(&output_path, &html)?;

        print_summary(ctx, &report);
        ctx.output
            .success(&format!("Error report written to {}", output_path.display()));

        Ok(())
    }
}

fn read_file(ctx: &AppContext, path: &str) -> Result<String> {
    ctx.fs
        .read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read {}", path))
}

/// Piped stdin, nothing when attached to a terminal
fn read_stdin() -> Result<Option<String>> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin
        .read_to_string(&mut buffer)
        .context("Failed to read error output from stdin")?;
    Ok(Some(buffer))
}

fn print_summary(ctx: &AppContext, report: &DiagnosticReport) {
    ctx.output.section("Plan Diagnostics");
    ctx.output
        .key_value("Errors", &report.errors.len().to_string());
    ctx.output
        .key_value("Warnings", &report.warnings.len().to_string());

    for error in &report.errors {
        ctx.output.error(&error.message);
    }
    for warning in &report.warnings {
        ctx.output.warning(&warning.message);
    }
}
