use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde_json::{Value, json};

use super::templates;
use super::{COMPUTED_PLACEHOLDER, ReportOptions, SENSITIVE_PLACEHOLDER};
use crate::analysis::{AnalyzedResourceChange, PlanAnalysis, ResourceGroup};
use crate::apply::{ApplyDiagnostic, ApplyOutcome, ApplyReport, format_duration};
use crate::diagnostics::{Diagnostic, DiagnosticReport};
use crate::diff::{PropertyChange, PropertyChangeKind};
use crate::format::{DisplayMode, FormattedValue, format_value};
use crate::plan::{ActionType, OutputChange};

const PLAN_TEMPLATE: &str = "plan";
const ERROR_TEMPLATE: &str = "error";
const APPLY_TEMPLATE: &str = "apply";

/// Renders reports using Handlebars
pub struct HtmlRenderer {
    handlebars: Handlebars<'static>,
}

impl HtmlRenderer {
    /// Create a renderer with the embedded templates registered
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        handlebars
            .register_partial("styles", templates::STYLES)
            .context("Failed to register styles partial")?;
        handlebars
            .register_partial("footer", templates::FOOTER)
            .context("Failed to register footer partial")?;
        handlebars
            .register_partial("plan_script", templates::PLAN_SCRIPT)
            .context("Failed to register plan script partial")?;

        handlebars
            .register_template_string(PLAN_TEMPLATE, templates::PLAN_REPORT)
            .context("Failed to register plan report template")?;
        handlebars
            .register_template_string(ERROR_TEMPLATE, templates::ERROR_REPORT)
            .context("Failed to register error report template")?;
        handlebars
            .register_template_string(APPLY_TEMPLATE, templates::APPLY_REPORT)
            .context("Failed to register apply report template")?;

        Ok(Self { handlebars })
    }

    /// Render the plan report
    pub fn render_plan(&self, analysis: &PlanAnalysis, options: &ReportOptions) -> Result<String> {
        let data = plan_view(analysis, options);
        self.handlebars
            .render(PLAN_TEMPLATE, &data)
            .context("Failed to render plan report")
    }

    /// Render the report for a failed plan
    pub fn render_error(&self, report: &DiagnosticReport, options: &ReportOptions) -> Result<String> {
        let data = error_view(report, options);
        self.handlebars
            .render(ERROR_TEMPLATE, &data)
            .context("Failed to render error report")
    }

    /// Render the report for an apply run
    pub fn render_apply(&self, report: &ApplyReport, options: &ReportOptions) -> Result<String> {
        let data = apply_view(report, options);
        self.handlebars
            .render(APPLY_TEMPLATE, &data)
            .context("Failed to render apply report")
    }
}

fn common_view(options: &ReportOptions) -> Value {
    json!({
        "title": options.title(),
        "generated_at": options.generated_at_display(),
        "version": env!("CARGO_PKG_VERSION"),
        "build_url": options.config.build_url,
    })
}

fn merge(mut base: Value, extra: Value) -> Value {
    if let (Some(base_map), Value::Object(extra_map)) = (base.as_object_mut(), extra) {
        base_map.extend(extra_map);
    }
    base
}

fn plan_view(analysis: &PlanAnalysis, options: &ReportOptions) -> Value {
    let plan = &analysis.plan;
    let has_changes = analysis.has_changes();
    let show_sensitive = options.config.display.show_sensitive;

    let (theme, status_message) = if has_changes {
        ("theme-yellow", "Terraform: ran successfully and has changes")
    } else {
        ("theme-green", "Terraform: ran successfully with no changes")
    };

    let groups: Vec<Value> = analysis
        .resource_groups
        .iter()
        .map(|group| group_view(group, show_sensitive))
        .collect();

    let outputs: Vec<Value> = analysis
        .outputs()
        .iter()
        .map(|output| output_view(output, show_sensitive))
        .collect();

    merge(
        common_view(options),
        json!({
            "theme": theme,
            "status_message": status_message,
            "terraform_version": plan.terraform_version,
            "plan_timestamp": plan.timestamp,
            "has_changes": has_changes,
            "summary": plan.summary,
            "filters": options.config.property_filters(&analysis.all_property_names),
            "expand_all": options.config.display.expand_all,
            "groups": groups,
            "total_resources": analysis.total_resources(),
            "outputs": outputs,
            "plan_data": script_data(analysis),
        }),
    )
}

fn group_view(group: &ResourceGroup, show_sensitive: bool) -> Value {
    let changes: Vec<Value> = group
        .changes
        .iter()
        .map(|change| change_view(change, show_sensitive))
        .collect();

    json!({
        "resource_type": group.resource_type,
        "count": group.count(),
        "counts": group.action_counts().describe(),
        "changes": changes,
    })
}

fn change_view(change: &AnalyzedResourceChange, show_sensitive: bool) -> Value {
    let properties: Vec<Value> = change
        .property_changes
        .iter()
        .map(|prop| property_view(prop, show_sensitive))
        .collect();

    json!({
        "address": change.address(),
        "action": change.action().as_str(),
        "symbol": change.action().symbol(),
        "dependency_reason": change.dependency_reason(),
        "properties": properties,
    })
}

fn placeholder(text: &str) -> FormattedValue {
    FormattedValue {
        text: text.to_string(),
        mode: DisplayMode::Simple,
    }
}

fn blank() -> FormattedValue {
    FormattedValue {
        text: String::new(),
        mode: DisplayMode::Empty,
    }
}

/// Before/after cells of one property row
fn property_cells(prop: &PropertyChange, show_sensitive: bool) -> (FormattedValue, FormattedValue) {
    let kind = prop.kind();
    let hide = prop.is_sensitive && !show_sensitive;

    let before = match kind {
        PropertyChangeKind::Addition => blank(),
        _ if hide => placeholder(SENSITIVE_PLACEHOLDER),
        _ => format_value(&prop.before_value),
    };

    let after = if prop.is_computed {
        placeholder(COMPUTED_PLACEHOLDER)
    } else {
        match kind {
            PropertyChangeKind::Removal => blank(),
            _ if hide => placeholder(SENSITIVE_PLACEHOLDER),
            _ => format_value(&prop.after_value),
        }
    };

    (before, after)
}

fn property_view(prop: &PropertyChange, show_sensitive: bool) -> Value {
    let (before, after) = property_cells(prop, show_sensitive);

    json!({
        "path": prop.property_path,
        "base_property": prop.base_property(),
        "kind": prop.kind().as_str(),
        "before": { "text": before.text, "mode": before.mode.as_str() },
        "after": { "text": after.text, "mode": after.mode.as_str() },
        "sensitive": prop.is_sensitive,
        "computed": prop.is_computed,
    })
}

fn output_view(output: &OutputChange, show_sensitive: bool) -> Value {
    let current = match output.action {
        ActionType::Delete => output.before.as_ref(),
        _ => output.after.as_ref(),
    };
    let value = current.map(format_value).unwrap_or_else(blank);

    json!({
        "name": output.name,
        "action": output.action.as_str(),
        "sensitive": output.sensitive && !show_sensitive,
        "computed": output.after_unknown,
        "value": { "text": value.text, "mode": value.mode.as_str() },
    })
}

/// Data embedded for the report script, safe inside a `<script>` element
fn script_data(analysis: &PlanAnalysis) -> String {
    let actions: serde_json::Map<String, Value> = ActionType::ALL
        .iter()
        .map(|action| (action.as_str().to_string(), json!(analysis.action_counts[*action])))
        .collect();

    let data = json!({
        "summary": analysis.plan.summary,
        "actions": actions,
        "properties": analysis.all_property_names,
    });

    data.to_string().replace("</", "<\\/")
}

fn diagnostic_view(diagnostic: &Diagnostic) -> Value {
    json!({
        "message": diagnostic.message,
        "detail": diagnostic.detail,
    })
}

fn error_view(report: &DiagnosticReport, options: &ReportOptions) -> Value {
    let errors: Vec<Value> = report.errors.iter().map(diagnostic_view).collect();
    let warnings: Vec<Value> = report.warnings.iter().map(diagnostic_view).collect();

    merge(
        common_view(options),
        json!({
            "error_count": errors.len(),
            "warning_count": warnings.len(),
            "errors": errors,
            "warnings": warnings,
            "raw_output": report.raw_output,
        }),
    )
}

fn apply_diagnostic_view(diagnostic: &ApplyDiagnostic) -> Value {
    json!({
        "message": diagnostic.message,
        "line_number": diagnostic.line_number,
        "resource_address": diagnostic.resource_address,
    })
}

fn apply_view(report: &ApplyReport, options: &ReportOptions) -> Value {
    let theme = match report.outcome {
        ApplyOutcome::SuccessWithChanges => "theme-yellow",
        ApplyOutcome::SuccessNoChanges => "theme-green",
        ApplyOutcome::Failed => "theme-red",
        ApplyOutcome::Unknown => "theme-grey",
    };

    let errors: Vec<Value> = report.errors().map(apply_diagnostic_view).collect();
    let warnings: Vec<Value> = report.warnings().map(apply_diagnostic_view).collect();

    let operations: Vec<Value> = report
        .operations
        .iter()
        .map(|op| {
            json!({
                "address": op.address,
                "resource_type": op.resource_type,
                "action": op.action.as_str(),
                "status": op.status.as_str(),
                "duration": op.duration.map(format_duration),
            })
        })
        .collect();

    merge(
        common_view(options),
        json!({
            "theme": theme,
            "outcome": report.outcome.as_str(),
            "outcome_label": report.outcome.label(),
            "exit_code": report.exit_code,
            "terraform_version": report.terraform_version,
            "statistics": report.statistics,
            "total_duration": report.total_duration.map(format_duration),
            "error_count": errors.len(),
            "warning_count": warnings.len(),
            "errors": errors,
            "warnings": warnings,
            "operations": operations,
            "log": report.cleaned_log,
        }),
    )
}
