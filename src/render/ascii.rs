use super::{COMPUTED_PLACEHOLDER, SENSITIVE_PLACEHOLDER};
use crate::analysis::{AnalyzedResourceChange, PlanAnalysis, ResourceGroup};
use crate::diff::{PropertyChange, PropertyChangeKind};
use crate::format::{DisplayMode, format_value, html_unescape};
use crate::plan::{ActionType, OutputChange, PlanSummary};
use serde_json::Value;

const PROPERTY_INDENT: &str = "      ";

/// Plain text renderer for terminal output
#[derive(Debug, Default)]
pub struct AsciiRenderer {
    show_sensitive: bool,
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_show_sensitive(mut self, show_sensitive: bool) -> Self {
        self.show_sensitive = show_sensitive;
        self
    }

    pub fn render(&self, analysis: &PlanAnalysis) -> String {
        let mut output = String::new();

        output.push_str(&self.render_summary(&analysis.plan.summary));

        for group in &analysis.resource_groups {
            output.push_str(&self.render_group(group));
        }

        if !analysis.outputs().is_empty() {
            output.push_str("Outputs:\n");
            for change in analysis.outputs() {
                output.push_str(&self.render_output(change));
            }
            output.push('\n');
        }

        output
    }

    /// Render summary section
    fn render_summary(&self, summary: &PlanSummary) -> String {
        let mut output = String::from("Plan Summary:\n");

        let mut parts = Vec::new();
        if summary.create > 0 {
            parts.push(format!("+{} to create", summary.create));
        }
        if summary.update > 0 {
            parts.push(format!("~{} to update", summary.update));
        }
        if summary.delete > 0 {
            parts.push(format!("-{} to delete", summary.delete));
        }

        if parts.is_empty() {
            output.push_str("  No changes.\n");
        } else {
            output.push_str(&format!("  {}\n", parts.join(", ")));
        }

        output.push('\n');
        output
    }

    fn render_group(&self, group: &ResourceGroup) -> String {
        let mut output = format!(
            "{} ({} resources: {})\n",
            group.resource_type,
            group.count(),
            group.action_counts().describe()
        );

        for change in &group.changes {
            output.push_str(&self.render_resource(change));
        }

        output.push('\n');
        output
    }

    fn render_resource(&self, change: &AnalyzedResourceChange) -> String {
        let action = change.action();
        let mut output = format!("  {} {} ({})\n", action.symbol(), change.address(), action.label());

        if change.has_dependency_changes() {
            output.push_str(&format!("{}# {}\n", PROPERTY_INDENT, change.dependency_reason()));
        }

        for prop in &change.property_changes {
            output.push_str(&self.render_property(prop));
        }

        output
    }

    fn render_property(&self, prop: &PropertyChange) -> String {
        let symbol = prop.kind().symbol();
        let path = &prop.property_path;

        let value = match prop.kind() {
            PropertyChangeKind::Addition => self.display(prop, &prop.after_value, prop.is_computed),
            PropertyChangeKind::Removal => self.display(prop, &prop.before_value, false),
            PropertyChangeKind::Modification => format!(
                "{} -> {}",
                self.display(prop, &prop.before_value, false),
                self.display(prop, &prop.after_value, prop.is_computed)
            ),
        };

        format!("{}{} {} = {}\n", PROPERTY_INDENT, symbol, path, value)
    }

    fn display(&self, prop: &PropertyChange, value: &Value, computed: bool) -> String {
        if computed {
            return COMPUTED_PLACEHOLDER.to_string();
        }
        if prop.is_sensitive && !self.show_sensitive {
            return SENSITIVE_PLACEHOLDER.to_string();
        }
        display_value(value)
    }

    fn render_output(&self, change: &OutputChange) -> String {
        let value = if change.after_unknown {
            COMPUTED_PLACEHOLDER.to_string()
        } else if change.sensitive && !self.show_sensitive {
            SENSITIVE_PLACEHOLDER.to_string()
        } else {
            let current = match change.action {
                ActionType::Delete => change.before.as_ref(),
                _ => change.after.as_ref(),
            };
            current.map(display_value).unwrap_or_else(|| "null".to_string())
        };

        format!("  {} {} = {}\n", change.action.symbol(), change.name, value)
    }
}

/// Terminal form of a value; strings are quoted, structures indented
fn display_value(value: &Value) -> String {
    let formatted = format_value(value);
    let text = html_unescape(&formatted.text);

    match formatted.mode {
        DisplayMode::Empty => match value {
            Value::Null => "null".to_string(),
            Value::String(_) => "\"\"".to_string(),
            _ => text_or_json(&text, value),
        },
        DisplayMode::Complex => text.replace('\n', &format!("\n{}  ", PROPERTY_INDENT)),
        DisplayMode::Simple | DisplayMode::LongSimple => match value {
            Value::String(_) => format!("\"{}\"", text),
            _ => text,
        },
    }
}

fn text_or_json(text: &str, value: &Value) -> String {
    if text.is_empty() {
        value.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::PlanAnalyzer;
    use crate::plan::PlanParser;
    use serde_json::json;

    fn sample_analysis() -> PlanAnalysis {
        let plan = PlanParser::new()
            .parse_value(&json!({
                "format_version": "1.2",
                "terraform_version": "1.6.0",
                "resource_changes": [
                    {
                        "address": "aws_instance.web",
                        "change": {
                            "actions": ["update"],
                            "before": {"instance_type": "t2.micro", "password": "a", "tags": {}},
                            "after": {"instance_type": "t3.micro", "password": "b", "tags": {"Env": "prod"}},
                            "after_sensitive": {"password": true}
                        }
                    },
                    {
                        "address": "aws_instance.new",
                        "change": {
                            "actions": ["create"],
                            "after": {"ami": "ami-1", "id": null, "count": 2},
                            "after_unknown": {"id": true}
                        }
                    },
                    {
                        "address": "aws_s3_bucket.old",
                        "change": {
                            "actions": ["delete"],
                            "before": {"bucket": "old-logs"}
                        }
                    },
                    {
                        "address": "aws_db_instance.main",
                        "change": {
                            "actions": ["create", "delete"],
                            "before": {"engine_version": "14"},
                            "after": {"engine_version": "15"},
                            "replace_paths": [["engine_version"]]
                        }
                    }
                ],
                "output_changes": {
                    "bucket": {"actions": ["delete"], "before": "old-logs"},
                    "token": {"actions": ["create"], "after": "t0k3n", "after_sensitive": true}
                }
            }))
            .unwrap();
        PlanAnalyzer::new().analyze(plan)
    }

    #[test]
    fn test_ascii_renderer_summary() {
        let output = AsciiRenderer::new().render(&sample_analysis());

        assert!(output.starts_with("Plan Summary:\n"));
        assert!(output.contains("+2 to create, ~1 to update, -2 to delete"));
    }

    #[test]
    fn test_ascii_renderer_resources() {
        let output = AsciiRenderer::new().render(&sample_analysis());

        assert!(output.contains("aws_instance (2 resources: 1 create, 1 update)"));
        assert!(output.contains("  ~ aws_instance.web (will be updated)"));
        assert!(output.contains("  + aws_instance.new (will be created)"));
        assert!(output.contains("  - aws_s3_bucket.old (will be destroyed)"));
        assert!(output.contains("  -/+ aws_db_instance.main (must be replaced)"));
        assert!(output.contains("# Recreated due to dependency change in: engine_version"));
    }

    #[test]
    fn test_ascii_renderer_properties() {
        let output = AsciiRenderer::new().render(&sample_analysis());

        assert!(output.contains("~ instance_type = \"t2.micro\" -> \"t3.micro\""));
        assert!(output.contains("+ tags.Env = \"prod\""));
        assert!(output.contains("+ ami = \"ami-1\""));
        assert!(output.contains("+ count = 2"));
        assert!(output.contains("+ id = (known after apply)"));
        assert!(output.contains("- bucket = \"old-logs\""));
    }

    #[test]
    fn test_sensitive_value_hidden() {
        let output = AsciiRenderer::new().render(&sample_analysis());

        assert!(output.contains("~ password = (sensitive) -> (sensitive)"));
        assert!(output.contains("+ token = (sensitive)"));
        assert!(!output.contains("t0k3n"));
    }

    #[test]
    fn test_sensitive_value_shown() {
        let output = AsciiRenderer::new()
            .with_show_sensitive(true)
            .render(&sample_analysis());

        assert!(output.contains("~ password = \"a\" -> \"b\""));
        assert!(output.contains("t0k3n"));
    }

    #[test]
    fn test_outputs() {
        let output = AsciiRenderer::new().render(&sample_analysis());

        assert!(output.contains("Outputs:\n"));
        assert!(output.contains("  - bucket = \"old-logs\""));
    }

    #[test]
    fn test_display_value_unescapes() {
        assert_eq!(display_value(&json!("a < b")), "\"a < b\"");
        assert_eq!(display_value(&json!(null)), "null");
        assert_eq!(display_value(&json!("")), "\"\"");
        assert_eq!(display_value(&json!([])), "[]");
        assert!(display_value(&json!({"k": "v"})).contains("\"k\": \"v\""));
    }

    #[test]
    fn test_no_changes() {
        let plan = PlanParser::new()
            .parse_value(&json!({"format_version": "1.1", "resource_changes": []}))
            .unwrap();
        let output = AsciiRenderer::new().render(&PlanAnalyzer::new().analyze(plan));

        assert_eq!(output, "Plan Summary:\n  No changes.\n\n");
    }
}
