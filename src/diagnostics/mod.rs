//! Diagnostics extraction from failed plan runs
//!
//! Collects errors and warnings from captured console output and from an
//! optional plan error payload, which may be JSON diagnostics or plain text.

use serde::Serialize;
use serde_json::Value;

const ERROR_KEYWORDS: [&str; 3] = ["error:", "failed:", "fatal:"];
const WARNING_KEYWORDS: [&str; 2] = ["warning:", "warn:"];

pub const FALLBACK_MESSAGE: &str = "Terraform plan failed with exit code 1";
const FALLBACK_DETAIL: &str = "No specific error details could be extracted from the output.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(message: &str, detail: &str) -> Self {
        Self {
            severity: Severity::Error,
            message: message.to_string(),
            detail: detail.to_string(),
        }
    }

    pub fn warning(message: &str, detail: &str) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.to_string(),
            detail: detail.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticReport {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    /// All input text, joined and trimmed
    pub raw_output: String,
}

impl DiagnosticReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Build a diagnostics report from console output and a plan error payload
pub fn extract(error_output: Option<&str>, plan_error: Option<&str>) -> DiagnosticReport {
    let mut report = DiagnosticReport::default();
    let mut raw = String::new();

    if let Some(text) = error_output.filter(|t| !t.is_empty()) {
        raw.push_str(text);
        raw.push('\n');
        extract_from_text(text, &mut report);
    }

    if let Some(payload) = plan_error.filter(|t| !t.is_empty()) {
        raw.push_str(payload);
        raw.push('\n');

        match serde_json::from_str::<Value>(payload) {
            Ok(json) if has_diagnostic_fields(&json) => extract_from_json(&json, &mut report),
            _ => extract_from_text(payload, &mut report),
        }
    }

    if !report.has_errors() && !report.has_warnings() {
        log::debug!("No diagnostics found in input, reporting a generic failure");
        report.errors.push(Diagnostic::error(FALLBACK_MESSAGE, FALLBACK_DETAIL));
    }

    report.raw_output = raw.trim().to_string();
    report
}

fn has_diagnostic_fields(json: &Value) -> bool {
    json.get("diagnostics").is_some() || json.get("errors").is_some()
}

fn extract_from_text(text: &str, report: &mut DiagnosticReport) {
    for line in text.lines().map(str::trim) {
        let lower = line.to_lowercase();

        if ERROR_KEYWORDS.iter().any(|k| lower.contains(k)) {
            report.errors.push(Diagnostic::error(line, ""));
        }
        if WARNING_KEYWORDS.iter().any(|k| lower.contains(k)) {
            report.warnings.push(Diagnostic::warning(line, ""));
        }
    }
}

fn extract_from_json(json: &Value, report: &mut DiagnosticReport) {
    let str_field = |value: &Value, key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

    for diagnostic in json
        .get("diagnostics")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let detail = str_field(diagnostic, "detail").unwrap_or_default();
        match diagnostic.get("severity").and_then(Value::as_str) {
            Some("error") => {
                let summary = str_field(diagnostic, "summary").unwrap_or_else(|| "Unknown error".to_string());
                report.errors.push(Diagnostic::error(&summary, &detail));
            }
            Some("warning") => {
                let summary = str_field(diagnostic, "summary").unwrap_or_else(|| "Unknown warning".to_string());
                report.warnings.push(Diagnostic::warning(&summary, &detail));
            }
            _ => {}
        }
    }

    for error in json.get("errors").and_then(Value::as_array).into_iter().flatten() {
        match error {
            Value::String(message) => report.errors.push(Diagnostic::error(message, "")),
            Value::Object(_) => {
                let message = str_field(error, "message").unwrap_or_else(|| error.to_string());
                let detail = str_field(error, "detail").unwrap_or_default();
                report.errors.push(Diagnostic::error(&message, &detail));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_extraction() {
        let output = "Initializing...\n  Error: Invalid reference  \nwarning: deprecated attribute\nPlan FAILED: see above\nWarn: something\n";
        let report = extract(Some(output), None);

        let errors: Vec<&str> = report.errors.iter().map(|e| e.message.as_str()).collect();
        let warnings: Vec<&str> = report.warnings.iter().map(|e| e.message.as_str()).collect();

        assert_eq!(errors, vec!["Error: Invalid reference", "Plan FAILED: see above"]);
        assert_eq!(warnings, vec!["warning: deprecated attribute", "Warn: something"]);
        assert_eq!(report.raw_output, output.trim());
    }

    #[test]
    fn test_json_diagnostics() {
        let payload = r#"{
            "diagnostics": [
                {"severity": "error", "summary": "Missing required argument", "detail": "The argument \"ami\" is required."},
                {"severity": "warning", "summary": "Deprecated"},
                {"severity": "error"}
            ],
            "errors": ["plain failure", {"message": "object failure", "detail": "more"}, {"code": 7}]
        }"#;

        let report = extract(None, Some(payload));

        assert_eq!(report.errors.len(), 5);
        assert_eq!(report.errors[0].message, "Missing required argument");
        assert_eq!(report.errors[0].detail, "The argument \"ami\" is required.");
        assert_eq!(report.errors[1].message, "Unknown error");
        assert_eq!(report.errors[2].message, "plain failure");
        assert_eq!(report.errors[3].detail, "more");
        assert_eq!(report.errors[4].message, r#"{"code":7}"#);

        assert_eq!(report.warnings, vec![Diagnostic::warning("Deprecated", "")]);
    }

    #[test]
    fn test_json_without_diagnostics_is_text() {
        let report = extract(None, Some(r#"{"message": "error: boom"}"#));
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].message.contains("error: boom"));
    }

    #[test]
    fn test_fallback_when_nothing_found() {
        let report = extract(Some("all good here"), None);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].message, FALLBACK_MESSAGE);
        assert!(!report.has_warnings());

        let empty = extract(None, None);
        assert_eq!(empty.errors[0].message, FALLBACK_MESSAGE);
        assert_eq!(empty.raw_output, "");
    }

    #[test]
    fn test_warnings_alone_suppress_fallback() {
        let report = extract(Some("Warning: provider is old"), None);
        assert!(!report.has_errors());
        assert!(report.has_warnings());
    }

    #[test]
    fn test_both_inputs_are_combined() {
        let report = extract(Some("Error: one"), Some("Error: two"));

        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.raw_output, "Error: one\nError: two");
    }
}
