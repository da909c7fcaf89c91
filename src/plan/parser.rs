//! Plan JSON parser for OpenTofu/Terraform
//!
//! This module converts the output of `tofu show -json <planfile>` into the
//! typed plan model. Document-level problems are fatal; a single malformed
//! resource record is skipped with a warning.

use serde_json::Value;

use super::error::{PlanError, PlanResult};
use super::types::{ActionType, OutputChange, ResourceChange, ResourceWarning, TerraformPlan};

/// Format versions of the JSON plan representation this parser understands
pub const SUPPORTED_FORMAT_VERSIONS: [&str; 3] = ["1.0", "1.1", "1.2"];

/// Parser for OpenTofu/Terraform JSON plans
pub struct PlanParser {
    supported_format_versions: Vec<String>,
}

impl Default for PlanParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanParser {
    pub fn new() -> Self {
        Self {
            supported_format_versions: SUPPORTED_FORMAT_VERSIONS
                .iter()
                .map(|v| v.to_string())
                .collect(),
        }
    }

    /// Parse a raw JSON document
    pub fn parse_str(&self, content: &str) -> PlanResult<TerraformPlan> {
        let document: Value = serde_json::from_str(content)?;
        self.parse_value(&document)
    }

    /// Parse an already decoded JSON document
    pub fn parse_value(&self, document: &Value) -> PlanResult<TerraformPlan> {
        self.validate(document)?;

        let terraform_version = document
            .get("terraform_version")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        let format_version = document
            .get("format_version")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");

        let mut plan = TerraformPlan::new(terraform_version, format_version);
        plan.timestamp = document
            .get("timestamp")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let records = document
            .get("resource_changes")
            .and_then(|v| v.as_array())
            .map(|a| a.as_slice())
            .unwrap_or(&[]);

        for (index, record) in records.iter().enumerate() {
            match self.parse_resource_change(record) {
                Ok(resource) => plan.add_resource(resource),
                Err(reason) => {
                    let address = record
                        .get("address")
                        .and_then(|a| a.as_str())
                        .map(|s| s.to_string());

                    log::warn!(
                        "Skipping resource change #{} ({}): {}",
                        index,
                        address.as_deref().unwrap_or("no address"),
                        reason
                    );

                    plan.warnings.push(ResourceWarning {
                        index,
                        address,
                        reason,
                    });
                }
            }
        }

        plan.output_changes = self.parse_output_changes(document.get("output_changes"));

        log::debug!(
            "Parsed plan: {} resource changes, {} outputs, {} skipped",
            plan.resource_changes.len(),
            plan.output_changes.len(),
            plan.warnings.len()
        );

        Ok(plan)
    }

    /// Check the document shape before reading any record
    fn validate(&self, document: &Value) -> PlanResult<()> {
        let object = document.as_object().ok_or(PlanError::NotAnObject)?;

        let format_version = object.get("format_version").and_then(|v| v.as_str());
        let supported = format_version
            .map(|v| self.supported_format_versions.iter().any(|s| s == v))
            .unwrap_or(false);

        if !supported {
            return Err(PlanError::UnsupportedFormatVersion {
                found: format_version.map(|s| s.to_string()),
                supported: self.supported_format_versions.clone(),
            });
        }

        // An explicit null is treated the same as an absent field
        match object.get("resource_changes") {
            None | Some(Value::Null) => Err(PlanError::MissingResourceChanges),
            Some(_) => Ok(()),
        }
    }

    /// Parse a single resource change record
    fn parse_resource_change(&self, record: &Value) -> Result<ResourceChange, String> {
        let record = record
            .as_object()
            .ok_or_else(|| "record is not an object".to_string())?;

        let address = record
            .get("address")
            .and_then(|a| a.as_str())
            .ok_or_else(|| "missing 'address'".to_string())?;

        let change = match record.get("change") {
            Some(Value::Object(change)) => change,
            Some(_) => return Err("'change' is not an object".to_string()),
            None => return Err("missing 'change'".to_string()),
        };

        let actions: Vec<&str> = match change.get("actions") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.iter().filter_map(|a| a.as_str()).collect(),
            Some(_) => return Err("'change.actions' is not a list".to_string()),
        };

        let mut resource = ResourceChange::new(address, normalize_actions(&actions));

        resource.provider_name = record
            .get("provider_name")
            .and_then(|p| p.as_str())
            .unwrap_or_default()
            .to_string();
        resource.before = non_null(change.get("before"));
        resource.after = non_null(change.get("after"));
        resource.before_sensitive = non_null(change.get("before_sensitive"));
        resource.after_sensitive = non_null(change.get("after_sensitive"));
        resource.after_unknown = non_null(change.get("after_unknown"));
        resource.replace_paths = parse_replace_paths(change.get("replace_paths"));

        Ok(resource)
    }

    /// Parse the optional `output_changes` object
    fn parse_output_changes(&self, outputs: Option<&Value>) -> Vec<OutputChange> {
        let Some(outputs) = outputs.and_then(|o| o.as_object()) else {
            return Vec::new();
        };

        let mut changes = Vec::new();

        for (name, change) in outputs {
            let Some(change) = change.as_object() else {
                log::warn!("Skipping output '{}': change is not an object", name);
                continue;
            };

            let actions: Vec<&str> = change
                .get("actions")
                .and_then(|a| a.as_array())
                .map(|items| items.iter().filter_map(|a| a.as_str()).collect())
                .unwrap_or_default();

            let is_true = |key: &str| change.get(key).and_then(|v| v.as_bool()).unwrap_or(false);

            changes.push(OutputChange {
                name: name.clone(),
                action: normalize_actions(&actions),
                before: non_null(change.get("before")),
                after: non_null(change.get("after")),
                sensitive: is_true("before_sensitive") || is_true("after_sensitive"),
                after_unknown: is_true("after_unknown"),
            });
        }

        changes.sort_by(|a, b| a.name.cmp(&b.name));
        changes
    }
}

/// Map the primitive actions reported for a resource to a single action
///
/// Precedence, first match wins: delete+create, create, delete, update,
/// read or no-op. Anything else (including an empty list) is `NoOp`.
pub fn normalize_actions(actions: &[&str]) -> ActionType {
    let has = |name: &str| actions.contains(&name);

    if has("delete") && has("create") {
        ActionType::Recreate
    } else if has("create") {
        ActionType::Create
    } else if has("delete") {
        ActionType::Delete
    } else if has("update") {
        ActionType::Update
    } else if has("read") || has("no-op") {
        ActionType::Read
    } else {
        ActionType::NoOp
    }
}

fn non_null(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

/// Replace paths are lists of segments; integer segments index into lists
fn parse_replace_paths(paths: Option<&Value>) -> Vec<Vec<String>> {
    paths
        .and_then(|p| p.as_array())
        .map(|paths| {
            paths
                .iter()
                .filter_map(|path| path.as_array())
                .map(|segments| {
                    segments
                        .iter()
                        .map(|segment| match segment {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect()
                })
                .collect()
        })
        .unwrap_or_default()
}
