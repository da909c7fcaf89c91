//! Data types for parsed infrastructure change plans
//!
//! This module defines the typed representation of a `terraform show -json`
//! (or `tofu show -json`) plan document: per-resource changes, output changes
//! and the change-count summary computed while parsing.

use serde::Serialize;
use serde_json::Value;
use std::ops::Index;

/// The single discrete action planned for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionType {
    /// Resource will be created
    Create,
    /// Resource will be updated in-place
    Update,
    /// Resource will be destroyed
    Delete,
    /// Resource will be destroyed and created again
    Recreate,
    /// Data source read
    Read,
    /// No changes
    NoOp,
}

impl ActionType {
    /// Every action, in counter-index order
    pub const ALL: [ActionType; 6] = [
        ActionType::Create,
        ActionType::Update,
        ActionType::Delete,
        ActionType::Recreate,
        ActionType::Read,
        ActionType::NoOp,
    ];

    /// Stable machine-readable name (used as CSS class and in embedded data)
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Create => "create",
            ActionType::Update => "update",
            ActionType::Delete => "delete",
            ActionType::Recreate => "recreate",
            ActionType::Read => "read",
            ActionType::NoOp => "no-op",
        }
    }

    /// Get the symbol used to represent this action
    pub fn symbol(&self) -> &'static str {
        match self {
            ActionType::Create => "+",
            ActionType::Update => "~",
            ActionType::Delete => "-",
            ActionType::Recreate => "-/+",
            ActionType::Read => "<=",
            ActionType::NoOp => " ",
        }
    }

    /// Get the label for this action
    pub fn label(&self) -> &'static str {
        match self {
            ActionType::Create => "will be created",
            ActionType::Update => "will be updated",
            ActionType::Delete => "will be destroyed",
            ActionType::Recreate => "must be replaced",
            ActionType::Read => "will be read",
            ActionType::NoOp => "no changes",
        }
    }

    /// Whether the action mutates infrastructure
    pub fn is_mutation(&self) -> bool {
        !matches!(self, ActionType::Read | ActionType::NoOp)
    }

    fn index(&self) -> usize {
        match self {
            ActionType::Create => 0,
            ActionType::Update => 1,
            ActionType::Delete => 2,
            ActionType::Recreate => 3,
            ActionType::Read => 4,
            ActionType::NoOp => 5,
        }
    }
}

/// Per-action counters, one slot per `ActionType`, all starting at zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionCounts([usize; 6]);

impl ActionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more resource with the given action
    pub fn record(&mut self, action: ActionType) {
        self.0[action.index()] += 1;
    }

    pub fn get(&self, action: ActionType) -> usize {
        self.0[action.index()]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Actions with a non-zero count, in `ActionType::ALL` order
    pub fn present(&self) -> impl Iterator<Item = (ActionType, usize)> + '_ {
        ActionType::ALL
            .iter()
            .map(|action| (*action, self.get(*action)))
            .filter(|(_, count)| *count > 0)
    }

    /// Human readable form, e.g. "2 create, 1 delete"
    pub fn describe(&self) -> String {
        self.present()
            .map(|(action, count)| format!("{} {}", count, action.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Index<ActionType> for ActionCounts {
    type Output = usize;

    fn index(&self, action: ActionType) -> &usize {
        &self.0[action.index()]
    }
}

impl FromIterator<ActionType> for ActionCounts {
    fn from_iter<I: IntoIterator<Item = ActionType>>(iter: I) -> Self {
        let mut counts = ActionCounts::new();
        for action in iter {
            counts.record(action);
        }
        counts
    }
}

/// One planned mutation to one infrastructure resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceChange {
    /// Full resource address (e.g., "aws_instance.example", "module.vpc.aws_subnet.main")
    pub address: String,

    /// Resource type (e.g., "aws_instance"), "unknown" for malformed addresses
    pub resource_type: String,

    /// Resource name (e.g., "example")
    pub resource_name: String,

    /// Module path if applicable (e.g., "module.vpc")
    pub module_path: Option<String>,

    /// Provider that manages the resource
    pub provider_name: String,

    /// Normalized action
    pub action: ActionType,

    /// Snapshot before the change (absent for creations)
    pub before: Option<Value>,

    /// Snapshot after the change (absent for deletions)
    pub after: Option<Value>,

    /// Tree mirroring `before`, `true` at sensitive leaves
    pub before_sensitive: Option<Value>,

    /// Tree mirroring `after`, `true` at sensitive leaves
    pub after_sensitive: Option<Value>,

    /// Tree mirroring `after`, `true` where the value is known only after apply
    pub after_unknown: Option<Value>,

    /// Property paths that forced a replacement
    pub replace_paths: Vec<Vec<String>>,
}

impl ResourceChange {
    /// Create a resource change with empty snapshots
    pub fn new(address: &str, action: ActionType) -> Self {
        let (module_path, resource_type, resource_name) = Self::parse_address(address);

        Self {
            address: address.to_string(),
            resource_type,
            resource_name,
            module_path,
            provider_name: String::new(),
            action,
            before: None,
            after: None,
            before_sensitive: None,
            after_sensitive: None,
            after_unknown: None,
            replace_paths: Vec::new(),
        }
    }

    /// Split an address into (module path, type, name)
    ///
    /// The last two dot-separated segments are the type and the name. An
    /// address with fewer than two segments has type "unknown" and the whole
    /// address as its name.
    pub fn parse_address(address: &str) -> (Option<String>, String, String) {
        let parts: Vec<&str> = address.split('.').collect();

        if parts.len() < 2 {
            return (None, "unknown".to_string(), address.to_string());
        }

        let resource_type = parts[parts.len() - 2].to_string();
        let resource_name = parts[parts.len() - 1].to_string();
        let module_path = if parts.len() > 2 {
            Some(parts[..parts.len() - 2].join("."))
        } else {
            None
        };

        (module_path, resource_type, resource_name)
    }

    pub fn with_before(mut self, before: Value) -> Self {
        self.before = Some(before);
        self
    }

    pub fn with_after(mut self, after: Value) -> Self {
        self.after = Some(after);
        self
    }

    pub fn with_before_sensitive(mut self, markers: Value) -> Self {
        self.before_sensitive = Some(markers);
        self
    }

    pub fn with_after_sensitive(mut self, markers: Value) -> Self {
        self.after_sensitive = Some(markers);
        self
    }

    pub fn with_after_unknown(mut self, markers: Value) -> Self {
        self.after_unknown = Some(markers);
        self
    }

    pub fn with_replace_paths(mut self, paths: Vec<Vec<String>>) -> Self {
        self.replace_paths = paths;
        self
    }
}

/// A planned change to a root module output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputChange {
    pub name: String,
    pub action: ActionType,
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub sensitive: bool,
    /// The value is known only after apply
    pub after_unknown: bool,
}

/// A resource change record that could not be interpreted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceWarning {
    /// Position of the record in `resource_changes`
    pub index: usize,
    /// Address, when the record carried one
    pub address: Option<String>,
    pub reason: String,
}

/// Summary statistics counted by the parser
///
/// A recreate counts once as a creation and once as a deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    /// Resources that are only read or left untouched
    pub unchanged: usize,
}

impl PlanSummary {
    pub fn record(&mut self, action: ActionType) {
        match action {
            ActionType::Create => self.create += 1,
            ActionType::Update => self.update += 1,
            ActionType::Delete => self.delete += 1,
            ActionType::Recreate => {
                self.create += 1;
                self.delete += 1;
            }
            ActionType::Read | ActionType::NoOp => self.unchanged += 1,
        }
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total_changes() > 0
    }

    /// Get total number of changes
    pub fn total_changes(&self) -> usize {
        self.create + self.update + self.delete
    }
}

/// A parsed plan document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerraformPlan {
    pub terraform_version: String,
    pub format_version: String,
    pub timestamp: Option<String>,
    pub resource_changes: Vec<ResourceChange>,
    pub output_changes: Vec<OutputChange>,
    pub summary: PlanSummary,
    /// Records skipped while parsing
    pub warnings: Vec<ResourceWarning>,
}

impl TerraformPlan {
    /// Create an empty plan for the given versions
    pub fn new(terraform_version: &str, format_version: &str) -> Self {
        Self {
            terraform_version: terraform_version.to_string(),
            format_version: format_version.to_string(),
            timestamp: None,
            resource_changes: Vec::new(),
            output_changes: Vec::new(),
            summary: PlanSummary::default(),
            warnings: Vec::new(),
        }
    }

    /// Add a resource change and update summary
    pub fn add_resource(&mut self, resource: ResourceChange) {
        self.summary.record(resource.action);
        self.resource_changes.push(resource);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_symbols() {
        assert_eq!(ActionType::Create.symbol(), "+");
        assert_eq!(ActionType::Update.symbol(), "~");
        assert_eq!(ActionType::Delete.symbol(), "-");
        assert_eq!(ActionType::Recreate.symbol(), "-/+");
    }

    #[test]
    fn test_action_counts_start_at_zero() {
        let counts = ActionCounts::new();

        for action in ActionType::ALL {
            assert_eq!(counts[action], 0);
        }
        assert_eq!(counts.total(), 0);
        assert_eq!(counts.describe(), "");
    }

    #[test]
    fn test_action_counts_collect() {
        let counts: ActionCounts = [
            ActionType::Create,
            ActionType::Delete,
            ActionType::Create,
        ]
        .into_iter()
        .collect();

        assert_eq!(counts[ActionType::Create], 2);
        assert_eq!(counts[ActionType::Delete], 1);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.describe(), "2 create, 1 delete");
    }

    #[test]
    fn test_resource_address_parsing() {
        let resource = ResourceChange::new("aws_instance.example", ActionType::Create);
        assert_eq!(resource.resource_type, "aws_instance");
        assert_eq!(resource.resource_name, "example");
        assert!(resource.module_path.is_none());

        let module_resource = ResourceChange::new("module.vpc.aws_subnet.main", ActionType::Update);
        assert_eq!(module_resource.module_path, Some("module.vpc".to_string()));
        assert_eq!(module_resource.resource_type, "aws_subnet");
        assert_eq!(module_resource.resource_name, "main");
    }

    #[test]
    fn test_malformed_address() {
        let resource = ResourceChange::new("orphan", ActionType::Update);
        assert_eq!(resource.resource_type, "unknown");
        assert_eq!(resource.resource_name, "orphan");

        let empty = ResourceChange::new("", ActionType::Update);
        assert_eq!(empty.resource_type, "unknown");
        assert_eq!(empty.resource_name, "");
    }

    #[test]
    fn test_plan_summary_counts_recreate_twice() {
        let mut plan = TerraformPlan::new("1.6.0", "1.2");
        assert!(!plan.summary.has_changes());

        plan.add_resource(ResourceChange::new("aws_instance.a", ActionType::Create));
        plan.add_resource(ResourceChange::new("aws_instance.b", ActionType::Update));
        plan.add_resource(ResourceChange::new("aws_instance.c", ActionType::Recreate));
        plan.add_resource(ResourceChange::new("data.aws_ami.d", ActionType::Read));

        assert!(plan.summary.has_changes());
        assert_eq!(plan.summary.create, 2);
        assert_eq!(plan.summary.update, 1);
        assert_eq!(plan.summary.delete, 1);
        assert_eq!(plan.summary.unchanged, 1);
        assert_eq!(plan.summary.total_changes(), 4);
    }
}
