use std::collections::BTreeSet;

use crate::diff::PropertyChange;
use crate::plan::{ActionCounts, ActionType, OutputChange, ResourceChange, TerraformPlan};

/// A resource change together with its property-level diff
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedResourceChange {
    pub resource_change: ResourceChange,
    pub property_changes: Vec<PropertyChange>,
}

impl AnalyzedResourceChange {
    pub fn address(&self) -> &str {
        &self.resource_change.address
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_change.resource_type
    }

    pub fn action(&self) -> ActionType {
        self.resource_change.action
    }

    pub fn has_property_changes(&self) -> bool {
        !self.property_changes.is_empty()
    }

    /// The resource is replaced because of attributes listed in `replace_paths`
    pub fn has_dependency_changes(&self) -> bool {
        !self.resource_change.replace_paths.is_empty()
    }

    /// Human readable explanation of a replacement, empty when there is none
    pub fn dependency_reason(&self) -> String {
        let paths: Vec<&str> = self
            .resource_change
            .replace_paths
            .iter()
            .map(|path| path.first().map(String::as_str).unwrap_or("unknown"))
            .collect();

        match paths.len() {
            0 => String::new(),
            1 => format!("Recreated due to dependency change in: {}", paths[0]),
            _ => format!("Recreated due to dependency changes in: {}", paths.join(", ")),
        }
    }
}

/// All analyzed changes sharing one resource type
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceGroup {
    pub resource_type: String,
    pub changes: Vec<AnalyzedResourceChange>,
}

impl ResourceGroup {
    pub fn count(&self) -> usize {
        self.changes.len()
    }

    pub fn action_counts(&self) -> ActionCounts {
        self.changes.iter().map(|c| c.action()).collect()
    }
}

/// The result of analyzing a plan, handed to the renderers
#[derive(Debug, Clone, PartialEq)]
pub struct PlanAnalysis {
    pub plan: TerraformPlan,
    /// Groups sorted by resource type
    pub resource_groups: Vec<ResourceGroup>,
    /// Distinct first path segments of every property change
    pub all_property_names: BTreeSet<String>,
    /// Recount over the analyzed (mutating) changes
    pub action_counts: ActionCounts,
}

impl PlanAnalysis {
    /// Headline flag, taken from the parser's summary
    pub fn has_changes(&self) -> bool {
        self.plan.summary.has_changes()
    }

    /// Every parsed resource change, reads and no-ops included
    pub fn total_resources(&self) -> usize {
        self.plan.resource_changes.len()
    }

    /// Resource changes that made it into a group
    pub fn changed_resources(&self) -> usize {
        self.resource_groups.iter().map(ResourceGroup::count).sum()
    }

    pub fn outputs(&self) -> &[OutputChange] {
        &self.plan.output_changes
    }
}
