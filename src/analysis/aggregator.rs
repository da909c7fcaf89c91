use std::collections::{BTreeMap, BTreeSet};

use super::types::{AnalyzedResourceChange, PlanAnalysis, ResourceGroup};
use crate::diff::DiffEngine;
use crate::plan::{ActionCounts, ResourceChange, TerraformPlan};

/// Builds a `PlanAnalysis` from a parsed plan
#[derive(Default)]
pub struct PlanAnalyzer {
    engine: DiffEngine,
}

impl PlanAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: DiffEngine) -> Self {
        Self { engine }
    }

    pub fn analyze(&self, plan: TerraformPlan) -> PlanAnalysis {
        let analyzed: Vec<AnalyzedResourceChange> = plan
            .resource_changes
            .iter()
            .filter(|rc| rc.action.is_mutation())
            .map(|rc| self.analyze_resource(rc))
            .collect();

        let all_property_names: BTreeSet<String> = analyzed
            .iter()
            .flat_map(|change| change.property_changes.iter())
            .map(|prop| prop.base_property().to_string())
            .collect();

        let action_counts: ActionCounts = analyzed.iter().map(|c| c.action()).collect();

        log::debug!(
            "Analyzed {} of {} resource changes ({})",
            analyzed.len(),
            plan.resource_changes.len(),
            action_counts.describe()
        );

        PlanAnalysis {
            resource_groups: group_by_type(analyzed),
            all_property_names,
            action_counts,
            plan,
        }
    }

    fn analyze_resource(&self, resource: &ResourceChange) -> AnalyzedResourceChange {
        AnalyzedResourceChange {
            property_changes: self.engine.analyze(resource),
            resource_change: resource.clone(),
        }
    }
}

/// Group changes by resource type, ordinal order, keeping plan order within a group
fn group_by_type(changes: Vec<AnalyzedResourceChange>) -> Vec<ResourceGroup> {
    let mut groups: BTreeMap<String, Vec<AnalyzedResourceChange>> = BTreeMap::new();

    for change in changes {
        groups
            .entry(change.resource_type().to_string())
            .or_default()
            .push(change);
    }

    groups
        .into_iter()
        .map(|(resource_type, changes)| ResourceGroup {
            resource_type,
            changes,
        })
        .collect()
}
