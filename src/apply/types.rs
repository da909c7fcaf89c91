use serde::Serialize;
use std::time::Duration;

use crate::diagnostics::Severity;

/// Overall result of an apply run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    SuccessWithChanges,
    SuccessNoChanges,
    Failed,
    Unknown,
}

impl ApplyOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyOutcome::SuccessWithChanges => "success_with_changes",
            ApplyOutcome::SuccessNoChanges => "success_no_changes",
            ApplyOutcome::Failed => "failed",
            ApplyOutcome::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplyOutcome::SuccessWithChanges => "Apply succeeded with changes",
            ApplyOutcome::SuccessNoChanges => "Apply succeeded with no changes",
            ApplyOutcome::Failed => "Apply failed",
            ApplyOutcome::Unknown => "Apply finished with an unknown result",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ApplyOutcome::SuccessWithChanges | ApplyOutcome::SuccessNoChanges
        )
    }
}

/// What was happening to a resource, as reported by the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationAction {
    Creating,
    Modifying,
    Destroying,
    Refreshing,
    Reading,
    Created,
    Modified,
    Destroyed,
}

impl OperationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationAction::Creating => "creating",
            OperationAction::Modifying => "modifying",
            OperationAction::Destroying => "destroying",
            OperationAction::Refreshing => "refreshing",
            OperationAction::Reading => "reading",
            OperationAction::Created => "created",
            OperationAction::Modified => "modified",
            OperationAction::Destroyed => "destroyed",
        }
    }

    /// Whether the operation changes infrastructure
    pub fn is_mutation(&self) -> bool {
        !matches!(self, OperationAction::Refreshing | OperationAction::Reading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    InProgress,
    Completed,
    /// Still in progress when a failed run ended
    Failed,
}

impl OperationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::InProgress => "in_progress",
            OperationStatus::Completed => "completed",
            OperationStatus::Failed => "failed",
        }
    }
}

/// One resource operation from the apply timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceOperation {
    pub address: String,
    pub resource_type: String,
    pub action: OperationAction,
    pub status: OperationStatus,
    pub duration: Option<Duration>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyStatistics {
    pub created: usize,
    pub modified: usize,
    pub destroyed: usize,
    pub refreshed: usize,
    /// created + modified + destroyed
    pub total: usize,
    pub failed_operations: usize,
}

/// An `Error:` or `Warning:` line from the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyDiagnostic {
    pub severity: Severity,
    pub message: String,
    /// Resource mentioned near an error
    pub resource_address: Option<String>,
    /// 1-based line in the cleaned log
    pub line_number: usize,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub outcome: ApplyOutcome,
    pub exit_code: i32,
    pub terraform_version: Option<String>,
    pub statistics: ApplyStatistics,
    pub operations: Vec<ResourceOperation>,
    pub diagnostics: Vec<ApplyDiagnostic>,
    /// Sum of operation durations, `None` when nothing was timed
    pub total_duration: Option<Duration>,
    pub has_changes: bool,
    /// Log with escape codes removed
    pub cleaned_log: String,
}

impl ApplyReport {
    pub fn errors(&self) -> impl Iterator<Item = &ApplyDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ApplyDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}

/// Render a duration the way Terraform prints it, e.g. "1m30s"
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    if seconds > 0 || out.is_empty() {
        out.push_str(&format!("{}s", seconds));
    }
    out
}
