use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;

use super::types::{
    ApplyDiagnostic, ApplyOutcome, ApplyReport, ApplyStatistics, OperationAction,
    OperationStatus, ResourceOperation,
};
use crate::diagnostics::Severity;
use crate::plan::ResourceChange;

/// Lines searched on each side of an error for the resource it concerns
const ERROR_CONTEXT_LINES: usize = 5;

/// Address prefixes of common providers, used when an error has no `with` line
const PROVIDER_PREFIXES: [&str; 4] = ["aws_", "azurerm_", "google_", "ibm_"];

lazy_static! {
    static ref ANSI_ESCAPE: Regex =
        Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("Invalid ANSI escape regex");
    static ref BLANK_RUNS: Regex = Regex::new(r"\n{3,}").expect("Invalid blank line regex");
    static ref DURATION_PART: Regex = Regex::new(r"(\d+)([smh])").expect("Invalid duration regex");
}

/// Parser for apply console output
pub struct ApplyLogParser {
    start_patterns: Vec<(OperationAction, Regex)>,
    completion_patterns: Vec<(OperationAction, Regex)>,
    apply_complete_pattern: Regex,
    no_changes_pattern: Regex,
    error_pattern: Regex,
    warning_pattern: Regex,
    version_pattern: Regex,
    with_address_pattern: Regex,
}

impl Default for ApplyLogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplyLogParser {
    /// Create a new parser with compiled regex patterns
    pub fn new() -> Self {
        let start = |verb: &str| {
            Regex::new(&format!(r"^(.+?): {}\.\.\.", verb)).expect("Invalid operation start regex")
        };
        let completion = |verb: &str| {
            Regex::new(&format!(r"^(.+?): {} complete after (\S+)", verb))
                .expect("Invalid operation completion regex")
        };

        Self {
            // aws_instance.web: Creating...
            start_patterns: vec![
                (OperationAction::Creating, start("Creating")),
                (OperationAction::Modifying, start("Modifying")),
                (OperationAction::Destroying, start("Destroying")),
                (OperationAction::Refreshing, start("Refreshing state")),
                (OperationAction::Reading, start("Reading")),
            ],

            // aws_instance.web: Creation complete after 42s [id=i-0abc]
            completion_patterns: vec![
                (OperationAction::Created, completion("Creation")),
                (OperationAction::Modified, completion("Modifications")),
                (OperationAction::Destroyed, completion("Destruction")),
                (OperationAction::Reading, completion("Read")),
                (
                    OperationAction::Refreshing,
                    Regex::new(r"^(.+?): Refresh complete(?: after (\S+))?")
                        .expect("Invalid refresh completion regex"),
                ),
            ],

            apply_complete_pattern: Regex::new(
                r"Apply complete! Resources: (\d+) added, (\d+) changed, (\d+) destroyed\.",
            )
            .expect("Invalid apply complete regex"),

            no_changes_pattern: Regex::new(
                r"No changes\. (?:Your )?[Ii]nfrastructure matches the configuration\.",
            )
            .expect("Invalid no changes regex"),

            error_pattern: Regex::new(r"^Error: (.+)").expect("Invalid error regex"),

            warning_pattern: Regex::new(r"^Warning: (.+)").expect("Invalid warning regex"),

            version_pattern: Regex::new(r"(?:Terraform|OpenTofu) v(\d+\.\d+\.\d+)")
                .expect("Invalid version regex"),

            // │   with module.app.aws_instance.web[0],
            with_address_pattern: Regex::new(r"^with ([^\s,]+),?$")
                .expect("Invalid resource reference regex"),
        }
    }

    /// Parse an apply log together with the process exit code
    pub fn parse(&self, log: &str, exit_code: i32) -> ApplyReport {
        let cleaned = clean_log(log);
        let lines: Vec<&str> = cleaned.lines().collect();

        let outcome = self.determine_outcome(exit_code, &cleaned);
        let mut operations = self.parse_operations(&lines);

        if outcome == ApplyOutcome::Failed {
            for op in operations
                .iter_mut()
                .filter(|op| op.status == OperationStatus::InProgress && op.action.is_mutation())
            {
                op.status = OperationStatus::Failed;
            }
        }

        let statistics = self.parse_statistics(&cleaned, &operations);
        let diagnostics = self.parse_diagnostics(&lines);

        let total = operations
            .iter()
            .filter_map(|op| op.duration)
            .fold(Duration::ZERO, Duration::saturating_add);
        let total_duration = (!total.is_zero()).then_some(total);

        log::debug!(
            "Parsed apply log: {} operations, {} diagnostics, outcome {}",
            operations.len(),
            diagnostics.len(),
            outcome.as_str()
        );

        ApplyReport {
            outcome,
            exit_code,
            terraform_version: self
                .version_pattern
                .captures(&cleaned)
                .map(|caps| caps[1].to_string()),
            has_changes: statistics.total > 0,
            statistics,
            operations,
            diagnostics,
            total_duration,
            cleaned_log: cleaned,
        }
    }

    fn determine_outcome(&self, exit_code: i32, log: &str) -> ApplyOutcome {
        match exit_code {
            0 if self.no_changes_pattern.is_match(log) => ApplyOutcome::SuccessNoChanges,
            0 if self.apply_complete_pattern.is_match(log) => ApplyOutcome::SuccessWithChanges,
            0 => ApplyOutcome::SuccessNoChanges,
            1 => ApplyOutcome::Failed,
            2 => ApplyOutcome::SuccessWithChanges,
            _ => ApplyOutcome::Unknown,
        }
    }

    fn parse_operations(&self, lines: &[&str]) -> Vec<ResourceOperation> {
        let mut operations: Vec<ResourceOperation> = Vec::new();

        for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
            if let Some((action, address)) = match_address(&self.start_patterns, line) {
                operations.push(new_operation(address, action, OperationStatus::InProgress, None));
                continue;
            }

            let Some((action, caps)) = self
                .completion_patterns
                .iter()
                .find_map(|(action, re)| re.captures(line).map(|caps| (*action, caps)))
            else {
                continue;
            };

            let address = caps[1].trim();
            let duration = caps.get(2).and_then(|m| parse_duration(m.as_str()));

            match operations
                .iter_mut()
                .rev()
                .find(|op| op.address == address && op.status == OperationStatus::InProgress)
            {
                Some(op) => {
                    op.action = action;
                    op.status = OperationStatus::Completed;
                    op.duration = duration;
                }
                None => operations.push(new_operation(
                    address,
                    action,
                    OperationStatus::Completed,
                    duration,
                )),
            }
        }

        operations
    }

    fn parse_statistics(&self, log: &str, operations: &[ResourceOperation]) -> ApplyStatistics {
        let mut stats = ApplyStatistics::default();

        for op in operations {
            match op.action {
                OperationAction::Created => stats.created += 1,
                OperationAction::Modified => stats.modified += 1,
                OperationAction::Destroyed => stats.destroyed += 1,
                OperationAction::Refreshing => stats.refreshed += 1,
                _ => {}
            }
            if op.status == OperationStatus::Failed {
                stats.failed_operations += 1;
            }
        }

        // The summary line is authoritative when present
        if let Some(caps) = self.apply_complete_pattern.captures(log) {
            let count = |i: usize| caps[i].parse::<usize>().unwrap_or(0);
            stats.created = count(1);
            stats.modified = count(2);
            stats.destroyed = count(3);
        }

        stats.total = stats.created + stats.modified + stats.destroyed;
        stats
    }

    fn parse_diagnostics(&self, lines: &[&str]) -> Vec<ApplyDiagnostic> {
        let mut diagnostics = Vec::new();

        for (i, raw) in lines.iter().enumerate() {
            let line = strip_box(raw);

            if let Some(caps) = self.error_pattern.captures(line) {
                diagnostics.push(ApplyDiagnostic {
                    severity: Severity::Error,
                    message: caps[1].trim().to_string(),
                    resource_address: self.find_nearby_resource(lines, i),
                    line_number: i + 1,
                    context: line.to_string(),
                });
            } else if let Some(caps) = self.warning_pattern.captures(line) {
                diagnostics.push(ApplyDiagnostic {
                    severity: Severity::Warning,
                    message: caps[1].trim().to_string(),
                    resource_address: None,
                    line_number: i + 1,
                    context: line.to_string(),
                });
            }
        }

        diagnostics
    }

    /// Resource address mentioned within a few lines of `index`
    ///
    /// A `with <address>,` reference wins, followed by the closest line that
    /// starts with a known provider prefix.
    fn find_nearby_resource(&self, lines: &[&str], index: usize) -> Option<String> {
        let start = index.saturating_sub(ERROR_CONTEXT_LINES);
        let end = (index + ERROR_CONTEXT_LINES + 1).min(lines.len());
        let window: Vec<&str> = lines[start..end].iter().map(|l| strip_box(l)).collect();

        let referenced = window.iter().find_map(|line| {
            self.with_address_pattern
                .captures(line)
                .map(|caps| caps[1].to_string())
        });

        referenced.or_else(|| {
            window
                .iter()
                .filter(|line| line.contains('.'))
                .filter(|line| PROVIDER_PREFIXES.iter().any(|p| line.starts_with(p)))
                .map(|line| line.split(':').next().unwrap_or_default().trim().to_string())
                .next()
        })
    }
}

fn match_address<'a>(
    patterns: &[(OperationAction, Regex)],
    line: &'a str,
) -> Option<(OperationAction, &'a str)> {
    patterns.iter().find_map(|(action, re)| {
        re.captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| (*action, m.as_str().trim()))
    })
}

fn new_operation(
    address: &str,
    action: OperationAction,
    status: OperationStatus,
    duration: Option<Duration>,
) -> ResourceOperation {
    let (_, resource_type, _) = ResourceChange::parse_address(address);
    ResourceOperation {
        address: address.to_string(),
        resource_type,
        action,
        status,
        duration,
    }
}

/// Remove escape codes, normalise line endings and collapse blank runs
pub fn clean_log(log: &str) -> String {
    let without_ansi = ANSI_ESCAPE.replace_all(log, "");
    let normalized = without_ansi.replace("\r\n", "\n").replace('\r', "\n");
    BLANK_RUNS
        .replace_all(&normalized, "\n\n")
        .trim()
        .to_string()
}

/// Parse a Terraform duration such as "42s", "1m30s" or "2h5m"; zero is `None`
///
/// Parts that do not fit in a `u64` of seconds are dropped.
pub fn parse_duration(text: &str) -> Option<Duration> {
    let seconds = DURATION_PART
        .captures_iter(text)
        .filter_map(|caps| {
            let value = caps[1].parse::<u64>().ok()?;
            match &caps[2] {
                "s" => Some(value),
                "m" => value.checked_mul(60),
                "h" => value.checked_mul(3600),
                _ => None,
            }
        })
        .fold(0u64, |total, part| total.checked_add(part).unwrap_or(total));

    (seconds > 0).then(|| Duration::from_secs(seconds))
}

/// Trim a line and drop the box drawing Terraform puts around diagnostics
fn strip_box(line: &str) -> &str {
    line.trim()
        .trim_start_matches(['│', '╷', '╵'])
        .trim()
}
