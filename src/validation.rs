//! Advisory input validation for simulation workloads.
//!
//! Checks raw process parameters before a run. Findings are advisory: the
//! runner logs them and proceeds. Detects:
//! - Empty workloads
//! - Duplicate explicit IDs
//! - Non-positive CPU times
//! - Priorities outside `MIN_PRIORITY..=MAX_PRIORITY` (clamped at bucketing)
//!
//! Invalid initial executed times are not reported here; they abort the run
//! at process construction.

use std::collections::HashSet;

use crate::models::{ProcessParams, MAX_PRIORITY, MIN_PRIORITY};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationIssue>>;

/// A validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Issue category.
    pub kind: ValidationIssueKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssueKind {
    /// No process was supplied.
    EmptyWorkload,
    /// Two processes share the same explicit ID.
    DuplicateId,
    /// A process requires zero or negative CPU time.
    NonPositiveCpuTime,
    /// A priority will be clamped into range.
    PriorityOutOfRange,
}

impl ValidationIssue {
    fn new(kind: ValidationIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a workload.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(issues)` with every finding.
pub fn validate_processes(processes: &[ProcessParams]) -> ValidationResult {
    let mut issues = Vec::new();

    if processes.is_empty() {
        issues.push(ValidationIssue::new(
            ValidationIssueKind::EmptyWorkload,
            "No processes to schedule",
        ));
    }

    let mut ids = HashSet::new();
    for (index, params) in processes.iter().enumerate() {
        let label = params
            .id
            .map_or_else(|| format!("#{index}"), |id| format!("P{id}"));

        if let Some(id) = params.id {
            if !ids.insert(id) {
                issues.push(ValidationIssue::new(
                    ValidationIssueKind::DuplicateId,
                    format!("Duplicate process ID: {id}"),
                ));
            }
        }

        if params.cpu_time <= 0 {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::NonPositiveCpuTime,
                format!("Process {label} requires {} CPU units", params.cpu_time),
            ));
        }

        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&params.priority) {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::PriorityOutOfRange,
                format!(
                    "Process {label} priority {} is outside {MIN_PRIORITY}..={MAX_PRIORITY} and will be clamped",
                    params.priority
                ),
            ));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
