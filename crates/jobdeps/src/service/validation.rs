//! Per-job validation findings.

use crate::domain::JobId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Findings for one job, produced by
/// [`DependencyService::validate`](super::DependencyService::validate).
///
/// Problems are data here, never errors: a malformed graph still yields a
/// report. Cycles, missing dependencies and unknown jobs are errors;
/// deep chains and redundant edges are warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// The job that was validated
    pub job_id: JobId,

    /// Whether the job is registered at all
    pub job_found: bool,

    /// Whether a cycle is reachable from this job
    pub has_cycle: bool,

    /// Members of the cycle that was found (empty without a cycle)
    pub cycle_members: BTreeSet<JobId>,

    /// Requested dependencies that refer to jobs not in the graph
    pub missing_dependencies: BTreeSet<JobId>,

    /// Longest dependency chain ending at this job
    pub depth: usize,

    /// Whether `depth` exceeds the configured threshold
    pub excessive_depth: bool,

    /// Direct dependencies already implied by another direct dependency
    pub redundant_dependency_ids: BTreeSet<JobId>,
}

impl ValidationReport {
    /// Report for an id the graph does not know.
    pub(crate) fn not_found(job_id: JobId) -> Self {
        Self {
            job_id,
            job_found: false,
            has_cycle: false,
            cycle_members: BTreeSet::new(),
            missing_dependencies: BTreeSet::new(),
            depth: 0,
            excessive_depth: false,
            redundant_dependency_ids: BTreeSet::new(),
        }
    }

    /// Whether any error-level finding is present.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.job_found || self.has_cycle || !self.missing_dependencies.is_empty()
    }

    /// Whether the report has neither errors nor warnings.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.excessive_depth && self.redundant_dependency_ids.is_empty()
    }

    /// Error-level findings as human-readable messages.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.job_found {
            errors.push(format!("Job {} not found", self.job_id));
            return errors;
        }

        if self.has_cycle {
            errors.push(format!(
                "Job {} is part of a circular dependency chain ({})",
                self.job_id,
                join(&self.cycle_members)
            ));
        }

        for missing in &self.missing_dependencies {
            errors.push(format!("Dependency {missing} not found"));
        }

        errors
    }

    /// Warning-level findings as human-readable messages.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.excessive_depth {
            warnings.push(format!(
                "Deep dependency chain detected ({} levels). This may cause delays.",
                self.depth
            ));
        }

        if !self.redundant_dependency_ids.is_empty() {
            warnings.push(format!(
                "Redundant dependencies detected: {}",
                join(&self.redundant_dependency_ids)
            ));
        }

        warnings
    }
}

fn join(ids: &BTreeSet<JobId>) -> String {
    ids.iter().map(JobId::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> BTreeSet<JobId> {
        values.iter().map(|v| JobId::new(*v)).collect()
    }

    #[test]
    fn test_not_found_is_an_error() {
        let report = ValidationReport::not_found(JobId::new("x"));
        assert!(report.has_errors());
        assert_eq!(report.errors(), vec!["Job x not found".to_string()]);
        assert!(report.warnings().is_empty());
    }

    #[test]
    fn test_messages() {
        let report = ValidationReport {
            job_id: JobId::new("j"),
            job_found: true,
            has_cycle: true,
            cycle_members: ids(&["a", "b"]),
            missing_dependencies: ids(&["ghost"]),
            depth: 7,
            excessive_depth: true,
            redundant_dependency_ids: ids(&["c", "d"]),
        };

        assert_eq!(
            report.errors(),
            vec![
                "Job j is part of a circular dependency chain (a, b)".to_string(),
                "Dependency ghost not found".to_string(),
            ]
        );
        assert_eq!(
            report.warnings(),
            vec![
                "Deep dependency chain detected (7 levels). This may cause delays.".to_string(),
                "Redundant dependencies detected: c, d".to_string(),
            ]
        );
        assert!(!report.is_clean());
    }
}
