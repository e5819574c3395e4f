//! Text and JSON rendering for CLI commands.
//!
//! Semantic color theme:
//!   - Success: green  (clean reports, success status, accepted checks)
//!   - Warning: yellow (warnings, running/waiting status)
//!   - Error:   red    (errors, failed status, rejected checks)
//!   - Info:    cyan   (job ids)
//!   - Muted:   dimmed (labels, pending status)

use crate::domain::{JobId, JobStatus};
use crate::error::Error;
use crate::service::{LayerView, ValidationReport};
use crate::snapshot::SnapshotWarning;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeSet;

/// Output settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OutputConfig {
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    pub(crate) fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }
}

fn paint(text: &str, config: &OutputConfig, style: fn(&str) -> colored::ColoredString) -> String {
    if config.use_colors {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

fn id_text(id: &JobId, config: &OutputConfig) -> String {
    paint(id.as_str(), config, |s| s.cyan())
}

fn status_text(status: JobStatus, config: &OutputConfig) -> String {
    let text = status.to_string();
    match status {
        JobStatus::Success => paint(&text, config, |s| s.green()),
        JobStatus::Failed => paint(&text, config, |s| s.red()),
        JobStatus::Running | JobStatus::Waiting => paint(&text, config, |s| s.yellow()),
        JobStatus::Pending => paint(&text, config, |s| s.dimmed()),
    }
}

fn join_ids<'a>(ids: impl IntoIterator<Item = &'a JobId>, config: &OutputConfig) -> String {
    let rendered: Vec<String> = ids.into_iter().map(|id| id_text(id, config)).collect();
    if rendered.is_empty() {
        paint("(none)", config, |s| s.dimmed())
    } else {
        rendered.join(", ")
    }
}

/// Pretty-print any serializable value as JSON.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print snapshot warnings to stderr.
pub(crate) fn print_warnings(warnings: &[SnapshotWarning], config: &OutputConfig) {
    for warning in warnings {
        eprintln!("{} {warning}", paint("warning:", config, |s| s.yellow()));
    }
}

/// Print the annotated layout, one layer per block.
pub(crate) fn print_layout(layout: &[LayerView], config: &OutputConfig) {
    if layout.is_empty() {
        println!("No jobs.");
        return;
    }

    for layer in layout {
        println!("{}", paint(&format!("Layer {}", layer.index), config, |s| s.bold()));
        for node in &layer.nodes {
            let kind = if node.job_type.is_empty() {
                String::new()
            } else {
                format!(" [{}]", node.job_type)
            };
            println!(
                "  {} {}{} {}",
                id_text(&node.id, config),
                node.name,
                paint(&kind, config, |s| s.dimmed()),
                status_text(node.status, config)
            );
        }
    }
}

/// Print validation reports.
pub(crate) fn print_reports(reports: &[ValidationReport], config: &OutputConfig) {
    for report in reports {
        let header = format!("{} (depth {})", id_text(&report.job_id, config), report.depth);
        if report.is_clean() {
            println!("{header}: {}", paint("ok", config, |s| s.green()));
            continue;
        }

        println!("{header}:");
        for message in report.errors() {
            println!("  {} {message}", paint("error:", config, |s| s.red()));
        }
        for message in report.warnings() {
            println!("  {} {message}", paint("warning:", config, |s| s.yellow()));
        }
    }
}

/// Print the dependency and dependent lists of a job.
pub(crate) fn print_dependency_lists(
    id: &JobId,
    dependencies: &BTreeSet<JobId>,
    dependents: &BTreeSet<JobId>,
    config: &OutputConfig,
) {
    println!("{}", id_text(id, config));
    println!(
        "  {} {}",
        paint("depends on:", config, |s| s.dimmed()),
        join_ids(dependencies, config)
    );
    println!(
        "  {} {}",
        paint("needed by: ", config, |s| s.dimmed()),
        join_ids(dependents, config)
    );
}

/// Print the outcome of a dependency check.
pub(crate) fn print_check(dependent: &str, dependency: &str, rejection: Option<&Error>, config: &OutputConfig) {
    match rejection {
        None => println!(
            "{} {dependent} -> {dependency} can be added",
            paint("accepted:", config, |s| s.green())
        ),
        Some(reason) => println!("{} {reason}", paint("rejected:", config, |s| s.red())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let config = OutputConfig::new(false);
        assert_eq!(status_text(JobStatus::Failed, &config), "failed");
        assert_eq!(id_text(&JobId::new("a"), &config), "a");
        assert_eq!(join_ids(&BTreeSet::new(), &config), "(none)");
    }

    #[test]
    fn test_join_ids() {
        let config = OutputConfig::new(false);
        let ids = BTreeSet::from([JobId::new("b"), JobId::new("a")]);
        assert_eq!(join_ids(&ids, &config), "a, b");
    }
}
