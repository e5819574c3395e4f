//! Command-line inspection of a dependency snapshot.
//!
//! The binary reads a snapshot exported by the job-management collaborator
//! and prints derived views. It never writes the snapshot back.
//!
//! # Commands
//!
//! - `layers`: Layered ordering with effective statuses
//! - `validate`: Validation report for one job or for every job
//! - `deps`: Direct dependencies and dependents of a job
//! - `check`: Whether a proposed dependency would be accepted
//!
//! # Example
//!
//! ```bash
//! jobdeps jobs.json layers
//! jobdeps jobs.yaml --config jobdeps.yaml validate
//! jobdeps jobs.json --json check nightly-report extract
//! ```

mod output;

use crate::config::GraphConfig;
use crate::domain::JobId;
use crate::graph::LayeringStrategy;
use crate::service::DependencyService;
use crate::snapshot::load_snapshot;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use output::OutputConfig;
use std::path::PathBuf;

/// Jobdeps - inspect batch job dependency graphs
///
/// Loads a job snapshot (JSON or YAML) and reports layers, dependency
/// lists and validation findings.
#[derive(Parser, Debug)]
#[command(name = "jobdeps")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Snapshot file (`.json`, `.yaml` or `.yml`)
    pub snapshot: PathBuf,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured depth threshold
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// Override the configured layering strategy
    #[arg(long, global = true, value_enum)]
    pub layering: Option<LayeringArg>,

    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the layered ordering of all jobs
    Layers,

    /// Validate one job, or every job when none is given
    ///
    /// Exits with an error when any report contains errors.
    Validate {
        /// Job ID to validate
        job: Option<String>,
    },

    /// Show direct dependencies and dependents of a job
    Deps {
        /// Job ID
        job: String,
    },

    /// Check whether a dependency could be added
    Check {
        /// Job that would wait
        dependent: String,

        /// Job it would wait for
        dependency: String,
    },
}

/// Layering strategy argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayeringArg {
    /// One layer past the deepest dependency
    LongestPath,
    /// First breadth-first assignment wins
    FirstDiscovery,
}

impl From<LayeringArg> for LayeringStrategy {
    fn from(arg: LayeringArg) -> Self {
        match arg {
            LayeringArg::LongestPath => LayeringStrategy::LongestPath,
            LayeringArg::FirstDiscovery => LayeringStrategy::FirstDiscovery,
        }
    }
}

impl Cli {
    /// Parse command-line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Execute the selected command.
    ///
    /// # Errors
    ///
    /// Fails if the configuration or snapshot cannot be loaded, if a
    /// validated job has errors, or if a checked dependency would be rejected.
    pub async fn execute(&self) -> Result<()> {
        let config = self.load_config().await?;
        let snapshot = load_snapshot(&self.snapshot)
            .await
            .with_context(|| format!("failed to load snapshot {}", self.snapshot.display()))?;

        let (service, warnings) = DependencyService::from_snapshot(config, snapshot);
        let out = OutputConfig::new(!self.no_color && !self.json);

        if !self.json {
            output::print_warnings(&warnings, &out);
        }

        match &self.command {
            Commands::Layers => {
                let layout = service.layout();
                if self.json {
                    output::print_json(&layout)?;
                } else {
                    output::print_layout(&layout, &out);
                }
            }
            Commands::Validate { job } => {
                let reports = match job {
                    Some(job) => vec![service.validate(&JobId::new(job.as_str()))],
                    None => service.validate_all(),
                };

                if self.json {
                    output::print_json(&reports)?;
                } else {
                    output::print_reports(&reports, &out);
                }

                let failing = reports.iter().filter(|r| r.has_errors()).count();
                if failing > 0 {
                    anyhow::bail!("{failing} job(s) failed validation");
                }
            }
            Commands::Deps { job } => {
                let id = JobId::new(job.as_str());
                if !service.store().contains(&id) {
                    anyhow::bail!("Job not found: {id}");
                }

                let dependencies = service.dependencies_of(&id);
                let dependents = service.dependents_of(&id);
                if self.json {
                    output::print_json(&serde_json::json!({
                        "job": id,
                        "dependencies": dependencies,
                        "dependents": dependents,
                    }))?;
                } else {
                    output::print_dependency_lists(&id, &dependencies, &dependents, &out);
                }
            }
            Commands::Check {
                dependent,
                dependency,
            } => {
                let mut probe = service.clone();
                let result = probe.add_dependency(
                    &JobId::new(dependent.as_str()),
                    &JobId::new(dependency.as_str()),
                );

                if self.json {
                    output::print_json(&serde_json::json!({
                        "dependent": dependent,
                        "dependency": dependency,
                        "accepted": result.is_ok(),
                        "reason": result.as_ref().err().map(ToString::to_string),
                    }))?;
                } else {
                    output::print_check(dependent, dependency, result.as_ref().err(), &out);
                }

                result?;
            }
        }

        Ok(())
    }

    async fn load_config(&self) -> Result<GraphConfig> {
        let mut config = match &self.config {
            Some(path) => GraphConfig::load(path)
                .await
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => GraphConfig::default(),
        };

        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(layering) = self.layering {
            config.layering = layering.into();
        }

        tracing::debug!(?config, "configuration resolved");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate_with_overrides() {
        let cli = Cli::try_parse_from([
            "jobdeps",
            "jobs.json",
            "--max-depth",
            "3",
            "--layering",
            "first-discovery",
            "validate",
            "42",
        ])
        .unwrap();

        assert_eq!(cli.max_depth, Some(3));
        assert_eq!(cli.layering, Some(LayeringArg::FirstDiscovery));
        assert!(matches!(cli.command, Commands::Validate { job: Some(ref j) } if j == "42"));
    }

    #[test]
    fn test_check_requires_two_ids() {
        assert!(Cli::try_parse_from(["jobdeps", "jobs.json", "check", "a"]).is_err());
    }

    #[tokio::test]
    async fn test_deps_requires_registered_job() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(&path, r#"{"jobs": [{"id": 1}, {"id": 2, "dependencies": [1, 9]}]}"#).unwrap();

        let snapshot = path.to_string_lossy().to_string();
        let known = Cli::try_parse_from(["jobdeps", snapshot.as_str(), "--json", "deps", "2"]).unwrap();
        assert!(known.execute().await.is_ok());

        // 9 is only an unresolved request, not a registered job.
        let unknown = Cli::try_parse_from(["jobdeps", snapshot.as_str(), "--json", "deps", "9"]).unwrap();
        assert!(unknown.execute().await.is_err());
    }

    #[tokio::test]
    async fn test_check_rejects_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(
            &path,
            r#"{"jobs": [{"id": 1}, {"id": 2, "dependencies": [1]}]}"#,
        )
        .unwrap();

        let snapshot = path.to_string_lossy().to_string();
        let ok = Cli::try_parse_from(["jobdeps", snapshot.as_str(), "--json", "check", "2", "1"]).unwrap();
        assert!(ok.execute().await.is_ok());

        let cyclic = Cli::try_parse_from(["jobdeps", snapshot.as_str(), "--json", "check", "1", "2"]).unwrap();
        assert!(cyclic.execute().await.is_err());
    }
}
