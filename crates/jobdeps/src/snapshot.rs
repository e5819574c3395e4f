//! Snapshot exchange with the job-management collaborator.
//!
//! The collaborator reports its jobs as a flat list in which every job
//! carries the ids it depends on. Persisting that list is the collaborator's
//! job; this module only parses and produces it.
//!
//! ```json
//! {
//!   "jobs": [
//!     { "id": 1, "name": "Extract", "type": "ETL", "status": "SUCCESS", "dependencies": [] },
//!     { "id": 2, "name": "Load", "type": "ETL", "dependencies": [1] }
//!   ]
//! }
//! ```

use crate::domain::{Job, JobId, JobStatus};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tokio::fs;

/// One job as reported by the collaborator, with inline dependency ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Unique identifier
    pub id: JobId,

    /// Display name (defaults to the id)
    #[serde(default)]
    pub name: Option<String>,

    /// Free-form classification
    #[serde(rename = "type", default)]
    pub job_type: String,

    /// Last reported status
    #[serde(default)]
    pub status: JobStatus,

    /// Ids of the jobs this job waits for
    #[serde(default)]
    pub dependencies: Vec<JobId>,
}

impl JobRecord {
    /// The job attributes without the dependency list.
    #[must_use]
    pub fn to_job(&self) -> Job {
        Job {
            id: self.id.clone(),
            name: self.name.clone().unwrap_or_else(|| self.id.to_string()),
            job_type: self.job_type.clone(),
            status: self.status,
        }
    }
}

/// The collaborator's complete job list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Jobs in the collaborator's order
    #[serde(default)]
    pub jobs: Vec<JobRecord>,
}

impl GraphSnapshot {
    /// Parse a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Error::Snapshot` if the JSON does not match the format.
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::Snapshot(format!("invalid JSON: {e}")))
    }

    /// Parse a YAML snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Error::Snapshot` if the YAML does not match the format.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::Snapshot(format!("invalid YAML: {e}")))
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `Error::Snapshot` if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Snapshot(e.to_string()))
    }
}

/// Load a snapshot file. `.yaml` and `.yml` are parsed as YAML, anything
/// else as JSON.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be read and `Error::Snapshot` if
/// it cannot be parsed.
pub async fn load_snapshot(path: &Path) -> Result<GraphSnapshot> {
    let content = fs::read_to_string(path).await?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let snapshot = if is_yaml {
        GraphSnapshot::from_yaml_str(&content)?
    } else {
        GraphSnapshot::from_json_str(&content)?
    };

    tracing::debug!(path = %path.display(), jobs = snapshot.jobs.len(), "loaded snapshot");
    Ok(snapshot)
}

/// Non-fatal problems found while applying a snapshot.
///
/// The offending entry is skipped; everything else is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotWarning {
    /// A job id appeared twice or was already registered.
    ///
    /// **Effect**: the later record and its dependencies are skipped.
    DuplicateJob {
        /// The repeated id
        id: JobId,
    },

    /// A job listed itself as a dependency.
    ///
    /// **Effect**: the edge is skipped.
    SelfDependency {
        /// The offending job
        job: JobId,
    },

    /// The edge would close a cycle with edges applied earlier.
    ///
    /// **Effect**: the edge is skipped to break the cycle.
    CircularDependency {
        /// Job that listed the dependency
        dependent: JobId,
        /// The dependency that was skipped
        dependency: JobId,
    },

    /// The dependency refers to a job that is not registered.
    ///
    /// **Effect**: kept as an unresolved request, reported by `validate`,
    /// and applied once a job with that id is added.
    UnresolvedDependency {
        /// Job that listed the dependency
        dependent: JobId,
        /// The unknown dependency id
        dependency: JobId,
    },
}

impl fmt::Display for SnapshotWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotWarning::DuplicateJob { id } => write!(f, "skipped duplicate job {id}"),
            SnapshotWarning::SelfDependency { job } => {
                write!(f, "skipped self dependency on {job}")
            }
            SnapshotWarning::CircularDependency {
                dependent,
                dependency,
            } => write!(f, "skipped circular dependency {dependent} -> {dependency}"),
            SnapshotWarning::UnresolvedDependency {
                dependent,
                dependency,
            } => write!(f, "unresolved dependency {dependent} -> {dependency}"),
        }
    }
}
