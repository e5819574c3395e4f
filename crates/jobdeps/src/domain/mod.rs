//! Domain types for the job dependency graph.
//!
//! Jobs are owned by an external job-management collaborator; this crate
//! only mirrors their identity and the attributes needed to annotate graph
//! views. Dependencies are stored by identifier only.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Unique identifier for a job.
///
/// Ordering is lexicographic on the underlying string. Every derived view
/// sorts by this ordering, so results never depend on insertion order.
///
/// Deserializes from either a string or an unsigned integer, since the
/// job-management collaborator uses numeric ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Create a new job ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        })
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for JobId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Execution status reported by the job-management collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Not started yet
    #[default]
    Pending,

    /// Currently executing
    Running,

    /// Completed successfully
    Success,

    /// Completed with a failure
    Failed,

    /// Held back by an unfinished dependency
    Waiting,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Success => "success",
            JobStatus::Failed => "failed",
            JobStatus::Waiting => "waiting",
        };
        write!(f, "{s}")
    }
}

/// A job node mirrored from the job-management collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier
    pub id: JobId,

    /// Display name
    pub name: String,

    /// Free-form classification (e.g. "ETL", "REPORT")
    #[serde(rename = "type", default)]
    pub job_type: String,

    /// Last status reported for this job
    #[serde(default)]
    pub status: JobStatus,
}

impl Job {
    /// Create a pending job whose display name equals its id.
    pub fn new(id: impl Into<JobId>) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            job_type: String::new(),
            status: JobStatus::Pending,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the type tag.
    #[must_use]
    pub fn with_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = job_type.into();
        self
    }

    /// Set the reported status.
    #[must_use]
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }
}

/// A directed dependency: `dependent` will not start until `dependency` completes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// The waiting job
    pub dependent: JobId,

    /// The job being waited on
    pub dependency: JobId,
}

impl DependencyEdge {
    /// Create an edge `dependent -> dependency`.
    pub fn new(dependent: impl Into<JobId>, dependency: impl Into<JobId>) -> Self {
        Self {
            dependent: dependent.into(),
            dependency: dependency.into(),
        }
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.dependent, self.dependency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_from_number() {
        assert_eq!(JobId::from(42u64), JobId::new("42"));
    }

    #[test]
    fn test_job_builder_defaults_name_to_id() {
        let job = Job::new("etl-load").with_type("ETL");
        assert_eq!(job.name, "etl-load");
        assert_eq!(job.job_type, "ETL");
        assert_eq!(job.status, JobStatus::Pending);
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&JobStatus::Success).unwrap();
        assert_eq!(json, "\"SUCCESS\"");

        let status: JobStatus = serde_json::from_str("\"WAITING\"").unwrap();
        assert_eq!(status, JobStatus::Waiting);
    }

    #[test]
    fn test_job_deserializes_with_defaults() {
        let job: Job = serde_json::from_str(r#"{"id": 7, "name": "Nightly"}"#).unwrap();
        assert_eq!(job.id, JobId::new("7"));
        assert_eq!(job.job_type, "");
        assert_eq!(job.status, JobStatus::Pending);
    }

    #[test]
    fn test_edge_display() {
        assert_eq!(DependencyEdge::new("a", "b").to_string(), "a -> b");
    }
}
