//! Error types for dependency graph operations.
//!
//! Only mutations and file loading can fail. Queries (`validate`, layering,
//! depth, redundancy) are total and report problems as data instead.

use crate::domain::JobId;
use std::io;
use thiserror::Error;

/// The error type for jobdeps operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced job is not present in the graph.
    #[error("Job not found: {0}")]
    UnknownJob(JobId),

    /// A job was asked to depend on itself.
    #[error("Job '{0}' cannot depend on itself")]
    SelfDependency(JobId),

    /// Adding the edge would close a cycle.
    #[error("Adding dependency {dependent} -> {dependency} would create a circular dependency")]
    CircularDependency {
        /// The job that would gain the dependency
        dependent: JobId,
        /// The job it would depend on
        dependency: JobId,
    },

    /// A job with this id is already registered.
    #[error("Duplicate job id: {0}")]
    DuplicateJob(JobId),

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A snapshot file could not be parsed.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A specialized Result type for jobdeps operations.
pub type Result<T> = std::result::Result<T, Error>;
