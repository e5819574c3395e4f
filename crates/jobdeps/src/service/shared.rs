//! Thread-safe access to a [`DependencyService`].
//!
//! The service is wrapped in `Arc<RwLock<_>>`. Queries take the read lock
//! and may run concurrently; mutations take the write lock, so the cycle
//! check and the commit of an edge happen atomically with respect to every
//! other caller.

use super::{DependencyService, LayerView, ValidationReport};
use crate::config::GraphConfig;
use crate::domain::{Job, JobId, JobStatus};
use crate::error::Result;
use crate::graph::Layer;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe dependency service handle. Clone the `Arc` to share it.
pub type SharedDependencyService = Arc<RwLock<DependencyService>>;

/// Create a shareable service.
#[must_use]
pub fn shared_service(config: GraphConfig) -> SharedDependencyService {
    Arc::new(RwLock::new(DependencyService::new(config)))
}

/// Create a shareable service behind the [`DependencyGraph`] trait.
#[must_use]
pub fn new_shared_service(config: GraphConfig) -> Box<dyn DependencyGraph> {
    Box::new(shared_service(config))
}

/// The dependency-graph surface exposed to concurrent callers.
///
/// Mirrors the synchronous [`DependencyService`] API. Implementations must
/// be `Send + Sync` and must make each mutation's check-then-commit
/// sequence atomic.
#[async_trait]
pub trait DependencyGraph: Send + Sync {
    /// Register a job.
    async fn add_job(&self, job: Job) -> Result<()>;

    /// Remove a job and its edges.
    async fn remove_job(&self, id: &JobId) -> Result<Job>;

    /// Record a new status for a job.
    async fn set_status(&self, id: &JobId, status: JobStatus) -> Result<()>;

    /// Add a dependency after the self, existence and cycle checks.
    async fn add_dependency(&self, dependent: &JobId, dependency: &JobId) -> Result<()>;

    /// Remove a dependency; a missing edge is a no-op.
    async fn remove_dependency(&self, dependent: &JobId, dependency: &JobId) -> bool;

    /// Direct dependencies of a job.
    async fn dependencies_of(&self, id: &JobId) -> BTreeSet<JobId>;

    /// Direct dependents of a job.
    async fn dependents_of(&self, id: &JobId) -> BTreeSet<JobId>;

    /// Layers for visualization.
    async fn compute_layers(&self) -> Vec<Layer>;

    /// Annotated layers for rendering.
    async fn layout(&self) -> Vec<LayerView>;

    /// Validation findings for one job.
    async fn validate(&self, id: &JobId) -> ValidationReport;
}

#[async_trait]
impl DependencyGraph for SharedDependencyService {
    async fn add_job(&self, job: Job) -> Result<()> {
        self.write().await.add_job(job)
    }

    async fn remove_job(&self, id: &JobId) -> Result<Job> {
        self.write().await.remove_job(id)
    }

    async fn set_status(&self, id: &JobId, status: JobStatus) -> Result<()> {
        self.write().await.set_status(id, status)
    }

    async fn add_dependency(&self, dependent: &JobId, dependency: &JobId) -> Result<()> {
        self.write().await.add_dependency(dependent, dependency)
    }

    async fn remove_dependency(&self, dependent: &JobId, dependency: &JobId) -> bool {
        self.write().await.remove_dependency(dependent, dependency)
    }

    async fn dependencies_of(&self, id: &JobId) -> BTreeSet<JobId> {
        self.read().await.dependencies_of(id)
    }

    async fn dependents_of(&self, id: &JobId) -> BTreeSet<JobId> {
        self.read().await.dependents_of(id)
    }

    async fn compute_layers(&self) -> Vec<Layer> {
        self.read().await.compute_layers()
    }

    async fn layout(&self) -> Vec<LayerView> {
        self.read().await.layout()
    }

    async fn validate(&self, id: &JobId) -> ValidationReport {
        self.read().await.validate(id)
    }
}
