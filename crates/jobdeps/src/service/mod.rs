//! The public façade over the dependency graph.
//!
//! `DependencyService` is the only mutation surface for dependency edges.
//! Every edge insertion is checked before it is committed:
//!
//! 1. Self dependency → `Error::SelfDependency`
//! 2. Unknown endpoint → `Error::UnknownJob`
//! 3. Would close a cycle → `Error::CircularDependency`
//!
//! so the graph is never observed in a cyclic or self-referential state.
//! All derived views (layers, depth, redundancy, validation) are computed
//! fresh from the store on every call; nothing derived is cached across
//! mutations.
//!
//! # Thread Safety
//!
//! The service itself is single-writer. Wrap it in
//! [`SharedDependencyService`] to share it between tasks: queries take the
//! read lock, mutations hold the write lock for the whole
//! check-then-commit sequence.

mod shared;
mod validation;
mod view;

pub use shared::{DependencyGraph, SharedDependencyService, new_shared_service, shared_service};
pub use validation::ValidationReport;
pub use view::{Connection, LayerView, NodeView};

use crate::config::GraphConfig;
use crate::domain::{Job, JobId, JobStatus};
use crate::error::{Error, Result};
use crate::graph::{self, GraphStore, Layer};
use crate::snapshot::{GraphSnapshot, JobRecord, SnapshotWarning};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Outcome of [`DependencyService::toggle_dependency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The edge did not exist and was added
    Added,
    /// The edge existed and was removed
    Removed,
}

/// Counts returned by [`DependencyService::sync_jobs`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Jobs that were not registered before
    pub added: usize,
    /// Jobs whose attributes were refreshed
    pub updated: usize,
    /// Jobs absent from the new list, removed with their edges
    pub removed: usize,
}

/// Cycle-safe dependency graph with on-demand analyses.
#[derive(Debug, Clone, Default)]
pub struct DependencyService {
    store: GraphStore,
    config: GraphConfig,

    /// Dependencies requested on jobs that are not registered yet, by
    /// dependent. Reported as missing by `validate` and applied when the
    /// dependency job is added.
    unresolved: BTreeMap<JobId, BTreeSet<JobId>>,
}

impl DependencyService {
    /// Create an empty service.
    #[must_use]
    pub fn new(config: GraphConfig) -> Self {
        Self {
            store: GraphStore::new(),
            config,
            unresolved: BTreeMap::new(),
        }
    }

    /// Build a service from a collaborator snapshot.
    ///
    /// Returns the service together with every non-fatal problem found.
    #[must_use]
    pub fn from_snapshot(config: GraphConfig, snapshot: GraphSnapshot) -> (Self, Vec<SnapshotWarning>) {
        let mut service = Self::new(config);
        let warnings = service.apply_snapshot(snapshot);
        (service, warnings)
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Read-only access to the underlying store.
    #[must_use]
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    // ========== Job mirroring ==========

    /// Register a job reported by the collaborator.
    ///
    /// Pending requests that were waiting for this id are applied now;
    /// any that would close a cycle are dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateJob` if the id is already registered.
    pub fn add_job(&mut self, job: Job) -> Result<()> {
        let id = job.id.clone();
        self.store.add_job(job)?;
        tracing::debug!(job = %id, "job added");

        self.resolve_pending(&id);
        Ok(())
    }

    /// Remove a job and every edge touching it.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownJob` if the job does not exist.
    pub fn remove_job(&mut self, id: &JobId) -> Result<Job> {
        let job = self.store.remove_job(id)?;
        self.unresolved.remove(id);
        tracing::debug!(job = %id, "job removed");
        Ok(job)
    }

    /// Record a new status for a job.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownJob` if the job does not exist.
    pub fn set_status(&mut self, id: &JobId, status: JobStatus) -> Result<()> {
        self.store.set_status(id, status)
    }

    /// Mirror the collaborator's current job list.
    ///
    /// New ids are added, known ids get their attributes refreshed, and ids
    /// missing from `jobs` are removed together with their edges. Edges
    /// between surviving jobs are kept.
    pub fn sync_jobs(&mut self, jobs: impl IntoIterator<Item = Job>) -> SyncSummary {
        let mut summary = SyncSummary::default();
        let mut seen: HashSet<JobId> = HashSet::new();

        for job in jobs {
            if !seen.insert(job.id.clone()) {
                tracing::warn!(job = %job.id, "duplicate job in sync list, keeping the first");
                continue;
            }

            if self.store.contains(&job.id) {
                if self.store.update_job(job).is_ok() {
                    summary.updated += 1;
                }
            } else if self.add_job(job).is_ok() {
                summary.added += 1;
            }
        }

        for id in self.store.job_ids() {
            if !seen.contains(&id) && self.remove_job(&id).is_ok() {
                summary.removed += 1;
            }
        }

        tracing::debug!(
            added = summary.added,
            updated = summary.updated,
            removed = summary.removed,
            "jobs synchronized"
        );
        summary
    }

    // ========== Dependency mutations ==========

    /// Make `dependent` wait for `dependency`.
    ///
    /// Adding an edge that already exists succeeds without change.
    ///
    /// # Errors
    ///
    /// - `Error::SelfDependency` if both ids are equal
    /// - `Error::UnknownJob` if either job is not registered
    /// - `Error::CircularDependency` if the edge would close a cycle
    ///
    /// On error the graph is unchanged.
    pub fn add_dependency(&mut self, dependent: &JobId, dependency: &JobId) -> Result<()> {
        if dependent == dependency {
            tracing::warn!(job = %dependent, "rejected self dependency");
            return Err(Error::SelfDependency(dependent.clone()));
        }
        for id in [dependent, dependency] {
            if !self.store.contains(id) {
                return Err(Error::UnknownJob(id.clone()));
            }
        }

        if graph::would_create_cycle(&self.store, dependent, dependency) {
            tracing::warn!(%dependent, %dependency, "rejected circular dependency");
            return Err(Error::CircularDependency {
                dependent: dependent.clone(),
                dependency: dependency.clone(),
            });
        }

        if self.store.add_edge(dependent, dependency)? {
            tracing::debug!(%dependent, %dependency, "dependency added");
        }
        Ok(())
    }

    /// Remove the edge `dependent -> dependency`.
    ///
    /// Missing edges are a no-op, so this is idempotent. An unresolved
    /// request for the same pair is dropped as well. Returns `true` if
    /// anything was removed.
    pub fn remove_dependency(&mut self, dependent: &JobId, dependency: &JobId) -> bool {
        let mut removed = self.store.remove_edge(dependent, dependency);

        if let Some(pending) = self.unresolved.get_mut(dependent) {
            removed |= pending.remove(dependency);
            if pending.is_empty() {
                self.unresolved.remove(dependent);
            }
        }

        if removed {
            tracing::debug!(%dependent, %dependency, "dependency removed");
        }
        removed
    }

    /// Remove the edge if present, otherwise add it with all checks.
    ///
    /// # Errors
    ///
    /// Same as [`add_dependency`](Self::add_dependency) when adding.
    pub fn toggle_dependency(&mut self, dependent: &JobId, dependency: &JobId) -> Result<Toggle> {
        if self.store.has_edge(dependent, dependency) {
            self.remove_dependency(dependent, dependency);
            return Ok(Toggle::Removed);
        }

        self.add_dependency(dependent, dependency)?;
        Ok(Toggle::Added)
    }

    // ========== Queries ==========

    /// Whether `dependent` directly depends on `dependency`.
    #[must_use]
    pub fn has_dependency(&self, dependent: &JobId, dependency: &JobId) -> bool {
        self.store.has_edge(dependent, dependency)
    }

    /// Direct dependencies of a job.
    #[must_use]
    pub fn dependencies_of(&self, id: &JobId) -> BTreeSet<JobId> {
        self.store.dependencies_of(id)
    }

    /// Jobs that directly depend on a job.
    #[must_use]
    pub fn dependents_of(&self, id: &JobId) -> BTreeSet<JobId> {
        self.store.dependents_of(id)
    }

    /// Whether adding `dependent -> dependency` would be rejected as circular.
    #[must_use]
    pub fn would_create_cycle(&self, dependent: &JobId, dependency: &JobId) -> bool {
        graph::would_create_cycle(&self.store, dependent, dependency)
    }

    /// Status shown for a job: `Waiting` while any direct dependency has
    /// not succeeded, otherwise the reported status. `None` for unknown jobs.
    #[must_use]
    pub fn effective_status(&self, id: &JobId) -> Option<JobStatus> {
        let job = self.store.job(id)?;

        let blocked = self.store.dependencies_of(id).iter().any(|dep| {
            self.store
                .job(dep)
                .is_none_or(|dep_job| dep_job.status != JobStatus::Success)
        });

        Some(if blocked { JobStatus::Waiting } else { job.status })
    }

    /// Layers for visualization, using the configured strategy.
    #[must_use]
    pub fn compute_layers(&self) -> Vec<Layer> {
        graph::compute_layers_with(&self.store, self.config.layering)
    }

    /// Longest dependency chain ending at a job.
    #[must_use]
    pub fn max_depth(&self, id: &JobId) -> usize {
        graph::max_depth(&self.store, id)
    }

    /// Direct dependencies of a job that are implied by another one.
    #[must_use]
    pub fn find_redundant(&self, id: &JobId) -> BTreeSet<JobId> {
        graph::find_redundant(&self.store, id)
    }

    /// Validate one job. Never fails; findings are reported as data.
    #[must_use]
    pub fn validate(&self, id: &JobId) -> ValidationReport {
        if !self.store.contains(id) {
            return ValidationReport::not_found(id.clone());
        }

        let cycle = graph::find_cycle(&self.store, id);
        let depth = graph::max_depth(&self.store, id);

        // Stored edges always point at registered jobs; only unresolved
        // snapshot requests can be missing.
        let missing: BTreeSet<JobId> = self
            .unresolved
            .get(id)
            .map(|pending| {
                pending
                    .iter()
                    .filter(|dep| !self.store.contains(dep))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        ValidationReport {
            job_id: id.clone(),
            job_found: true,
            has_cycle: cycle.is_some(),
            cycle_members: cycle.unwrap_or_default().into_iter().collect(),
            missing_dependencies: missing,
            depth,
            excessive_depth: depth > self.config.max_depth,
            redundant_dependency_ids: graph::find_redundant(&self.store, id),
        }
    }

    /// Validate every job, ordered by id.
    #[must_use]
    pub fn validate_all(&self) -> Vec<ValidationReport> {
        self.store
            .job_ids()
            .iter()
            .map(|id| self.validate(id))
            .collect()
    }

    // ========== Snapshots ==========

    /// Apply a collaborator snapshot on top of the current graph.
    ///
    /// Jobs are added first, then every listed dependency goes through
    /// [`add_dependency`](Self::add_dependency) in snapshot order. Rejected
    /// entries are skipped and reported; dependencies on unknown ids are
    /// kept as unresolved requests.
    pub fn apply_snapshot(&mut self, snapshot: GraphSnapshot) -> Vec<SnapshotWarning> {
        let mut warnings = Vec::new();
        let mut accepted: Vec<JobRecord> = Vec::with_capacity(snapshot.jobs.len());

        for record in snapshot.jobs {
            match self.store.add_job(record.to_job()) {
                Ok(()) => accepted.push(record),
                Err(_) => {
                    tracing::warn!(job = %record.id, "skipping duplicate job in snapshot");
                    warnings.push(SnapshotWarning::DuplicateJob { id: record.id });
                }
            }
        }

        for record in &accepted {
            for dependency in &record.dependencies {
                match self.add_dependency(&record.id, dependency) {
                    Ok(()) => {}
                    Err(Error::SelfDependency(job)) => {
                        warnings.push(SnapshotWarning::SelfDependency { job });
                    }
                    Err(Error::CircularDependency {
                        dependent,
                        dependency,
                    }) => {
                        warnings.push(SnapshotWarning::CircularDependency {
                            dependent,
                            dependency,
                        });
                    }
                    Err(Error::UnknownJob(_)) => {
                        tracing::warn!(
                            dependent = %record.id,
                            %dependency,
                            "dependency on unknown job kept as unresolved"
                        );
                        self.unresolved
                            .entry(record.id.clone())
                            .or_default()
                            .insert(dependency.clone());
                        warnings.push(SnapshotWarning::UnresolvedDependency {
                            dependent: record.id.clone(),
                            dependency: dependency.clone(),
                        });
                    }
                    // Listed without a wildcard so a new variant has to be
                    // classified here.
                    Err(
                        error @ (Error::DuplicateJob(_)
                        | Error::Config(_)
                        | Error::Snapshot(_)
                        | Error::Io(_)),
                    ) => {
                        tracing::error!(
                            dependent = %record.id,
                            %dependency,
                            %error,
                            "skipping dependency after unexpected error"
                        );
                    }
                }
            }
        }

        tracing::debug!(
            jobs = self.store.len(),
            edges = self.store.edge_count(),
            warnings = warnings.len(),
            "snapshot applied"
        );
        warnings
    }

    /// Export the graph in the collaborator's format, ordered by id.
    ///
    /// Unresolved requests are included so a round trip preserves them.
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        let jobs = self
            .store
            .jobs()
            .into_iter()
            .map(|job| {
                let mut dependencies = self.store.dependencies_of(&job.id);
                if let Some(pending) = self.unresolved.get(&job.id) {
                    dependencies.extend(pending.iter().cloned());
                }

                JobRecord {
                    id: job.id.clone(),
                    name: Some(job.name.clone()),
                    job_type: job.job_type.clone(),
                    status: job.status,
                    dependencies: dependencies.into_iter().collect(),
                }
            })
            .collect();

        GraphSnapshot { jobs }
    }

    /// Apply unresolved requests that were waiting for `id`.
    fn resolve_pending(&mut self, id: &JobId) {
        let waiting: Vec<JobId> = self
            .unresolved
            .iter()
            .filter(|(_, pending)| pending.contains(id))
            .map(|(dependent, _)| dependent.clone())
            .collect();

        for dependent in waiting {
            if let Some(pending) = self.unresolved.get_mut(&dependent) {
                pending.remove(id);
                if pending.is_empty() {
                    self.unresolved.remove(&dependent);
                }
            }

            if let Err(e) = self.add_dependency(&dependent, id) {
                tracing::warn!(%dependent, dependency = %id, error = %e, "dropped unresolved dependency");
            }
        }
    }
}
