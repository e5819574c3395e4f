//! Graph storage: the job set and the dependency edges between jobs.
//!
//! `GraphStore` is the single source of truth for graph shape. It enforces
//! referential integrity and edge uniqueness, but performs no cycle checking;
//! [`DependencyService`](crate::service::DependencyService) runs the cycle
//! detector before committing an edge here.

use crate::domain::{DependencyEdge, Job, JobId, JobStatus};
use crate::error::{Error, Result};
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use std::collections::{BTreeSet, HashMap};

/// Jobs and their dependency edges.
///
/// # Graph Representation
///
/// Edges are directed from **dependent to dependency**: an edge `A -> B`
/// means job A waits for job B. Outgoing neighbors of a node are therefore
/// its dependencies and incoming neighbors are its dependents.
///
/// A `StableDiGraph` is used so node indices held in `node_map` remain valid
/// when other jobs are removed.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    /// Job attributes indexed by ID
    jobs: HashMap<JobId, Job>,

    /// Dependency graph. Nodes hold `JobId`, edges carry no weight.
    graph: StableDiGraph<JobId, ()>,

    /// Mapping from `JobId` to graph node.
    ///
    /// Every job in `jobs` has exactly one entry here.
    node_map: HashMap<JobId, NodeIndex>,
}

impl GraphStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateJob` if a job with the same id already exists.
    pub fn add_job(&mut self, job: Job) -> Result<()> {
        if self.jobs.contains_key(&job.id) {
            return Err(Error::DuplicateJob(job.id));
        }

        let node = self.graph.add_node(job.id.clone());
        self.node_map.insert(job.id.clone(), node);
        self.jobs.insert(job.id.clone(), job);
        Ok(())
    }

    /// Remove a job together with every edge touching it.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownJob` if the job does not exist.
    pub fn remove_job(&mut self, id: &JobId) -> Result<Job> {
        let node = self
            .node_map
            .remove(id)
            .ok_or_else(|| Error::UnknownJob(id.clone()))?;

        // Removing the node drops its incoming and outgoing edges.
        self.graph.remove_node(node);

        self.jobs
            .remove(id)
            .ok_or_else(|| Error::UnknownJob(id.clone()))
    }

    /// Replace the attributes of an existing job, keeping its edges.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownJob` if the job does not exist.
    pub fn update_job(&mut self, job: Job) -> Result<()> {
        let slot = self
            .jobs
            .get_mut(&job.id)
            .ok_or_else(|| Error::UnknownJob(job.id.clone()))?;
        *slot = job;
        Ok(())
    }

    /// Record a new status for a job.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownJob` if the job does not exist.
    pub fn set_status(&mut self, id: &JobId, status: JobStatus) -> Result<()> {
        let job = self
            .jobs
            .get_mut(id)
            .ok_or_else(|| Error::UnknownJob(id.clone()))?;
        job.status = status;
        Ok(())
    }

    /// Look up a job.
    #[must_use]
    pub fn job(&self, id: &JobId) -> Option<&Job> {
        self.jobs.get(id)
    }

    /// Whether a job with this id is registered.
    #[must_use]
    pub fn contains(&self, id: &JobId) -> bool {
        self.jobs.contains_key(id)
    }

    /// All job ids in ascending order.
    #[must_use]
    pub fn job_ids(&self) -> Vec<JobId> {
        let mut ids: Vec<JobId> = self.jobs.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// All jobs ordered by id.
    #[must_use]
    pub fn jobs(&self) -> Vec<&Job> {
        let mut jobs: Vec<&Job> = self.jobs.values().collect();
        jobs.sort_unstable_by(|a, b| a.id.cmp(&b.id));
        jobs
    }

    /// Number of jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the store holds no jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Number of dependency edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add the edge `dependent -> dependency`.
    ///
    /// Returns `false` if the edge already existed. No cycle check is done.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownJob` if either endpoint is not registered.
    pub fn add_edge(&mut self, dependent: &JobId, dependency: &JobId) -> Result<bool> {
        let from = self.require_node(dependent)?;
        let to = self.require_node(dependency)?;

        if self.graph.find_edge(from, to).is_some() {
            return Ok(false);
        }

        self.graph.add_edge(from, to, ());
        Ok(true)
    }

    /// Remove the edge `dependent -> dependency`.
    ///
    /// Returns `true` if an edge was removed. Missing edges and unknown
    /// jobs are a no-op.
    pub fn remove_edge(&mut self, dependent: &JobId, dependency: &JobId) -> bool {
        let (Some(&from), Some(&to)) = (self.node_map.get(dependent), self.node_map.get(dependency))
        else {
            return false;
        };

        match self.graph.find_edge(from, to) {
            Some(edge) => self.graph.remove_edge(edge).is_some(),
            None => false,
        }
    }

    /// Whether `dependent` directly depends on `dependency`.
    #[must_use]
    pub fn has_edge(&self, dependent: &JobId, dependency: &JobId) -> bool {
        match (self.node_map.get(dependent), self.node_map.get(dependency)) {
            (Some(&from), Some(&to)) => self.graph.find_edge(from, to).is_some(),
            _ => false,
        }
    }

    /// Direct dependencies of a job. Empty for unknown jobs.
    #[must_use]
    pub fn dependencies_of(&self, id: &JobId) -> BTreeSet<JobId> {
        self.neighbor_ids(id, Direction::Outgoing)
    }

    /// Jobs that directly depend on this job. Empty for unknown jobs.
    #[must_use]
    pub fn dependents_of(&self, id: &JobId) -> BTreeSet<JobId> {
        self.neighbor_ids(id, Direction::Incoming)
    }

    /// All edges ordered by `(dependent, dependency)`.
    #[must_use]
    pub fn edges(&self) -> Vec<DependencyEdge> {
        let mut edges: Vec<DependencyEdge> = self
            .graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_endpoints(edge))
            .map(|(from, to)| DependencyEdge {
                dependent: self.graph[from].clone(),
                dependency: self.graph[to].clone(),
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Underlying petgraph graph, for the analysis modules.
    pub(crate) fn graph(&self) -> &StableDiGraph<JobId, ()> {
        &self.graph
    }

    /// Graph node for a job, if registered.
    pub(crate) fn node(&self, id: &JobId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Job id stored at a graph node.
    pub(crate) fn id_at(&self, node: NodeIndex) -> &JobId {
        &self.graph[node]
    }

    fn require_node(&self, id: &JobId) -> Result<NodeIndex> {
        self.node(id).ok_or_else(|| Error::UnknownJob(id.clone()))
    }

    fn neighbor_ids(&self, id: &JobId, direction: Direction) -> BTreeSet<JobId> {
        let Some(node) = self.node(id) else {
            return BTreeSet::new();
        };

        self.graph
            .neighbors_directed(node, direction)
            .map(|n| self.graph[n].clone())
            .collect()
    }
}
