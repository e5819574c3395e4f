//! Annotated graph views for the presentation layer.

use super::DependencyService;
use crate::domain::{JobId, JobStatus};
use serde::Serialize;

/// A job placed in the layout, annotated for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView {
    /// Job id
    pub id: JobId,
    /// Display name
    pub name: String,
    /// Type tag
    #[serde(rename = "type")]
    pub job_type: String,
    /// Effective status (see [`DependencyService::effective_status`])
    pub status: JobStatus,
    /// Direct dependencies, ordered by id
    pub dependencies: Vec<JobId>,
    /// Direct dependents, ordered by id
    pub dependents: Vec<JobId>,
}

/// One layer of annotated nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerView {
    /// Layer position, starting at 0
    pub index: usize,
    /// Nodes in this layer
    pub nodes: Vec<NodeView>,
}

/// A dependency edge as drawn between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    /// The waiting job
    pub dependent: JobId,
    /// The job being waited on
    pub dependency: JobId,
    /// Set when the dependency has failed, so the dependent cannot proceed
    pub blocked: bool,
}

impl DependencyService {
    /// Layers with every job annotated by name, type and effective status.
    #[must_use]
    pub fn layout(&self) -> Vec<LayerView> {
        self.compute_layers()
            .into_iter()
            .map(|layer| LayerView {
                index: layer.index,
                nodes: layer
                    .jobs
                    .iter()
                    .filter_map(|id| self.node_view(id))
                    .collect(),
            })
            .collect()
    }

    /// Every edge, flagged when its dependency has failed.
    #[must_use]
    pub fn connections(&self) -> Vec<Connection> {
        self.store()
            .edges()
            .into_iter()
            .map(|edge| {
                let blocked = self
                    .store()
                    .job(&edge.dependency)
                    .is_some_and(|job| job.status == JobStatus::Failed);
                Connection {
                    dependent: edge.dependent,
                    dependency: edge.dependency,
                    blocked,
                }
            })
            .collect()
    }

    fn node_view(&self, id: &JobId) -> Option<NodeView> {
        let job = self.store().job(id)?;
        Some(NodeView {
            id: job.id.clone(),
            name: job.name.clone(),
            job_type: job.job_type.clone(),
            status: self.effective_status(id).unwrap_or(job.status),
            dependencies: self.dependencies_of(id).into_iter().collect(),
            dependents: self.dependents_of(id).into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Job;

    fn id(s: &str) -> JobId {
        JobId::new(s)
    }

    fn pipeline() -> DependencyService {
        let mut service = DependencyService::default();
        service
            .add_job(Job::new("extract").with_name("Extract").with_status(JobStatus::Failed))
            .unwrap();
        service
            .add_job(Job::new("load").with_type("ETL").with_status(JobStatus::Pending))
            .unwrap();
        service.add_dependency(&id("load"), &id("extract")).unwrap();
        service
    }

    #[test]
    fn test_layout_annotates_nodes() {
        let layout = pipeline().layout();
        assert_eq!(layout.len(), 2);

        let extract = &layout[0].nodes[0];
        assert_eq!(extract.name, "Extract");
        assert_eq!(extract.status, JobStatus::Failed);
        assert_eq!(extract.dependents, vec![id("load")]);

        let load = &layout[1].nodes[0];
        assert_eq!(load.job_type, "ETL");
        assert_eq!(load.status, JobStatus::Waiting);
        assert_eq!(load.dependencies, vec![id("extract")]);
    }

    #[test]
    fn test_connections_flag_failed_dependency() {
        let connections = pipeline().connections();
        assert_eq!(
            connections,
            vec![Connection {
                dependent: id("load"),
                dependency: id("extract"),
                blocked: true,
            }]
        );
    }
}
