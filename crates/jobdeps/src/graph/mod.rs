//! Dependency graph storage and the pure algorithms over it.
//!
//! This module provides:
//! - [`GraphStore`]: jobs and dependency edges (petgraph-backed)
//! - Cycle detection ([`would_create_cycle`], [`find_cycle`])
//! - Depth analysis ([`max_depth`])
//! - Redundant edge detection ([`find_redundant`])
//! - Layered ordering for visualization ([`compute_layers`])
//!
//! Every analysis takes the store by shared reference and never mutates it.
//! All of them use explicit worklists with visited sets, so they terminate
//! even on a store that contains cycles.

mod cycles;
mod depth;
mod layers;
mod redundancy;
mod store;

pub use cycles::{find_cycle, has_cycle, would_create_cycle};
pub use depth::max_depth;
pub use layers::{Layer, LayeringStrategy, compute_layers, compute_layers_with};
pub use redundancy::find_redundant;
pub use store::GraphStore;

use crate::domain::JobId;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::{Direction, algo};

/// Whether `target` can be reached from `start` along dependency edges.
///
/// `start == target` counts as reachable.
pub(crate) fn reaches(graph: &StableDiGraph<JobId, ()>, start: NodeIndex, target: NodeIndex) -> bool {
    algo::has_path_connecting(graph, start, target, None)
}

/// Neighbors of `node` in `direction`, ordered by job id.
pub(crate) fn sorted_neighbors(
    store: &GraphStore,
    node: NodeIndex,
    direction: Direction,
) -> Vec<NodeIndex> {
    let graph = store.graph();
    let mut neighbors: Vec<NodeIndex> = graph.neighbors_directed(node, direction).collect();
    neighbors.sort_unstable_by(|a, b| graph[*a].cmp(&graph[*b]));
    neighbors.dedup();
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Job;

    fn node(store: &GraphStore, id: &str) -> NodeIndex {
        store.node(&JobId::new(id)).unwrap()
    }

    #[test]
    fn test_reaches_follows_edge_direction() {
        let mut store = GraphStore::new();
        for job in ["a", "b", "c", "x"] {
            store.add_job(Job::new(job)).unwrap();
        }
        store.add_edge(&JobId::new("a"), &JobId::new("b")).unwrap();
        store.add_edge(&JobId::new("b"), &JobId::new("c")).unwrap();

        let graph = store.graph();
        assert!(reaches(graph, node(&store, "a"), node(&store, "c")));
        assert!(!reaches(graph, node(&store, "c"), node(&store, "a")));
        assert!(!reaches(graph, node(&store, "a"), node(&store, "x")));
        assert!(reaches(graph, node(&store, "x"), node(&store, "x")));
    }
}
