//! Longest dependency chain ending at a job.

use super::store::GraphStore;
use crate::domain::JobId;
use petgraph::Direction;
use petgraph::stable_graph::NodeIndex;
use std::collections::{HashMap, HashSet};

/// Compute the depth of a job.
///
/// A job with no dependencies has depth 0; otherwise its depth is
/// `1 + max(depth of each dependency)`. Unknown jobs have depth 0.
///
/// The traversal is an iterative post-order DFS. Finished nodes are memoized
/// so shared sub-chains are counted once. A dependency that is still on the
/// current path (only possible in a cyclic graph) contributes 0 instead of
/// being expanded again, which keeps the function total on malformed input.
/// Run cycle detection first when a strict answer is needed.
#[must_use]
pub fn max_depth(store: &GraphStore, job: &JobId) -> usize {
    let Some(start) = store.node(job) else {
        return 0;
    };
    let graph = store.graph();

    let mut depths: HashMap<NodeIndex, usize> = HashMap::new();
    let mut on_path: HashSet<NodeIndex> = HashSet::new();
    // (node, expanded): a node is first expanded, then finished once all
    // of its dependencies have been finished.
    let mut stack: Vec<(NodeIndex, bool)> = vec![(start, false)];

    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            let depth = graph
                .neighbors_directed(node, Direction::Outgoing)
                .map(|dep| depths.get(&dep).map_or(1, |d| d + 1))
                .max()
                .unwrap_or(0);
            on_path.remove(&node);
            depths.insert(node, depth);
            continue;
        }

        if depths.contains_key(&node) || !on_path.insert(node) {
            continue;
        }

        stack.push((node, true));
        for dep in graph.neighbors_directed(node, Direction::Outgoing) {
            if !depths.contains_key(&dep) && !on_path.contains(&dep) {
                stack.push((dep, false));
            }
        }
    }

    depths.get(&start).copied().unwrap_or(0)
}
