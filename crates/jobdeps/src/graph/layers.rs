//! Layered ordering of jobs for visualization.
//!
//! Layer 0 holds the jobs without dependencies. Each later layer holds jobs
//! whose dependencies sit in earlier layers. This is a best-effort layout
//! aid, never a correctness oracle: malformed graphs still produce a layering.

use super::sorted_neighbors;
use super::store::GraphStore;
use crate::domain::JobId;
use petgraph::Direction;
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// How layer indices are assigned during the breadth-first expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayeringStrategy {
    /// A job is placed once all of its dependencies are placed, one layer
    /// past the deepest of them. Every edge points to an earlier layer.
    #[default]
    LongestPath,

    /// A job takes `1 + level` of the first dependency that reaches it.
    /// Favors short chains; an edge may connect jobs in the same layer.
    FirstDiscovery,
}

/// One horizontal layer of the layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Position from the left, starting at 0
    pub index: usize,

    /// Jobs in this layer, ordered by id
    pub jobs: Vec<JobId>,
}

/// Compute layers with the default [`LayeringStrategy::LongestPath`].
#[must_use]
pub fn compute_layers(store: &GraphStore) -> Vec<Layer> {
    compute_layers_with(store, LayeringStrategy::default())
}

/// Compute layers with an explicit strategy.
///
/// # Fallbacks
///
/// - Empty store: no layers.
/// - No job without dependencies (every job is on or behind a cycle): all
///   jobs go into a single layer 0.
/// - Jobs never reached from the zero-dependency set: appended as one final
///   layer after the computed ones.
///
/// The result depends only on graph shape, not on insertion order.
#[must_use]
pub fn compute_layers_with(store: &GraphStore, strategy: LayeringStrategy) -> Vec<Layer> {
    let graph = store.graph();

    let mut nodes: Vec<NodeIndex> = graph.node_indices().collect();
    if nodes.is_empty() {
        return Vec::new();
    }
    nodes.sort_unstable_by(|a, b| graph[*a].cmp(&graph[*b]));

    let roots: Vec<NodeIndex> = nodes
        .iter()
        .copied()
        .filter(|node| graph.neighbors_directed(*node, Direction::Outgoing).next().is_none())
        .collect();

    if roots.is_empty() {
        tracing::debug!(
            jobs = nodes.len(),
            "no job without dependencies, placing all jobs in one layer"
        );
        return vec![Layer {
            index: 0,
            jobs: nodes.iter().map(|node| graph[*node].clone()).collect(),
        }];
    }

    let layer_of = match strategy {
        LayeringStrategy::LongestPath => assign_longest_path(store, &nodes, &roots),
        LayeringStrategy::FirstDiscovery => assign_first_discovery(store, &roots),
    };

    let mut grouped: BTreeMap<usize, Vec<JobId>> = BTreeMap::new();
    let mut unreached: Vec<JobId> = Vec::new();
    for node in &nodes {
        match layer_of.get(node) {
            Some(&index) => grouped.entry(index).or_default().push(graph[*node].clone()),
            None => unreached.push(graph[*node].clone()),
        }
    }

    let mut layers: Vec<Layer> = grouped
        .into_iter()
        .map(|(index, jobs)| Layer { index, jobs })
        .collect();

    if !unreached.is_empty() {
        tracing::debug!(
            count = unreached.len(),
            "jobs unreachable from the zero-dependency set, appending a final layer"
        );
        layers.push(Layer {
            index: layers.len(),
            jobs: unreached,
        });
    }

    layers
}

/// Kahn-style expansion: a dependent is enqueued when its last dependency
/// is placed, so its layer is one past the deepest dependency.
fn assign_longest_path(
    store: &GraphStore,
    nodes: &[NodeIndex],
    roots: &[NodeIndex],
) -> HashMap<NodeIndex, usize> {
    let graph = store.graph();

    let mut remaining: HashMap<NodeIndex, usize> = nodes
        .iter()
        .map(|node| (*node, graph.neighbors_directed(*node, Direction::Outgoing).count()))
        .collect();
    let mut layer_of: HashMap<NodeIndex, usize> = roots.iter().map(|root| (*root, 0)).collect();
    let mut candidate: HashMap<NodeIndex, usize> = HashMap::new();
    let mut queue: VecDeque<NodeIndex> = roots.iter().copied().collect();

    while let Some(node) = queue.pop_front() {
        let level = layer_of.get(&node).copied().unwrap_or(0);

        for dependent in sorted_neighbors(store, node, Direction::Incoming) {
            let Some(left) = remaining.get_mut(&dependent) else {
                continue;
            };
            *left = left.saturating_sub(1);

            let best = candidate.entry(dependent).or_insert(level + 1);
            *best = (*best).max(level + 1);

            if *left == 0 && !layer_of.contains_key(&dependent) {
                layer_of.insert(dependent, *best);
                queue.push_back(dependent);
            }
        }
    }

    layer_of
}

/// Plain breadth-first expansion: the first assignment wins.
fn assign_first_discovery(store: &GraphStore, roots: &[NodeIndex]) -> HashMap<NodeIndex, usize> {
    let mut layer_of: HashMap<NodeIndex, usize> = HashMap::new();
    let mut queue: VecDeque<(NodeIndex, usize)> = roots.iter().map(|root| (*root, 0)).collect();

    while let Some((node, level)) = queue.pop_front() {
        if layer_of.contains_key(&node) {
            continue;
        }
        layer_of.insert(node, level);

        for dependent in sorted_neighbors(store, node, Direction::Incoming) {
            if !layer_of.contains_key(&dependent) {
                queue.push_back((dependent, level + 1));
            }
        }
    }

    layer_of
}
