//! Cycle detection for the dependency graph.
//!
//! # Edge Direction
//!
//! Edges point from dependent to dependency. Adding `dependent -> dependency`
//! closes a cycle exactly when `dependent` is already reachable from
//! `dependency` by following existing edges.

use super::store::GraphStore;
use super::{reaches, sorted_neighbors};
use crate::domain::JobId;
use petgraph::Direction;
use petgraph::stable_graph::NodeIndex;
use std::collections::HashSet;

/// Check whether adding `dependent -> proposed_dependency` would create a cycle.
///
/// A self-dependency is reported without searching. Unknown jobs have no
/// edges, so they can never close a cycle. The graph is only read.
#[must_use]
pub fn would_create_cycle(store: &GraphStore, dependent: &JobId, proposed_dependency: &JobId) -> bool {
    if dependent == proposed_dependency {
        return true;
    }

    let (Some(from), Some(to)) = (store.node(dependent), store.node(proposed_dependency)) else {
        return false;
    };

    reaches(store.graph(), to, from)
}

/// Whether a cycle is reachable from `job` through dependency edges.
#[must_use]
pub fn has_cycle(store: &GraphStore, job: &JobId) -> bool {
    find_cycle(store, job).is_some()
}

/// Find a cycle reachable from `job`, returning its members in path order.
///
/// Depth-first traversal with an explicit stack, a globally visited set and
/// the set of nodes on the current path. Revisiting a node that is still on
/// the path closes a cycle; the members are the path suffix starting at that
/// node. Each node is expanded at most once, so this terminates on any graph.
///
/// Dependencies are explored in ascending id order, so the reported cycle is
/// deterministic.
#[must_use]
pub fn find_cycle(store: &GraphStore, job: &JobId) -> Option<Vec<JobId>> {
    let start = store.node(job)?;

    let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
    let mut on_path: HashSet<NodeIndex> = HashSet::from([start]);
    let mut path: Vec<NodeIndex> = vec![start];
    let mut stack: Vec<(NodeIndex, Vec<NodeIndex>)> = vec![(start, pending_dependencies(store, start))];

    while let Some((_, pending)) = stack.last_mut() {
        match pending.pop() {
            Some(next) => {
                if on_path.contains(&next) {
                    let first = path.iter().position(|node| *node == next).unwrap_or(0);
                    return Some(path[first..].iter().map(|node| store.id_at(*node).clone()).collect());
                }

                if visited.insert(next) {
                    on_path.insert(next);
                    path.push(next);
                    stack.push((next, pending_dependencies(store, next)));
                }
            }
            None => {
                stack.pop();
                if let Some(done) = path.pop() {
                    on_path.remove(&done);
                }
            }
        }
    }

    None
}

/// Dependencies in descending id order, so popping yields ascending order.
fn pending_dependencies(store: &GraphStore, node: NodeIndex) -> Vec<NodeIndex> {
    let mut deps = sorted_neighbors(store, node, Direction::Outgoing);
    deps.reverse();
    deps
}
