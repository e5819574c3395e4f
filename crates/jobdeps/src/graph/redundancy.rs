//! Redundant direct dependencies (transitive-reduction analysis).

use super::store::GraphStore;
use crate::domain::JobId;
use petgraph::algo::{self, DfsSpace};
use petgraph::Direction;
use petgraph::stable_graph::NodeIndex;
use std::collections::BTreeSet;

/// Find the direct dependencies of `job` that are already implied by
/// another direct dependency.
///
/// A direct dependency `d1` is redundant when it is reachable from a
/// different direct dependency `d2`: the path `job -> d2 -> ... -> d1`
/// already makes `job` wait for `d1`, so removing `job -> d1` leaves the
/// transitive closure unchanged.
///
/// Every ordered pair of direct dependencies is tested with a reachability
/// search, O(k² · E) for k direct dependencies. Fan-in is small in practice.
/// Unknown jobs and jobs with fewer than two dependencies yield an empty set.
#[must_use]
pub fn find_redundant(store: &GraphStore, job: &JobId) -> BTreeSet<JobId> {
    let Some(node) = store.node(job) else {
        return BTreeSet::new();
    };
    let graph = store.graph();

    // A self-loop is not a dependency on another job.
    let direct: Vec<NodeIndex> = graph
        .neighbors_directed(node, Direction::Outgoing)
        .filter(|dep| *dep != node)
        .collect();

    let mut redundant = BTreeSet::new();
    if direct.len() < 2 {
        return redundant;
    }

    // One traversal workspace reused across every pairwise search.
    let mut space = DfsSpace::new(graph);
    for &candidate in &direct {
        let implied = direct.iter().any(|&other| {
            other != candidate && algo::has_path_connecting(graph, other, candidate, Some(&mut space))
        });
        if implied {
            redundant.insert(store.id_at(candidate).clone());
        }
    }

    redundant
}
