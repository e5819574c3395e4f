//! Integration tests for the dependency service.
//!
//! These tests exercise the public façade end to end: mutation checks,
//! idempotent removal, depth, redundancy, layering and validation reports.

use jobdeps::config::GraphConfig;
use jobdeps::domain::{Job, JobId};
use jobdeps::error::Error;
use jobdeps::graph::LayeringStrategy;
use jobdeps::service::DependencyService;
use rstest::{fixture, rstest};
use std::collections::BTreeSet;

fn id(s: &str) -> JobId {
    JobId::new(s)
}

fn ids(values: &[&str]) -> BTreeSet<JobId> {
    values.iter().map(|v| id(v)).collect()
}

fn service_with(config: GraphConfig, jobs: &[&str], edges: &[(&str, &str)]) -> DependencyService {
    let mut service = DependencyService::new(config);
    for job in jobs {
        service.add_job(Job::new(*job)).unwrap();
    }
    for (dependent, dependency) in edges {
        service.add_dependency(&id(dependent), &id(dependency)).unwrap();
    }
    service
}

/// Jobs {1,2,3} with 2 waiting for 1 and 3 waiting for 2.
#[fixture]
fn chain_of_three() -> DependencyService {
    service_with(GraphConfig::default(), &["1", "2", "3"], &[("2", "1"), ("3", "2")])
}

// ========== Mutation checks ==========

#[rstest]
fn test_end_to_end_cycle_rejection(mut chain_of_three: DependencyService) {
    let result = chain_of_three.add_dependency(&id("1"), &id("3"));
    assert!(matches!(
        result,
        Err(Error::CircularDependency { ref dependent, ref dependency })
            if dependent == &id("1") && dependency == &id("3")
    ));
    assert_eq!(chain_of_three.store().edge_count(), 2);

    let report = chain_of_three.validate(&id("3"));
    assert!(!report.has_cycle);
    assert!(report.missing_dependencies.is_empty());
    assert!(!report.has_errors());
    assert_eq!(report.depth, 2);
}

#[rstest]
#[case("1")]
#[case("2")]
#[case("3")]
fn test_self_dependency_always_rejected(mut chain_of_three: DependencyService, #[case] job: &str) {
    let before = chain_of_three.store().edges();
    assert!(matches!(
        chain_of_three.add_dependency(&id(job), &id(job)),
        Err(Error::SelfDependency(ref rejected)) if rejected == &id(job)
    ));
    assert_eq!(chain_of_three.store().edges(), before);
}

#[rstest]
#[case::unknown_dependent("9", "1", "9")]
#[case::unknown_dependency("1", "9", "9")]
fn test_unknown_job_rejected(
    mut chain_of_three: DependencyService,
    #[case] dependent: &str,
    #[case] dependency: &str,
    #[case] missing: &str,
) {
    let result = chain_of_three.add_dependency(&id(dependent), &id(dependency));
    assert!(matches!(result, Err(Error::UnknownJob(ref unknown)) if unknown == &id(missing)));
    assert_eq!(chain_of_three.store().edge_count(), 2);
}

#[rstest]
fn test_duplicate_job_rejected(mut chain_of_three: DependencyService) {
    assert!(matches!(
        chain_of_three.add_job(Job::new("2")),
        Err(Error::DuplicateJob(_))
    ));
}

#[rstest]
fn test_adding_existing_edge_is_noop(mut chain_of_three: DependencyService) {
    chain_of_three.add_dependency(&id("2"), &id("1")).unwrap();
    assert_eq!(chain_of_three.store().edge_count(), 2);
}

#[rstest]
fn test_remove_dependency_is_idempotent(mut chain_of_three: DependencyService) {
    assert!(chain_of_three.remove_dependency(&id("3"), &id("2")));
    let once = chain_of_three.store().edges();

    assert!(!chain_of_three.remove_dependency(&id("3"), &id("2")));
    assert_eq!(chain_of_three.store().edges(), once);

    // Now the reverse edge is legal.
    chain_of_three.add_dependency(&id("1"), &id("3")).unwrap();
}

#[rstest]
fn test_remove_job_drops_edges(mut chain_of_three: DependencyService) {
    chain_of_three.remove_job(&id("2")).unwrap();
    assert_eq!(chain_of_three.store().edge_count(), 0);
    assert!(chain_of_three.dependents_of(&id("1")).is_empty());
    assert!(matches!(
        chain_of_three.remove_job(&id("2")),
        Err(Error::UnknownJob(_))
    ));
}

// ========== Depth and redundancy ==========

#[test]
fn test_depth_of_chain() {
    let service = service_with(
        GraphConfig::default(),
        &["a", "b", "c", "d"],
        &[("a", "b"), ("b", "c"), ("c", "d")],
    );
    assert_eq!(service.max_depth(&id("a")), 3);
    assert_eq!(service.max_depth(&id("d")), 0);
}

#[test]
fn test_redundant_dependency_reported() {
    // j waits for b and c; c already waits for b.
    let service = service_with(
        GraphConfig::default(),
        &["j", "b", "c"],
        &[("j", "b"), ("j", "c"), ("c", "b")],
    );

    assert_eq!(service.find_redundant(&id("j")), ids(&["b"]));

    let report = service.validate(&id("j"));
    assert_eq!(report.redundant_dependency_ids, ids(&["b"]));
    assert!(!report.has_errors());
    assert_eq!(
        report.warnings(),
        vec!["Redundant dependencies detected: b".to_string()]
    );
}

#[test]
fn test_excessive_depth_threshold() {
    let jobs = ["j0", "j1", "j2", "j3", "j4", "j5", "j6"];
    let edges: Vec<(&str, &str)> = jobs.windows(2).map(|pair| (pair[1], pair[0])).collect();
    let service = service_with(GraphConfig::default(), &jobs, &edges);

    // j5 sits exactly at the default threshold of 5, j6 is past it.
    assert!(!service.validate(&id("j5")).excessive_depth);
    let report = service.validate(&id("j6"));
    assert_eq!(report.depth, 6);
    assert!(report.excessive_depth);
}

// ========== Layering ==========

#[rstest]
#[case::longest_path(LayeringStrategy::LongestPath)]
#[case::first_discovery(LayeringStrategy::FirstDiscovery)]
fn test_diamond_layers_independent_of_insertion_order(#[case] layering: LayeringStrategy) {
    let config = GraphConfig {
        layering,
        ..GraphConfig::default()
    };
    let edges = [("b", "a"), ("c", "a"), ("d", "b"), ("d", "c")];

    let forward = service_with(config.clone(), &["a", "b", "c", "d"], &edges);
    let backward = service_with(config, &["d", "c", "b", "a"], &edges);

    let layers = forward.compute_layers();
    assert_eq!(layers, backward.compute_layers());

    let by_layer: Vec<Vec<&str>> = layers
        .iter()
        .map(|layer| layer.jobs.iter().map(JobId::as_str).collect())
        .collect();
    assert_eq!(by_layer, vec![vec!["a"], vec!["b", "c"], vec!["d"]]);
}

#[test]
fn test_layers_cover_every_job_once() {
    let service = service_with(
        GraphConfig::default(),
        &["a", "b", "c", "d", "e", "lonely"],
        &[("b", "a"), ("c", "b"), ("d", "a"), ("e", "c"), ("e", "d")],
    );

    let layers = service.compute_layers();
    let mut seen: Vec<&JobId> = layers.iter().flat_map(|layer| layer.jobs.iter()).collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 6);

    // Every dependency sits in an earlier layer.
    let layer_of = |job: &JobId| {
        layers
            .iter()
            .find(|layer| layer.jobs.contains(job))
            .map(|layer| layer.index)
    };
    for edge in service.store().edges() {
        assert!(layer_of(&edge.dependency) < layer_of(&edge.dependent), "{edge}");
    }
}

#[test]
fn test_validate_unknown_job_is_data_not_error() {
    let service = DependencyService::default();
    let report = service.validate(&id("ghost"));
    assert!(!report.job_found);
    assert!(report.has_errors());
}

#[test]
fn test_validate_all_ordered_by_id() {
    let service = service_with(GraphConfig::default(), &["b", "a", "c"], &[("b", "a")]);
    let order: Vec<JobId> = service
        .validate_all()
        .into_iter()
        .map(|report| report.job_id)
        .collect();
    assert_eq!(order, vec![id("a"), id("b"), id("c")]);
}
