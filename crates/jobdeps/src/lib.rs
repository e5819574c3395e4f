//! Jobdeps - a job dependency graph engine.
//!
//! Maintains directed "waits for" relationships between batch jobs,
//! rejects edits that would introduce a cycle, and serves derived views:
//! layered ordering for visualization, dependency depth, redundant edges,
//! and per-job validation reports.
//!
//! # Example
//!
//! ```
//! use jobdeps::config::GraphConfig;
//! use jobdeps::domain::{Job, JobId};
//! use jobdeps::error::Error;
//! use jobdeps::service::DependencyService;
//!
//! let mut service = DependencyService::new(GraphConfig::default());
//! for id in ["extract", "transform", "load"] {
//!     service.add_job(Job::new(id))?;
//! }
//!
//! let (extract, transform, load) =
//!     (JobId::new("extract"), JobId::new("transform"), JobId::new("load"));
//! service.add_dependency(&transform, &extract)?;
//! service.add_dependency(&load, &transform)?;
//!
//! // Closing the loop is rejected and the graph is left untouched.
//! assert!(matches!(
//!     service.add_dependency(&extract, &load),
//!     Err(Error::CircularDependency { .. })
//! ));
//!
//! assert_eq!(service.max_depth(&load), 2);
//! assert_eq!(service.compute_layers().len(), 3);
//! # Ok::<(), jobdeps::error::Error>(())
//! ```

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod service;
pub mod snapshot;

// Public CLI module (needed by binary)
pub mod cli;
