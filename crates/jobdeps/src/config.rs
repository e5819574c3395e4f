//! Configuration for the dependency service.
//!
//! Loaded from YAML. Every key is optional:
//!
//! ```yaml
//! max-depth: 5
//! layering: longest-path   # or first-discovery
//! ```

use crate::error::{Error, Result};
use crate::graph::LayeringStrategy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Default depth above which `validate` flags a chain as excessive.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Tunables for validation and layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GraphConfig {
    /// Depth threshold: a job deeper than this is reported as excessive
    pub max_depth: usize,

    /// Layer assignment strategy used by `compute_layers`
    pub layering: LayeringStrategy,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            layering: LayeringStrategy::default(),
        }
    }
}

impl GraphConfig {
    /// Parse configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the YAML is malformed or has unknown values.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if
    /// it cannot be parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        Self::from_yaml_str(&content)
    }
}
