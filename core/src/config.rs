//! Core configuration
//!
//! Loaded through confy (TOML) under the `buffscope` app name, or from an
//! explicit TOML file. Every field has a serde default so partial files work.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::intervals::{BuildOptions, OrphanRemovePolicy};

const APP_NAME: &str = "buffscope";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Size of the index worker pool. 0 lets rayon pick.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
    /// Number of (ability, target) groups at which interval building goes parallel
    #[serde(default = "default_parallel_group_threshold")]
    pub parallel_group_threshold: usize,
    /// What a Remove/Fade with no preceding Apply means
    #[serde(default)]
    pub orphan_removes: OrphanRemovePolicy,
}

fn default_worker_threads() -> usize {
    1
}

fn default_parallel_group_threshold() -> usize {
    4_096
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            parallel_group_threshold: default_parallel_group_threshold(),
            orphan_removes: OrphanRemovePolicy::default(),
        }
    }
}

impl CoreConfig {
    /// Load the user config, falling back to defaults if it is missing or unreadable.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    pub fn try_load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, None)?)
    }

    /// Load through confy from an explicit path. A missing file is created with defaults.
    pub fn try_load_path(path: &Path) -> Result<Self, ConfigError> {
        Ok(confy::load_path(path)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, None, self).map_err(ConfigError::Save)
    }

    /// Load from an explicit TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            orphan_removes: self.orphan_removes,
            parallel_group_threshold: self.parallel_group_threshold,
        }
    }
}
