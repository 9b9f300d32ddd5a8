//! Runtime configuration.
//!
//! Configuration is read from TOML:
//!
//! ```toml
//! # Collect after this many foreign allocations (0 disables automatic GC).
//! gc_threshold = 1024
//! # Longest evaluator program accepted.
//! max_program_len = 65536
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {path}")]
    Io {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has unknown keys.
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Tunables of the reference runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Foreign allocations between automatic collections. 0 disables them.
    pub gc_threshold: usize,
    /// Maximum number of instructions in one evaluator program.
    pub max_program_len: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            gc_threshold: 1024,
            max_program_len: 65536,
        }
    }
}

impl RuntimeConfig {
    /// Parses a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
