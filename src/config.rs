//! Compiler configuration, loadable from TOML.
//!
//! ```toml
//! max_depth = 32
//! max_alternatives = 1024
//! default_operation = "="
//! wrap_patterns = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ast::Operation;
use crate::encoder::ValueEncoder;

pub const CONFIG_DIR: &str = "serafim";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Deepest AND/OR nesting accepted before compilation fails.
    pub max_depth: usize,
    /// Upper bound on the number of alternatives an expression may expand to.
    pub max_alternatives: usize,
    /// Operation used for leaves that omit one.
    pub default_operation: Operation,
    /// Wrap LIKE/ILIKE operands in `%...%`.
    pub wrap_patterns: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_alternatives: 1024,
            default_operation: Operation::Eq,
            wrap_patterns: true,
        }
    }
}

impl CompilerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// `<config dir>/serafim/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the user config file when it exists, otherwise defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading compiler config");
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn encoder(&self) -> ValueEncoder {
        ValueEncoder::new(self.wrap_patterns)
    }
}
