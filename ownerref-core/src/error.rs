//! Error types for ownerref-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading or saving injector configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config parsed but describes something the injector cannot use.
    #[error("invalid config: {0}")]
    Invalid(String),

    /// `dirs::config_dir()` returned `None`.
    #[error("cannot determine config directory; set $XDG_CONFIG_HOME or $HOME")]
    ConfigDirNotFound,

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },
}
