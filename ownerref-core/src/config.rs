//! Injector configuration.
//!
//! # File format
//!
//! ```yaml
//! ownerReferences:
//!   - apiVersion: app/v1
//!     kind: MyApp
//!     name: instance1
//!     uid: abc-123
//!     controller: true
//! manifestSuffix: .yaml   # optional
//! logLevel: info          # optional: info | debug
//! ```
//!
//! # API pattern
//!
//! - `fn_at(path: &Path, …)` — explicit path; used in tests with `TempDir`
//! - `fn(…)` — derives the path from [`default_config_path`], delegates to `_at`

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{missing_field, OwnerReference};

/// Suffix of rendered files that carry manifests.
pub const DEFAULT_MANIFEST_SUFFIX: &str = ".yaml";

/// Level at which per-file diagnostics are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Debug,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
        }
    }
}

/// Everything the owner-reference decorator needs besides the wrapped engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectConfig {
    /// Written verbatim to `metadata.ownerReferences` of every manifest.
    pub owner_references: Vec<OwnerReference>,
    #[serde(default = "default_manifest_suffix")]
    pub manifest_suffix: String,
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_manifest_suffix() -> String {
    DEFAULT_MANIFEST_SUFFIX.to_string()
}

impl Default for InjectConfig {
    fn default() -> Self {
        Self {
            owner_references: Vec::new(),
            manifest_suffix: default_manifest_suffix(),
            log_level: LogLevel::default(),
        }
    }
}

impl InjectConfig {
    /// Config with the given references and default suffix / log level.
    pub fn new(owner_references: Vec<OwnerReference>) -> Self {
        Self {
            owner_references,
            ..Self::default()
        }
    }

    /// Reject references the API server would refuse and an empty suffix.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.manifest_suffix.is_empty() {
            return Err(ConfigError::Invalid("manifestSuffix must not be empty".into()));
        }
        for (i, reference) in self.owner_references.iter().enumerate() {
            if let Some(field) = missing_field(reference) {
                return Err(ConfigError::Invalid(format!(
                    "ownerReferences[{i}]: {field} must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Serialize to the on-disk YAML shape.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `<config_dir>/ownerref/config.yaml` — pure, no I/O.
pub fn config_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join("ownerref").join("config.yaml")
}

/// `<config_dir>/ownerref/config.yaml` using `dirs::config_dir()`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(config_path_in(&dir))
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load and validate the config at `path`.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_config_at(path: &Path) -> Result<InjectConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound { path: path.to_path_buf() });
    }
    let contents = std::fs::read_to_string(path)?;
    let config: InjectConfig = serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    config.validate()?;
    Ok(config)
}

/// `load_config_at` convenience wrapper.
pub fn load_config() -> Result<InjectConfig, ConfigError> {
    load_config_at(&default_config_path()?)
}

/// Atomically write `config` to `path`, creating parent directories.
///
/// Write flow: serialize → `.tmp` sibling → `rename`.
pub fn save_config_at(path: &Path, config: &InjectConfig) -> Result<(), ConfigError> {
    config.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, config.to_yaml()?)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
