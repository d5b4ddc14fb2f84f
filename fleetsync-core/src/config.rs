//! Run configuration, read from `~/.fleetsync/config.yaml` when present.
//!
//! ```text
//! git_program: git
//! timeout_secs: 300        # 0 disables the bound
//! preview_limit: 5
//! noise_prefixes:
//!   - "hint:"
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_DIR: &str = ".fleetsync";
pub const CONFIG_FILE: &str = "config.yaml";

pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_PREVIEW_LIMIT: usize = 5;
pub const MAX_PREVIEW_LIMIT: usize = 50;

/// Advisory lines git prints that carry no diagnostic value for an operator.
pub const DEFAULT_NOISE_PREFIXES: &[&str] = &[
    "hint:",
    "warning: redirecting to",
    "Warning: Permanently added",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Program invoked for every version-control operation.
    pub git_program: String,
    /// Upper bound for a single git invocation, in seconds. `0` means unbounded.
    pub timeout_secs: u64,
    /// Pending upstream commits listed per repository.
    pub preview_limit: usize,
    /// Lines of git diagnostic output starting with any of these are dropped.
    pub noise_prefixes: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            git_program: "git".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            noise_prefixes: DEFAULT_NOISE_PREFIXES
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }
}

impl SyncConfig {
    /// `None` when timeouts are disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.git_program.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "git_program",
                reason: "must not be empty".to_string(),
            });
        }
        if self.preview_limit == 0 || self.preview_limit > MAX_PREVIEW_LIMIT {
            return Err(ConfigError::Invalid {
                field: "preview_limit",
                reason: format!(
                    "{} is outside 1..={MAX_PREVIEW_LIMIT}",
                    self.preview_limit
                ),
            });
        }
        Ok(())
    }
}

/// `<home>/.fleetsync/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Load `<home>/.fleetsync/config.yaml`, or defaults if the file is absent.
pub fn load_at(home: &Path) -> Result<SyncConfig, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(SyncConfig::default());
    }
    load_file(&path)
}

/// Load and validate a specific config file.
pub fn load_file(path: &Path) -> Result<SyncConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // An empty file deserializes to `null`; treat it as "all defaults".
    if contents.trim().is_empty() {
        return Ok(SyncConfig::default());
    }
    let config: SyncConfig =
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}
