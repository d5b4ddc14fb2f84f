//! Error types for fleetsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while building or loading a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Underlying I/O failure while reading a registry file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with the offending file path.
    #[error("failed to parse registry at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The registry file did not exist at the given path.
    #[error("registry not found at {path}")]
    NotFound { path: PathBuf },

    /// Two entries share a name.
    #[error("duplicate repository name '{name}' in registry")]
    DuplicateName { name: String },

    /// An entry has an empty name.
    #[error("repository entry for {path} has an empty name")]
    EmptyName { path: PathBuf },

    /// A `--only` filter named a repository the registry does not contain.
    #[error("unknown repository '{name}'; known: {known}")]
    UnknownRepo { name: String, known: String },
}

/// All errors that can arise while loading `config.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}
