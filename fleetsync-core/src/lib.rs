//! fleetsync core library — domain types, the repository registry, config, errors.
//!
//! - [`types`] — newtypes, states, outcomes
//! - [`registry`] — compiled-in fleet and YAML override
//! - [`config`] — `~/.fleetsync/config.yaml`
//! - [`error`] — [`RegistryError`], [`ConfigError`]

pub mod config;
pub mod error;
pub mod registry;
pub mod types;

pub use config::SyncConfig;
pub use error::{ConfigError, RegistryError};
pub use registry::Registry;
pub use types::{
    Action, ErrorKind, Mode, PendingCommit, RepoEntry, RepoName, RepoState, RunSummary,
    SyncOutcome,
};
