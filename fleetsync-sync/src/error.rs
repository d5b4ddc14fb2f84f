//! Error types for fleetsync-sync.
//!
//! Per-repository failures are never errors here: they become
//! [`fleetsync_core::SyncOutcome`] values. Only problems that prevent a run
//! from starting surface as [`SyncError`].

use thiserror::Error;

use fleetsync_core::error::RegistryError;

/// Errors that stop a run before any repository is processed.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the registry (e.g. an unknown `--only` name).
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}
