//! Shared run entrypoint used by the CLI.

use fleetsync_core::{Mode, Registry, RepoName, SyncConfig};
use fleetsync_git::Vcs;

use crate::aggregator::{run_all, RunReport};
use crate::report::Reporter;
use crate::SyncError;

/// Which registry entries a run covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncScope {
    /// Every registered repository.
    #[default]
    All,
    /// Only the named repositories, in registry order.
    Only(Vec<RepoName>),
}

/// Run the pipeline for a scope.
///
/// Fails only when the scope cannot be resolved against the registry; every
/// per-repository problem is reported inside the returned [`RunReport`].
pub fn run<V: Vcs + ?Sized>(
    registry: &Registry,
    scope: SyncScope,
    vcs: &V,
    mode: Mode,
    config: &SyncConfig,
    reporter: &mut dyn Reporter,
) -> Result<RunReport, SyncError> {
    let selected = match scope {
        SyncScope::All => registry.clone(),
        SyncScope::Only(names) => registry.select(&names)?,
    };
    Ok(run_all(&selected, vcs, mode, config, reporter))
}
