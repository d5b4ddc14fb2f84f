//! Mode controller: turns an [`Evaluation`] into a [`SyncOutcome`].
//!
//! Only `Apply` on a `RemoteAhead` repository ever touches the working copy,
//! and only with a fast-forward. Divergence is reported, never reconciled.

use fleetsync_core::{Action, ErrorKind, Mode, RepoEntry, RepoState, SyncConfig, SyncOutcome};
use fleetsync_git::Vcs;

use crate::evaluator::{Evaluation, Failure};

/// Decide and perform the action for one evaluated repository.
pub fn act<V: Vcs + ?Sized>(
    vcs: &V,
    entry: &RepoEntry,
    mode: Mode,
    evaluation: Evaluation,
    config: &SyncConfig,
) -> SyncOutcome {
    let mut outcome = SyncOutcome::new(entry.clone(), evaluation.state);
    outcome.local = evaluation.local.clone();
    outcome.upstream = evaluation.upstream.clone();
    outcome.ahead = evaluation.ahead;
    outcome.behind = evaluation.behind;

    match evaluation.state {
        RepoState::UpToDate | RepoState::LocalAhead => {}
        RepoState::Diverged => {
            let failure = evaluation.failure.unwrap_or_else(|| {
                Failure::new(ErrorKind::Diverged, "histories have diverged")
            });
            attach(&mut outcome, failure);
        }
        RepoState::Unknown => {
            let failure = evaluation.failure.unwrap_or_else(|| {
                Failure::new(ErrorKind::GitFailed, "state could not be determined")
            });
            attach(&mut outcome, failure);
        }
        RepoState::RemoteAhead => {
            if let Err(failure) = remote_ahead(vcs, entry, mode, config, &mut outcome) {
                attach(&mut outcome, failure);
            }
        }
    }
    outcome
}

fn remote_ahead<V: Vcs + ?Sized>(
    vcs: &V,
    entry: &RepoEntry,
    mode: Mode,
    config: &SyncConfig,
    outcome: &mut SyncOutcome,
) -> Result<(), Failure> {
    let (Some(local), Some(upstream)) = (outcome.local.clone(), outcome.upstream.clone()) else {
        return Err(Failure::new(
            ErrorKind::GitFailed,
            "commit ids missing for a remote-ahead repository",
        ));
    };

    outcome.pending = vcs
        .pending_commits(&entry.path, &local, &upstream, config.preview_limit)
        .map_err(|e| {
            Failure::new(
                ErrorKind::GitFailed,
                format!("cannot list pending commits: {}", e.diagnostic()),
            )
        })?;

    match mode {
        Mode::Status | Mode::DryRun => {
            outcome.action = Action::Reported;
        }
        Mode::Apply => {
            vcs.fast_forward(&entry.path, &upstream).map_err(|e| {
                Failure::new(ErrorKind::PullFailed, e.diagnostic())
            })?;
            let now = vcs.head(&entry.path).map_err(|e| {
                Failure::new(
                    ErrorKind::PullFailed,
                    format!("cannot resolve HEAD after fast-forward: {}", e.diagnostic()),
                )
            })?;
            if now != upstream {
                return Err(Failure::new(
                    ErrorKind::PullFailed,
                    format!("HEAD is at {now} after fast-forward, expected {upstream}"),
                ));
            }
            tracing::debug!(repo = %entry.name, from = %local, to = %upstream, "fast-forwarded");
            outcome.local = Some(now);
            outcome.action = Action::Pulled;
        }
    }
    Ok(())
}

fn attach(outcome: &mut SyncOutcome, failure: Failure) {
    outcome.error = Some(failure.kind);
    outcome.detail = Some(failure.detail);
}
