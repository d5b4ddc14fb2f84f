//! Per-repository state detection.
//!
//! Preconditions, each a distinct early failure:
//! 1. version-control metadata present → else `NotARepo`
//! 2. working copy writable            → else `PermissionDenied`
//! 3. fetch succeeds                    → else `FetchFailed`
//! 4. upstream resolves                 → else `UnresolvedUpstream`
//!
//! Classification order:
//! 1. local == upstream             → `UpToDate`
//! 2. upstream ancestor of local    → `LocalAhead`
//! 3. local ancestor of upstream    → `RemoteAhead`
//! 4. otherwise                     → `Diverged`
//!
//! The fetch is the only step that changes anything on disk (remote-tracking refs).

use std::path::Path;

use fleetsync_core::{ErrorKind, RepoEntry, RepoState};
use fleetsync_git::{GitError, Vcs};

/// An error kind plus the short diagnostic shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: ErrorKind,
    pub detail: String,
}

impl Failure {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    fn from_git(kind: ErrorKind, context: &str, err: &GitError) -> Self {
        Self::new(kind, format!("{context}: {}", err.diagnostic()))
    }
}

/// Result of evaluating one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub state: RepoState,
    pub failure: Option<Failure>,
    pub local: Option<String>,
    pub upstream: Option<String>,
    pub ahead: usize,
    pub behind: usize,
}

impl Evaluation {
    fn unknown(failure: Failure) -> Self {
        Self {
            state: RepoState::Unknown,
            failure: Some(failure),
            local: None,
            upstream: None,
            ahead: 0,
            behind: 0,
        }
    }
}

/// Classify `entry` against its upstream.
pub fn evaluate<V: Vcs + ?Sized>(vcs: &V, entry: &RepoEntry) -> Evaluation {
    match classify(vcs, &entry.path) {
        Ok(evaluation) => evaluation,
        Err(failure) => {
            tracing::debug!(repo = %entry.name, kind = ?failure.kind, "evaluation stopped early");
            Evaluation::unknown(failure)
        }
    }
}

fn classify<V: Vcs + ?Sized>(vcs: &V, path: &Path) -> Result<Evaluation, Failure> {
    check_metadata(vcs, path)?;
    check_writable(vcs, path)?;

    vcs.fetch(path)
        .map_err(|e| Failure::from_git(ErrorKind::FetchFailed, "fetch failed", &e))?;
    let upstream = vcs.upstream(path).map_err(|e| {
        Failure::from_git(
            ErrorKind::UnresolvedUpstream,
            "no upstream for the current branch",
            &e,
        )
    })?;
    let local = vcs
        .head(path)
        .map_err(|e| Failure::from_git(ErrorKind::GitFailed, "cannot resolve HEAD", &e))?;

    if local == upstream {
        return Ok(Evaluation {
            state: RepoState::UpToDate,
            failure: None,
            local: Some(local),
            upstream: Some(upstream),
            ahead: 0,
            behind: 0,
        });
    }

    let ancestry = |a: &str, b: &str| {
        vcs.is_ancestor(path, a, b)
            .map_err(|e| Failure::from_git(ErrorKind::GitFailed, "ancestry test failed", &e))
    };
    let (state, failure) = if ancestry(&upstream, &local)? {
        (RepoState::LocalAhead, None)
    } else if ancestry(&local, &upstream)? {
        (RepoState::RemoteAhead, None)
    } else {
        (
            RepoState::Diverged,
            Some(Failure::new(
                ErrorKind::Diverged,
                "local and upstream histories have diverged; manual intervention required",
            )),
        )
    };

    let (ahead, behind) = vcs
        .ahead_behind(path, &local, &upstream)
        .map_err(|e| Failure::from_git(ErrorKind::GitFailed, "cannot count commits", &e))?;

    Ok(Evaluation {
        state,
        failure,
        local: Some(local),
        upstream: Some(upstream),
        ahead,
        behind,
    })
}

fn check_metadata<V: Vcs + ?Sized>(vcs: &V, path: &Path) -> Result<(), Failure> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(Failure::new(
                ErrorKind::NotARepo,
                format!("{} is not a directory", path.display()),
            ))
        }
        Err(err) => {
            return Err(Failure::new(
                ErrorKind::NotARepo,
                format!("cannot access {}: {err}", path.display()),
            ))
        }
    }
    if let Err(err) = std::fs::read_dir(path) {
        return Err(Failure::new(
            ErrorKind::NotARepo,
            format!("cannot read {}: {err}", path.display()),
        ));
    }
    if !vcs.has_metadata(path) {
        return Err(Failure::new(
            ErrorKind::NotARepo,
            format!("no version-control metadata in {}", path.display()),
        ));
    }
    Ok(())
}

fn check_writable<V: Vcs + ?Sized>(vcs: &V, path: &Path) -> Result<(), Failure> {
    vcs.check_writable(path).map_err(|err| {
        Failure::new(
            ErrorKind::PermissionDenied,
            format!("{} is not writable: {err}", path.display()),
        )
    })
}
