//! Per-repository error boundary.
//!
//! A repository's unit of work (evaluate, then act) runs inside
//! `catch_unwind`; a panic becomes an `Aborted` outcome for that repository
//! and the run continues with the next one. No working-directory state needs
//! restoring: every git invocation carries its own directory.
//!
//! The default panic hook still writes `thread '…' panicked at` (and a
//! backtrace under `RUST_BACKTRACE`) before the unwind is caught. Binaries
//! call [`route_panics_to_tracing`] once at startup so the operator only sees
//! the repository's `FAIL` line.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use fleetsync_core::{ErrorKind, Mode, RepoEntry, SyncConfig, SyncOutcome};
use fleetsync_git::Vcs;

use crate::controller::act;
use crate::evaluator::evaluate;

/// Replace the process-wide panic hook with one that logs at debug level.
///
/// Run with `RUST_LOG=debug` to see where a contained panic came from.
pub fn route_panics_to_tracing() {
    panic::set_hook(Box::new(|info| {
        let message = panic_message(info.payload());
        let location = info
            .location()
            .map(|at| format!("{}:{}", at.file(), at.line()))
            .unwrap_or_default();
        tracing::debug!(%message, %location, "panic contained");
    }));
}

/// Run `unit` for `entry`, converting a panic into a failed outcome.
pub fn isolate<F>(entry: &RepoEntry, unit: F) -> SyncOutcome
where
    F: FnOnce() -> SyncOutcome,
{
    match panic::catch_unwind(AssertUnwindSafe(unit)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(repo = %entry.name, %message, "repository unit aborted");
            SyncOutcome::failed(
                entry.clone(),
                ErrorKind::Aborted,
                format!("internal error: {message}"),
            )
        }
    }
}

/// Evaluate and act on one repository inside the error boundary.
pub fn process_repo<V: Vcs + ?Sized>(
    vcs: &V,
    entry: &RepoEntry,
    mode: Mode,
    config: &SyncConfig,
) -> SyncOutcome {
    isolate(entry, || {
        let evaluation = evaluate(vcs, entry);
        act(vcs, entry, mode, evaluation, config)
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
