//! Sequential run over the registry.
//!
//! Repositories are processed one at a time, each to completion, in registry
//! order. The failure count is the only state carried between iterations.

use chrono::Utc;
use serde::Serialize;

use fleetsync_core::{Mode, Registry, RunSummary, SyncConfig, SyncOutcome};
use fleetsync_git::Vcs;

use crate::isolation::process_repo;
use crate::report::Reporter;

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub outcomes: Vec<SyncOutcome>,
}

impl RunReport {
    pub fn exit_code(&self) -> u8 {
        self.summary.exit_code()
    }
}

/// Process every registry entry and fold the outcomes into a report.
pub fn run_all<V: Vcs + ?Sized>(
    registry: &Registry,
    vcs: &V,
    mode: Mode,
    config: &SyncConfig,
    reporter: &mut dyn Reporter,
) -> RunReport {
    let started_at = Utc::now();
    let total = registry.len();
    reporter.run_started(mode, total);

    let mut outcomes = Vec::with_capacity(total);
    let mut failed = 0usize;
    for (index, entry) in registry.entries().iter().enumerate() {
        reporter.repo_started(entry, index, total);
        let outcome = process_repo(vcs, entry, mode, config);
        if outcome.is_failure() {
            failed += 1;
        }
        tracing::debug!(
            repo = %entry.name,
            state = %outcome.state,
            action = ?outcome.action,
            error = ?outcome.error,
            "repository processed"
        );
        reporter.repo_finished(&outcome, mode);
        outcomes.push(outcome);
    }

    let summary = RunSummary::from_outcomes(mode, &outcomes, started_at, Utc::now());
    debug_assert_eq!(summary.failed, failed);
    reporter.run_finished(&summary, &outcomes);
    RunReport { summary, outcomes }
}
