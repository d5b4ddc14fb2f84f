//! Reporting hooks the aggregator calls as a run progresses.

use fleetsync_core::{Mode, RepoEntry, RunSummary, SyncOutcome};

/// Receives run events in order: one `run_started`, then `repo_started` /
/// `repo_finished` per repository, then one `run_finished`.
pub trait Reporter {
    fn run_started(&mut self, mode: Mode, total: usize);

    fn repo_started(&mut self, _entry: &RepoEntry, _index: usize, _total: usize) {}

    fn repo_finished(&mut self, outcome: &SyncOutcome, mode: Mode);

    fn run_finished(&mut self, summary: &RunSummary, outcomes: &[SyncOutcome]);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn run_started(&mut self, _mode: Mode, _total: usize) {}

    fn repo_finished(&mut self, _outcome: &SyncOutcome, _mode: Mode) {}

    fn run_finished(&mut self, _summary: &RunSummary, _outcomes: &[SyncOutcome]) {}
}
