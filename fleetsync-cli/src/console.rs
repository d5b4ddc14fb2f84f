//! Operator log: timestamped, marker-tagged lines on stderr.
//!
//! ```text
//! [2026-10-17 09:14:02] INFO  notes: 2 new commits upstream
//! [2026-10-17 09:14:02] INFO  notes:     4f1c2d9 fix typo in index
//! [2026-10-17 09:14:03] OK    notes: fast-forwarded to 4f1c2d9
//! [2026-10-17 09:14:05] FAIL  infra: diverged: local and upstream histories have diverged; ...
//! ```

use std::io::{self, Write};

use chrono::Local;
use colored::{ColoredString, Colorize};

use fleetsync_core::{Action, Mode, RepoState, RunSummary, SyncOutcome};
use fleetsync_sync::Reporter;

use crate::report::{failure_text, summary_table};

const BANNER_WIDTH: usize = 67;

/// Severity marker at the start of each log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Info,
    Ok,
    Warn,
    Fail,
}

impl Mark {
    fn label(self) -> ColoredString {
        match self {
            Mark::Info => format!("{:<5}", "INFO").cyan(),
            Mark::Ok => format!("{:<5}", "OK").green().bold(),
            Mark::Warn => format!("{:<5}", "WARN").yellow().bold(),
            Mark::Fail => format!("{:<5}", "FAIL").red().bold(),
        }
    }
}

/// [`Reporter`] writing the human log to any sink, stderr in production.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, mark: Mark, name: Option<&str>, message: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        // A closed stderr is not worth aborting the run for.
        let _ = match name {
            Some(name) => writeln!(self.out, "[{stamp}] {} {name}: {message}", mark.label()),
            None => writeln!(self.out, "[{stamp}] {} {message}", mark.label()),
        };
    }

    fn banner(&mut self) {
        let _ = writeln!(self.out, "{}", "■".repeat(BANNER_WIDTH).bright_black());
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn run_started(&mut self, mode: Mode, total: usize) {
        self.banner();
        self.line(
            Mark::Info,
            None,
            &format!(
                "fleetsync v{} | mode: {mode} | {}",
                env!("CARGO_PKG_VERSION"),
                plural(total, "repository", "repositories"),
            ),
        );
        self.banner();
    }

    fn repo_finished(&mut self, outcome: &SyncOutcome, mode: Mode) {
        let name = outcome.repo.name.0.as_str();
        let (mark, message) = describe(outcome, mode);
        self.line(mark, Some(name), &message);

        if outcome.state == RepoState::RemoteAhead && outcome.error.is_none() {
            for commit in &outcome.pending {
                self.line(
                    Mark::Info,
                    Some(name),
                    &format!("    {} {}", commit.short_id, commit.subject),
                );
            }
            if outcome.behind > outcome.pending.len() {
                let rest = outcome.behind - outcome.pending.len();
                self.line(Mark::Info, Some(name), &format!("    ... and {rest} more"));
            }
        }
    }

    fn run_finished(&mut self, summary: &RunSummary, outcomes: &[SyncOutcome]) {
        let elapsed = (summary.finished_at - summary.started_at).num_milliseconds() as f64 / 1000.0;
        self.banner();
        if summary.succeeded() {
            self.line(
                Mark::Ok,
                None,
                &format!(
                    "{} in sync ({elapsed:.1}s)",
                    plural(summary.total, "repository", "repositories")
                ),
            );
        } else {
            self.line(
                Mark::Fail,
                None,
                &format!(
                    "{} of {} failed ({elapsed:.1}s)",
                    summary.failed,
                    plural(summary.total, "repository", "repositories")
                ),
            );
        }
        self.banner();
        if !outcomes.is_empty() {
            let _ = writeln!(self.out, "{}", summary_table(outcomes));
        }
    }
}

/// Marker and message for one finished repository.
pub fn describe(outcome: &SyncOutcome, mode: Mode) -> (Mark, String) {
    if let Some(kind) = outcome.error {
        return (Mark::Fail, failure_text(kind, outcome.detail.as_deref()));
    }

    match (outcome.state, outcome.action) {
        (RepoState::UpToDate, _) => (Mark::Ok, "already current".to_string()),
        (RepoState::LocalAhead, _) => (
            Mark::Warn,
            format!(
                "{} ahead of upstream (unpushed); left untouched",
                plural(outcome.ahead, "commit", "commits")
            ),
        ),
        (RepoState::RemoteAhead, Action::Pulled) => (
            Mark::Ok,
            format!(
                "fast-forwarded to {} ({})",
                short(outcome.local.as_deref().unwrap_or("?")),
                plural(outcome.behind, "commit", "commits")
            ),
        ),
        (RepoState::RemoteAhead, _) => {
            let behind = plural(outcome.behind, "new commit", "new commits");
            let message = match mode {
                Mode::DryRun => format!(
                    "[dry-run] would fast-forward to {} ({behind})",
                    short(outcome.upstream.as_deref().unwrap_or("?"))
                ),
                Mode::Status | Mode::Apply => format!("{behind} upstream"),
            };
            (Mark::Info, message)
        }
        (RepoState::Diverged, _) => (Mark::Fail, "histories have diverged".to_string()),
        (RepoState::Unknown, _) => (Mark::Fail, "state could not be determined".to_string()),
    }
}

fn short(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}
