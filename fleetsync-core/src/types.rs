//! Domain types for a fleetsync run.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Everything here is produced once per run and never persisted, but the types
//! serialize so the CLI can emit a machine-readable report.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed, human-readable name for a repository in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoName(pub String);

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RepoName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RepoName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Registry entry
// ---------------------------------------------------------------------------

/// One working copy the fleet keeps in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoEntry {
    pub name: RepoName,
    /// Absolute path to the working copy. Existence is checked at evaluation time.
    pub path: PathBuf,
}

impl RepoEntry {
    pub fn new(name: impl Into<RepoName>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Relationship between a working copy and its upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoState {
    UpToDate,
    LocalAhead,
    RemoteAhead,
    Diverged,
    Unknown,
}

impl fmt::Display for RepoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoState::UpToDate => write!(f, "up-to-date"),
            RepoState::LocalAhead => write!(f, "local-ahead"),
            RepoState::RemoteAhead => write!(f, "remote-ahead"),
            RepoState::Diverged => write!(f, "diverged"),
            RepoState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Why a repository failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotARepo,
    PermissionDenied,
    FetchFailed,
    UnresolvedUpstream,
    PullFailed,
    Diverged,
    /// A git query other than fetch or fast-forward failed (e.g. unborn HEAD).
    GitFailed,
    /// The unit of work panicked and was contained.
    Aborted,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotARepo => write!(f, "not a repository"),
            ErrorKind::PermissionDenied => write!(f, "permission denied"),
            ErrorKind::FetchFailed => write!(f, "fetch failed"),
            ErrorKind::UnresolvedUpstream => write!(f, "unresolved upstream"),
            ErrorKind::PullFailed => write!(f, "fast-forward failed"),
            ErrorKind::Diverged => write!(f, "diverged"),
            ErrorKind::GitFailed => write!(f, "git failed"),
            ErrorKind::Aborted => write!(f, "aborted"),
        }
    }
}

/// Operating mode, selected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Status,
    DryRun,
    #[default]
    Apply,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Status => write!(f, "status"),
            Mode::DryRun => write!(f, "dry-run"),
            Mode::Apply => write!(f, "apply"),
        }
    }
}

/// What the controller did with a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    None,
    Reported,
    Pulled,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// An upstream commit not yet present locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCommit {
    pub short_id: String,
    pub subject: String,
}

/// Final record for one repository in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub repo: RepoEntry,
    pub state: RepoState,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    /// Short diagnostic accompanying `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Upstream commits missing locally, newest first, truncated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending: Vec<PendingCommit>,
    /// Commits on local not on upstream.
    pub ahead: usize,
    /// Commits on upstream not on local.
    pub behind: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
}

impl SyncOutcome {
    /// An outcome carrying only a state (no error, no action, no counts).
    pub fn new(repo: RepoEntry, state: RepoState) -> Self {
        Self {
            repo,
            state,
            action: Action::None,
            error: None,
            detail: None,
            pending: Vec::new(),
            ahead: 0,
            behind: 0,
            local: None,
            upstream: None,
        }
    }

    /// An `Unknown` outcome for a repository whose unit of work failed.
    pub fn failed(repo: RepoEntry, kind: ErrorKind, detail: impl Into<String>) -> Self {
        let mut outcome = Self::new(repo, RepoState::Unknown);
        outcome.error = Some(kind);
        outcome.detail = Some(detail.into());
        outcome
    }

    /// Whether this outcome counts against the run's exit status.
    ///
    /// Passing: `UpToDate`, `LocalAhead`, and `RemoteAhead` that was either
    /// reported or pulled, always without an error attached.
    pub fn is_failure(&self) -> bool {
        if self.error.is_some() {
            return true;
        }
        match self.state {
            RepoState::UpToDate | RepoState::LocalAhead => false,
            RepoState::RemoteAhead => !matches!(self.action, Action::Reported | Action::Pulled),
            RepoState::Diverged | RepoState::Unknown => true,
        }
    }
}

/// Aggregate view of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub mode: Mode,
    pub total: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    /// Fold a set of outcomes into a summary.
    pub fn from_outcomes(
        mode: Mode,
        outcomes: &[SyncOutcome],
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            mode,
            total: outcomes.len(),
            failed: outcomes.iter().filter(|o| o.is_failure()).count(),
            started_at,
            finished_at,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Process exit status: `0` when nothing failed, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.succeeded() {
            0
        } else {
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
