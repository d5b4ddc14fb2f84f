//! In-memory [`Vcs`] used by this crate's unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io;
use std::path::Path;

use fleetsync_core::{PendingCommit, RepoEntry};
use fleetsync_git::{GitError, Vcs};
use tempfile::TempDir;

/// Commit graph is modelled as an explicit set of `(ancestor, descendant)` pairs.
#[derive(Debug, Default)]
pub struct FakeVcs {
    pub head: RefCell<String>,
    pub upstream: Option<String>,
    pub ancestry: HashSet<(String, String)>,
    pub counts: (usize, usize),
    pub pending: Vec<PendingCommit>,
    pub fetch_error: Option<String>,
    pub ff_error: Option<String>,
    /// Leave HEAD untouched on a "successful" fast-forward.
    pub ff_noop: bool,
    /// Fail the writability check.
    pub read_only: bool,
    pub panic_on_fetch: bool,
    pub fetches: Cell<usize>,
    pub fast_forwards: RefCell<Vec<String>>,
}

impl FakeVcs {
    pub fn new(head: &str, upstream: &str) -> Self {
        Self {
            head: RefCell::new(head.to_string()),
            upstream: Some(upstream.to_string()),
            ..Self::default()
        }
    }

    pub fn with_ancestor(mut self, ancestor: &str, descendant: &str) -> Self {
        self.ancestry
            .insert((ancestor.to_string(), descendant.to_string()));
        self
    }

    pub fn with_counts(mut self, ahead: usize, behind: usize) -> Self {
        self.counts = (ahead, behind);
        self
    }

    pub fn with_pending(mut self, subjects: &[&str]) -> Self {
        self.pending = subjects
            .iter()
            .enumerate()
            .map(|(i, s)| PendingCommit {
                short_id: format!("c{i}"),
                subject: (*s).to_string(),
            })
            .collect();
        self
    }

    pub fn current_head(&self) -> String {
        self.head.borrow().clone()
    }
}

fn failed(command: &str, stderr: &str) -> GitError {
    GitError::Failed {
        command: command.to_string(),
        code: Some(128),
        stderr: stderr.to_string(),
    }
}

impl Vcs for FakeVcs {
    fn check_writable(&self, _repo: &Path) -> io::Result<()> {
        if self.read_only {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "Permission denied (os error 13)",
            ));
        }
        Ok(())
    }

    fn fetch(&self, _repo: &Path) -> Result<(), GitError> {
        self.fetches.set(self.fetches.get() + 1);
        if self.panic_on_fetch {
            panic!("simulated crash while fetching");
        }
        match &self.fetch_error {
            Some(msg) => Err(failed("git fetch", msg)),
            None => Ok(()),
        }
    }

    fn head(&self, _repo: &Path) -> Result<String, GitError> {
        Ok(self.current_head())
    }

    fn upstream(&self, _repo: &Path) -> Result<String, GitError> {
        self.upstream
            .clone()
            .ok_or_else(|| failed("git rev-parse", "fatal: no upstream configured"))
    }

    fn is_ancestor(
        &self,
        _repo: &Path,
        ancestor: &str,
        descendant: &str,
    ) -> Result<bool, GitError> {
        Ok(ancestor == descendant
            || self
                .ancestry
                .contains(&(ancestor.to_string(), descendant.to_string())))
    }

    fn ahead_behind(
        &self,
        _repo: &Path,
        _local: &str,
        _upstream: &str,
    ) -> Result<(usize, usize), GitError> {
        Ok(self.counts)
    }

    fn pending_commits(
        &self,
        _repo: &Path,
        _local: &str,
        _upstream: &str,
        limit: usize,
    ) -> Result<Vec<PendingCommit>, GitError> {
        Ok(self.pending.iter().take(limit).cloned().collect())
    }

    fn fast_forward(&self, _repo: &Path, target: &str) -> Result<(), GitError> {
        self.fast_forwards.borrow_mut().push(target.to_string());
        if let Some(msg) = &self.ff_error {
            return Err(failed("git merge --ff-only", msg));
        }
        if !self.ff_noop {
            *self.head.borrow_mut() = target.to_string();
        }
        Ok(())
    }
}

/// A writable directory that looks like a working copy (has `.git/`).
pub fn working_copy(name: &str) -> (TempDir, RepoEntry) {
    let dir = TempDir::new().expect("tempdir");
    std::fs::create_dir(dir.path().join(".git")).expect("mkdir .git");
    let entry = RepoEntry::new(name, dir.path());
    (dir, entry)
}
