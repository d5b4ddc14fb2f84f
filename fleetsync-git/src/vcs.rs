//! The version-control seam the evaluator and controller are written against.

use std::io;
use std::path::Path;

use fleetsync_core::PendingCommit;

use crate::error::GitError;

/// Operations fleetsync needs from a version-control tool.
///
/// Every method takes the working copy explicitly; implementations must not
/// depend on the process's current directory.
pub trait Vcs {
    /// Whether `repo` carries version-control metadata.
    fn has_metadata(&self, repo: &Path) -> bool {
        repo.join(".git").exists()
    }

    /// Fails when the process cannot create files inside `repo`.
    ///
    /// The check creates an anonymous temporary file, so nothing is left behind.
    fn check_writable(&self, repo: &Path) -> io::Result<()> {
        tempfile::tempfile_in(repo).map(drop)
    }

    /// Update remote-tracking refs from the configured upstream.
    fn fetch(&self, repo: &Path) -> Result<(), GitError>;

    /// Commit id of the local `HEAD`.
    fn head(&self, repo: &Path) -> Result<String, GitError>;

    /// Commit id of the current branch's upstream.
    fn upstream(&self, repo: &Path) -> Result<String, GitError>;

    /// `true` if `ancestor` is reachable from `descendant` (or equal to it).
    fn is_ancestor(&self, repo: &Path, ancestor: &str, descendant: &str)
        -> Result<bool, GitError>;

    /// `(ahead, behind)`: commits only on `local`, commits only on `upstream`.
    fn ahead_behind(
        &self,
        repo: &Path,
        local: &str,
        upstream: &str,
    ) -> Result<(usize, usize), GitError>;

    /// Commits reachable from `upstream` but not `local`, newest first, at most `limit`.
    fn pending_commits(
        &self,
        repo: &Path,
        local: &str,
        upstream: &str,
        limit: usize,
    ) -> Result<Vec<PendingCommit>, GitError>;

    /// Move the current branch to `target` without creating a merge commit.
    fn fast_forward(&self, repo: &Path, target: &str) -> Result<(), GitError>;
}
