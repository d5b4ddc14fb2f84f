//! `GitCli` against real throwaway repositories: a bare remote plus clones.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use fleetsync_git::{GitCli, GitError, Vcs};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_CONFIG_GLOBAL", "/dev/null")
        .env("GIT_AUTHOR_NAME", "fleet")
        .env("GIT_AUTHOR_EMAIL", "fleet@example.com")
        .env("GIT_COMMITTER_NAME", "fleet")
        .env("GIT_COMMITTER_EMAIL", "fleet@example.com")
        .output()
        .expect("run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn commit(dir: &Path, message: &str) -> String {
    git(dir, &["commit", "--allow-empty", "--quiet", "-m", message]);
    git(dir, &["rev-parse", "HEAD"])
}

/// A bare remote on `main` with one commit, and a clone tracking it.
struct Fleet {
    _root: TempDir,
    remote: PathBuf,
    local: PathBuf,
    peer: PathBuf,
}

impl Fleet {
    fn new() -> Self {
        let root = TempDir::new().expect("tempdir");
        let remote = root.path().join("remote.git");
        let seed = root.path().join("seed");
        git(root.path(), &["init", "--quiet", "--bare", "remote.git"]);
        git(&remote, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        let remote_url = remote.to_string_lossy().into_owned();
        git(root.path(), &["clone", "--quiet", &remote_url, "seed"]);
        git(&seed, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        commit(&seed, "initial");
        git(&seed, &["push", "--quiet", "-u", "origin", "main"]);
        git(root.path(), &["clone", "--quiet", &remote_url, "local"]);
        Self {
            local: root.path().join("local"),
            peer: seed,
            remote,
            _root: root,
        }
    }

    /// Land `n` new commits on the remote from the peer clone.
    fn push_upstream(&self, n: usize) -> Vec<String> {
        let ids = (0..n)
            .map(|i| commit(&self.peer, &format!("upstream {i}")))
            .collect();
        git(&self.peer, &["push", "--quiet", "origin", "main"]);
        ids
    }
}

fn cli() -> GitCli {
    GitCli::new("git").with_timeout(Some(Duration::from_secs(60)))
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[test]
fn head_and_upstream_match_after_clone() {
    let fleet = Fleet::new();
    let git = cli();
    assert!(git.has_metadata(&fleet.local));
    git.fetch(&fleet.local).expect("fetch");
    let head = git.head(&fleet.local).expect("head");
    let upstream = git.upstream(&fleet.local).expect("upstream");
    assert_eq!(head, upstream);
    assert_eq!(head.len(), 40);
}

#[test]
fn fetch_sees_new_upstream_commits() {
    let fleet = Fleet::new();
    let git = cli();
    let pushed = fleet.push_upstream(2);

    git.fetch(&fleet.local).expect("fetch");
    let head = git.head(&fleet.local).expect("head");
    let upstream = git.upstream(&fleet.local).expect("upstream");
    assert_eq!(&upstream, pushed.last().expect("pushed"));
    assert!(git.is_ancestor(&fleet.local, &head, &upstream).expect("ancestry"));
    assert!(!git.is_ancestor(&fleet.local, &upstream, &head).expect("ancestry"));
    assert_eq!(
        git.ahead_behind(&fleet.local, &head, &upstream).expect("counts"),
        (0, 2)
    );
}

#[test]
fn pending_commits_are_newest_first_and_bounded() {
    let fleet = Fleet::new();
    let git = cli();
    fleet.push_upstream(4);
    git.fetch(&fleet.local).expect("fetch");
    let head = git.head(&fleet.local).expect("head");
    let upstream = git.upstream(&fleet.local).expect("upstream");

    let pending = git
        .pending_commits(&fleet.local, &head, &upstream, 3)
        .expect("pending");
    let subjects: Vec<_> = pending.iter().map(|c| c.subject.as_str()).collect();
    assert_eq!(subjects, ["upstream 3", "upstream 2", "upstream 1"]);
}

#[test]
fn fast_forward_moves_head_to_target() {
    let fleet = Fleet::new();
    let git = cli();
    fleet.push_upstream(1);
    git.fetch(&fleet.local).expect("fetch");
    let upstream = git.upstream(&fleet.local).expect("upstream");

    git.fast_forward(&fleet.local, &upstream).expect("fast-forward");
    assert_eq!(git.head(&fleet.local).expect("head"), upstream);
}

#[test]
fn fast_forward_refuses_diverged_history() {
    let fleet = Fleet::new();
    let git = cli();
    fleet.push_upstream(1);
    commit(&fleet.local, "local only");
    git.fetch(&fleet.local).expect("fetch");
    let before = git.head(&fleet.local).expect("head");
    let upstream = git.upstream(&fleet.local).expect("upstream");

    let err = git.fast_forward(&fleet.local, &upstream).unwrap_err();
    assert!(matches!(err, GitError::Failed { .. }), "got: {err}");
    assert_eq!(git.head(&fleet.local).expect("head"), before);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn fetch_from_missing_remote_fails() {
    let fleet = Fleet::new();
    let git = cli();
    git_set_url(&fleet.local, "/nonexistent/fleetsync/remote.git");

    let err = git.fetch(&fleet.local).unwrap_err();
    match err {
        GitError::Failed { stderr, .. } => {
            assert!(!stderr.is_empty(), "diagnostic must survive noise filtering");
            assert!(!stderr.contains("hint:"));
        }
        other => panic!("expected Failed, got {other}"),
    }
}

#[test]
fn upstream_unresolved_without_tracking_branch() {
    let fleet = Fleet::new();
    let git = cli();
    self::git(&fleet.local, &["checkout", "--quiet", "-b", "scratch"]);

    let err = git.upstream(&fleet.local).unwrap_err();
    assert!(matches!(err, GitError::Failed { .. }), "got: {err}");
}

#[test]
fn head_fails_in_unborn_repository() {
    let root = TempDir::new().expect("tempdir");
    git(root.path(), &["init", "--quiet", "empty"]);
    let err = cli().head(&root.path().join("empty")).unwrap_err();
    assert!(matches!(err, GitError::Failed { .. }), "got: {err}");
}

#[test]
fn missing_metadata_detected() {
    let root = TempDir::new().expect("tempdir");
    assert!(!cli().has_metadata(root.path()));
}

#[test]
fn writable_working_copy_passes_and_leaves_no_trace() {
    let fleet = Fleet::new();
    let before: Vec<_> = std::fs::read_dir(&fleet.local)
        .expect("read_dir")
        .map(|e| e.expect("entry").file_name())
        .collect();

    cli().check_writable(&fleet.local).expect("writable");

    let after: Vec<_> = std::fs::read_dir(&fleet.local)
        .expect("read_dir")
        .map(|e| e.expect("entry").file_name())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn non_directory_is_not_writable() {
    let root = TempDir::new().expect("tempdir");
    let file = root.path().join("plain-file");
    std::fs::write(&file, "x").expect("write");
    assert!(cli().check_writable(&file).is_err());
}

#[test]
fn missing_git_program_is_spawn_error() {
    let fleet = Fleet::new();
    let err = GitCli::new("fleetsync-no-such-git")
        .fetch(&fleet.local)
        .unwrap_err();
    assert!(matches!(err, GitError::Spawn { .. }), "got: {err}");
    assert!(fleet.remote.exists());
}

fn git_set_url(repo: &Path, url: &str) {
    git(repo, &["remote", "set-url", "origin", url]);
}
