//! [`Vcs`] backed by the `git` command-line tool.

use std::path::Path;
use std::time::Duration;

use fleetsync_core::{PendingCommit, SyncConfig};

use crate::error::GitError;
use crate::noise::{condense, filter_noise};
use crate::runner::{render_command, run_bounded, CommandOutput};
use crate::vcs::Vcs;

/// Environment for every git child: stable English messages, and no
/// interactive credential prompt that would block an unattended run.
const GIT_ENV: &[(&str, &str)] = &[("LC_ALL", "C"), ("GIT_TERMINAL_PROMPT", "0")];

/// Tab-separated short id and subject, one commit per line.
const PENDING_FORMAT: &str = "--format=%h%x09%s";

#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    timeout: Option<Duration>,
    noise_prefixes: Vec<String>,
}

impl GitCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
            noise_prefixes: Vec::new(),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            program: config.git_program.clone(),
            timeout: config.timeout(),
            noise_prefixes: config.noise_prefixes.clone(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn exec(&self, repo: &Path, args: &[&str]) -> Result<CommandOutput, GitError> {
        run_bounded(&self.program, repo, args, GIT_ENV, self.timeout)
    }

    /// Run and require exit code 0; returns trimmed stdout.
    fn run(&self, repo: &Path, args: &[&str]) -> Result<String, GitError> {
        let output = self.exec(repo, args)?;
        if output.success() {
            return Ok(output.stdout.trim().to_string());
        }
        Err(self.failure(args, &output))
    }

    fn failure(&self, args: &[&str], output: &CommandOutput) -> GitError {
        GitError::Failed {
            command: render_command(&self.program, args),
            code: output.code(),
            stderr: condense(&filter_noise(&output.stderr, &self.noise_prefixes)),
        }
    }

    fn resolve(&self, repo: &Path, rev: &str) -> Result<String, GitError> {
        let spec = format!("{rev}^{{commit}}");
        self.run(repo, &["rev-parse", "--verify", &spec])
    }
}

impl Vcs for GitCli {
    fn fetch(&self, repo: &Path) -> Result<(), GitError> {
        self.run(repo, &["fetch", "--quiet"]).map(|_| ())
    }

    fn head(&self, repo: &Path) -> Result<String, GitError> {
        self.resolve(repo, "HEAD")
    }

    fn upstream(&self, repo: &Path) -> Result<String, GitError> {
        self.resolve(repo, "@{upstream}")
    }

    fn is_ancestor(
        &self,
        repo: &Path,
        ancestor: &str,
        descendant: &str,
    ) -> Result<bool, GitError> {
        let args = ["merge-base", "--is-ancestor", ancestor, descendant];
        let output = self.exec(repo, &args)?;
        match output.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(self.failure(&args, &output)),
        }
    }

    fn ahead_behind(
        &self,
        repo: &Path,
        local: &str,
        upstream: &str,
    ) -> Result<(usize, usize), GitError> {
        let range = format!("{local}...{upstream}");
        let args = ["rev-list", "--left-right", "--count", range.as_str()];
        let out = self.run(repo, &args)?;
        parse_left_right(&out).ok_or_else(|| GitError::Parse {
            command: render_command(&self.program, &args),
            output: out,
        })
    }

    fn pending_commits(
        &self,
        repo: &Path,
        local: &str,
        upstream: &str,
        limit: usize,
    ) -> Result<Vec<PendingCommit>, GitError> {
        let max = format!("--max-count={limit}");
        let range = format!("{local}..{upstream}");
        let out = self.run(repo, &["log", PENDING_FORMAT, &max, &range])?;
        Ok(parse_pending(&out))
    }

    fn fast_forward(&self, repo: &Path, target: &str) -> Result<(), GitError> {
        self.run(repo, &["merge", "--ff-only", "--quiet", target])
            .map(|_| ())
    }
}

/// `"3\t1"` → `(3, 1)`.
fn parse_left_right(out: &str) -> Option<(usize, usize)> {
    let mut parts = out.split_whitespace();
    let left = parts.next()?.parse().ok()?;
    let right = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((left, right))
}

fn parse_pending(out: &str) -> Vec<PendingCommit> {
    out.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once('\t') {
            Some((id, subject)) => PendingCommit {
                short_id: id.to_string(),
                subject: subject.to_string(),
            },
            None => PendingCommit {
                short_id: line.to_string(),
                subject: String::new(),
            },
        })
        .collect()
}
