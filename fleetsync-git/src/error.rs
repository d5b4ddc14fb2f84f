//! Error types for fleetsync-git.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// All errors that can arise from invoking the version-control tool.
#[derive(Debug, Error)]
pub enum GitError {
    /// The program could not be started at all (not installed, not executable).
    #[error("failed to start '{program}' in {dir}: {source}")]
    Spawn {
        program: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The command exceeded its time bound and was killed.
    #[error("'{command}' timed out after {}s", .after.as_secs())]
    Timeout { command: String, after: Duration },

    /// The command ran and exited unsuccessfully. `stderr` is already noise-filtered.
    #[error("'{command}' failed ({}): {stderr}", exit_label(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The command succeeded but printed something we could not interpret.
    #[error("unexpected output from '{command}': {output:?}")]
    Parse { command: String, output: String },

    /// Reading the child's output pipes failed.
    #[error("I/O error while running '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl GitError {
    /// A one-line operator-facing diagnostic, without the command echo.
    pub fn diagnostic(&self) -> String {
        match self {
            GitError::Spawn { program, source, .. } => format!("cannot run {program}: {source}"),
            GitError::Timeout { after, .. } => format!("timed out after {}s", after.as_secs()),
            GitError::Failed { stderr, code, .. } if stderr.is_empty() => exit_label(code),
            GitError::Failed { stderr, .. } => stderr.clone(),
            GitError::Parse { output, .. } => format!("unexpected output {output:?}"),
            GitError::Io { source, .. } => source.to_string(),
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "killed by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_message_includes_command_and_code() {
        let err = GitError::Failed {
            command: "git fetch --quiet".to_string(),
            code: Some(128),
            stderr: "fatal: bad remote".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'git fetch --quiet' failed (exit code 128): fatal: bad remote"
        );
        assert_eq!(err.diagnostic(), "fatal: bad remote");
    }

    #[test]
    fn diagnostic_falls_back_to_exit_code() {
        let err = GitError::Failed {
            command: "git merge --ff-only".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert_eq!(err.diagnostic(), "killed by signal");
    }

    #[test]
    fn timeout_message() {
        let err = GitError::Timeout {
            command: "git fetch".to_string(),
            after: Duration::from_secs(30),
        };
        assert_eq!(err.diagnostic(), "timed out after 30s");
        assert!(err.to_string().contains("'git fetch' timed out"));
    }
}
