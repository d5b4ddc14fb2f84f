//! Bounded child-process execution.
//!
//! Every invocation gets an explicit working directory; nothing here reads or
//! changes the process's own current directory.
//!
//! The calling thread owns the `Child`; two helper threads own the stdout and
//! stderr pipes and drain them to EOF. The caller polls `try_wait` until the
//! child exits or the deadline passes. On timeout the child is killed and
//! reaped, and the reader threads are joined with a bounded wait, since a
//! descendant (e.g. `ssh` spawned by `git fetch`) may still hold a pipe open.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::error::GitError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const READER_JOIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Captured result of a finished child process.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }
}

/// Run `program args…` inside `dir`, killing it if it outlives `timeout`.
///
/// A non-zero exit is *not* an error here; callers interpret exit codes.
pub fn run_bounded(
    program: &str,
    dir: &Path,
    args: &[&str],
    envs: &[(&str, &str)],
    timeout: Option<Duration>,
) -> Result<CommandOutput, GitError> {
    let command_label = render_command(program, args);
    tracing::debug!(dir = %dir.display(), command = %command_label, "spawning");

    let mut child = Command::new(program)
        .args(args)
        .current_dir(dir)
        .envs(envs.iter().copied())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| GitError::Spawn {
            program: program.to_string(),
            dir: dir.to_path_buf(),
            source,
        })?;

    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);

    let status = match wait_with_deadline(&mut child, timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let after = timeout.unwrap_or_default();
            let _ = child.kill();
            let _ = child.wait();
            drop(child);
            abandon_or_join(stdout_reader);
            abandon_or_join(stderr_reader);
            tracing::warn!(
                dir = %dir.display(),
                command = %command_label,
                after_secs = after.as_secs(),
                "command timed out; killed"
            );
            return Err(GitError::Timeout {
                command: command_label,
                after,
            });
        }
        Err(source) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(GitError::Io {
                command: command_label,
                source,
            });
        }
    };

    let stdout = collect(stdout_reader);
    let stderr = collect(stderr_reader);
    tracing::debug!(command = %command_label, code = ?status.code(), "finished");

    Ok(CommandOutput {
        status,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
}

/// `program arg arg …`, for logs and error messages.
pub fn render_command(program: &str, args: &[&str]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

/// `Ok(None)` means the deadline passed with the child still running.
fn wait_with_deadline(
    child: &mut Child,
    timeout: Option<Duration>,
) -> std::io::Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return child.wait().map(Some);
    };
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

/// Join a reader, giving up after [`READER_JOIN_TIMEOUT`].
fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    let Some(handle) = reader else {
        return Vec::new();
    };
    let deadline = Instant::now() + READER_JOIN_TIMEOUT;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            // A descendant still holds the pipe; the thread ends when it closes.
            return Vec::new();
        }
        std::thread::sleep(POLL_INTERVAL);
    }
    handle.join().unwrap_or_default()
}

fn abandon_or_join(reader: Option<JoinHandle<Vec<u8>>>) {
    let _ = collect(reader);
}
