//! Subprocess execution with timeout support.
//!
//! Sensor commands run on the fetch worker, never on the UI thread, but a
//! hung command must still not stall the refresh loop forever. Children are
//! started in their own process group so that a timeout kills the whole
//! shell pipeline, not only `sh`.

use std::io::Read;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled for completion
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Result of a subprocess execution with timeout.
#[derive(Debug)]
pub enum CommandOutcome {
    /// Command exited with status 0; captured stdout
    Success(String),
    /// Command exited with a non-zero status
    Failed { status: ExitStatus, stdout: String },
    /// Command timed out and was killed
    Timeout,
    /// Command failed to spawn
    SpawnError(String),
}

impl CommandOutcome {
    /// Returns stdout if the command succeeded.
    #[must_use]
    pub fn success_stdout(&self) -> Option<&str> {
        match self {
            Self::Success(stdout) => Some(stdout),
            _ => None,
        }
    }

    /// Returns true if command completed successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true if command timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

/// Run a command line through `sh -c` with a timeout.
pub fn run_shell(command_line: &str, timeout: Duration) -> CommandOutcome {
    let mut command = Command::new("sh");
    command.arg("-c").arg(command_line);
    run_with_timeout(command, timeout)
}

/// Run a program with arguments (no shell) with a timeout.
pub fn run_program(program: &str, args: &[&str], timeout: Duration) -> CommandOutcome {
    let mut command = Command::new(program);
    command.args(args);
    run_with_timeout(command, timeout)
}

fn run_with_timeout(mut command: Command, timeout: Duration) -> CommandOutcome {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .process_group(0);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => return CommandOutcome::SpawnError(e.to_string()),
    };

    // Drain stdout on a helper thread so a chatty child can't fill the pipe
    // and block while we wait on it.
    let reader = child.stdout.take().map(|mut stdout| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stdout.read_to_end(&mut buf);
            buf
        })
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                kill_group(&mut child);
                // The reader thread finishes once the group is gone; don't wait on it.
                return CommandOutcome::Timeout;
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                kill_group(&mut child);
                return CommandOutcome::SpawnError(e.to_string());
            }
        }
    };

    let stdout = reader
        .and_then(|handle| handle.join().ok())
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default();

    if status.success() {
        CommandOutcome::Success(stdout)
    } else {
        CommandOutcome::Failed { status, stdout }
    }
}

fn kill_group(child: &mut Child) {
    // The child leads its own group (process_group(0)), so -pid targets the group.
    let pgid = child.id() as libc::pid_t;
    // SAFETY: kill(2) has no memory-safety preconditions.
    unsafe {
        libc::kill(-pgid, libc::SIGKILL);
    }
    let _ = child.kill();
    let _ = child.wait();
}
