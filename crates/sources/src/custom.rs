//! User-defined sensors backed by shell commands

use std::time::Duration;
use sysmon_core::{run_shell, CommandOutcome, CUSTOM_COMMAND_TIMEOUT, EXEC_ERROR, NO_OUTPUT};

/// Run a custom sensor command and turn its outcome into display text.
///
/// Standard output is trimmed and decoded as UTF-8 (lossily). Empty output
/// becomes "(no output)"; a command that cannot be started, exits non-zero or
/// times out becomes "Error". This never fails.
pub fn run_custom_command(command: &str) -> String {
    run_custom_command_with_timeout(command, CUSTOM_COMMAND_TIMEOUT)
}

pub fn run_custom_command_with_timeout(command: &str, timeout: Duration) -> String {
    match run_shell(command, timeout) {
        CommandOutcome::Success(stdout) => {
            let trimmed = stdout.trim();
            if trimmed.is_empty() {
                NO_OUTPUT.to_string()
            } else {
                trimmed.to_string()
            }
        }
        CommandOutcome::Failed { status, .. } => {
            log::warn!("Command '{}' exited with {}", command, status);
            EXEC_ERROR.to_string()
        }
        CommandOutcome::Timeout => {
            log::warn!("Command '{}' timed out after {:?}", command, timeout);
            EXEC_ERROR.to_string()
        }
        CommandOutcome::SpawnError(e) => {
            log::error!("Error running: {} ({})", command, e);
            EXEC_ERROR.to_string()
        }
    }
}
