//! Shell command execution
//!
//! Each matched change spawns the command as an independent task. Nothing
//! waits on it: runs may overlap, and their output interleaves line by line.

use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};
use watchrun_core::{Console, Dispatch};

/// Command failures; always printed, never fatal
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' failed: {status}")]
    Exit { command: String, status: ExitStatus },
}

/// Captured result of a finished command
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Run `command` through the platform shell and capture its output
pub async fn run_shell(command: &str) -> Result<CommandOutput, CommandError> {
    let output = shell(command)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| CommandError::Spawn {
            command: command.to_string(),
            source,
        })?;

    Ok(CommandOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// Print a finished command's outcome
///
/// Failures and stderr are printed even when silenced; stdout is not.
pub fn report(console: &Console, command: &str, result: Result<CommandOutput, CommandError>) {
    let output = match result {
        Ok(output) => output,
        Err(e) => {
            warn!("{}", e);
            console.alert(&e.to_string());
            return;
        }
    };

    debug!(command, status = %output.status, "Command finished");

    if !output.status.success() {
        let err = CommandError::Exit {
            command: command.to_string(),
            status: output.status,
        };
        console.alert(&err.to_string());
    }

    if !output.stderr.is_empty() {
        console.alert(&output.stderr);
    }

    if !output.stdout.is_empty() {
        console.say(&output.stdout);
    }
}

/// Fire-and-forget dispatcher backed by `tokio::spawn`
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct ShellDispatcher {
    console: Console,
}

impl ShellDispatcher {
    pub fn new(console: Console) -> Self {
        Self { console }
    }
}

impl Dispatch for ShellDispatcher {
    fn dispatch(&self, command: &str) {
        let console = self.console.clone();
        let command = command.to_string();

        tokio::spawn(async move {
            let result = run_shell(&command).await;
            report(&console, &command, result);
        });
    }
}
