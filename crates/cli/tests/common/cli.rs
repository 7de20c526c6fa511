//! Helpers for driving the `watchrun` binary
//!
//! `WrCommand` runs to completion for startup/validation checks.
//! `RunningWatch` keeps a live watcher around and collects its output
//! line by line so tests can wait for specific messages.

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

/// CLI command builder
pub struct WrCommand {
    working_dir: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
}

impl WrCommand {
    /// Create a new command in the given working directory
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    pub fn env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_watchrun"));
        command
            .args(&self.args)
            .current_dir(&self.working_dir)
            .envs(&self.env)
            .stdin(Stdio::null());
        command
    }

    /// Run to completion (for commands that exit on their own)
    pub fn execute(&self) -> Result<CommandResult> {
        let output = self.command().output().context("Failed to execute watchrun")?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    /// Execute and assert success
    pub fn assert_success(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if !result.success() {
            anyhow::bail!(
                "Command failed (exit code: {}):\nArgs: {:?}\nStdout: {}\nStderr: {}",
                result.exit_code,
                self.args,
                result.stdout,
                result.stderr
            );
        }

        Ok(result)
    }

    /// Execute and expect failure
    pub fn assert_failure(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if result.success() {
            anyhow::bail!(
                "Command should have failed but succeeded:\nArgs: {:?}\nStdout: {}",
                self.args,
                result.stdout
            );
        }

        Ok(result)
    }

    /// Start a long-running watch and wait until it reports it is watching
    pub fn spawn_watch(&mut self, ready_timeout: Duration) -> Result<RunningWatch> {
        let mut child = self
            .command()
            .env("RUST_LOG", "info")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to spawn watchrun")?;

        let stdout = child.stdout.take().context("No stdout pipe")?;
        let stderr = child.stderr.take().context("No stderr pipe")?;

        let mut running = RunningWatch {
            child,
            stdout: line_channel(stdout),
            stderr: line_channel(stderr),
            stdout_seen: Vec::new(),
        };

        let deadline = Instant::now() + ready_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match running.stderr.recv_timeout(remaining) {
                Ok(line) if line.contains("Watching") => return Ok(running),
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) => anyhow::bail!("watchrun never reported ready"),
                Err(RecvTimeoutError::Disconnected) => {
                    anyhow::bail!("watchrun exited before it was ready")
                }
            }
        }
    }
}

fn line_channel(stream: impl Read + Send + 'static) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in BufReader::new(stream).lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

/// A live `watchrun` process; killed on drop
pub struct RunningWatch {
    child: Child,
    stdout: Receiver<String>,
    stderr: Receiver<String>,
    stdout_seen: Vec<String>,
}

impl RunningWatch {
    /// Wait for a stdout line containing `needle`, calling `poke` between polls
    ///
    /// `poke` lets the test keep producing changes until the watcher reacts.
    pub fn wait_for_stdout(
        &mut self,
        needle: &str,
        timeout: Duration,
        mut poke: impl FnMut(),
    ) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            poke();
            while let Ok(line) = self.stdout.recv_timeout(Duration::from_millis(100)) {
                let found = line.contains(needle);
                self.stdout_seen.push(line);
                if found {
                    return Ok(());
                }
            }
        }
        anyhow::bail!(
            "Timed out waiting for '{}'; stdout so far: {:?}",
            needle,
            self.stdout_seen
        )
    }

    /// Wait until `count` stdout lines (seen so far in total) contain `needle`
    pub fn wait_for_stdout_count(
        &mut self,
        needle: &str,
        count: usize,
        timeout: Duration,
        mut poke: impl FnMut(),
    ) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut seen = self.stdout_seen.iter().filter(|l| l.contains(needle)).count();
        while Instant::now() < deadline {
            if seen >= count {
                return Ok(());
            }
            poke();
            while let Ok(line) = self.stdout.recv_timeout(Duration::from_millis(100)) {
                if line.contains(needle) {
                    seen += 1;
                }
                self.stdout_seen.push(line);
                if seen >= count {
                    return Ok(());
                }
            }
        }
        anyhow::bail!(
            "Timed out waiting for {} x '{}' (saw {}); stdout so far: {:?}",
            count,
            needle,
            seen,
            self.stdout_seen
        )
    }

    /// All stdout lines read so far
    pub fn stdout_lines(&self) -> &[String] {
        &self.stdout_seen
    }
}

impl Drop for RunningWatch {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Command execution result
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    /// Check if command succeeded
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Check if stdout contains text
    pub fn contains_stdout(&self, text: &str) -> bool {
        self.stdout.contains(text)
    }

    /// Check if stderr contains text
    pub fn contains_stderr(&self, text: &str) -> bool {
        self.stderr.contains(text)
    }
}

/// Macro for convenient command construction
///
/// Usage:
/// ```ignore
/// wr!(dir, "--path=/tmp", "--file=a.js").assert_failure()?;
/// ```
#[macro_export]
macro_rules! wr {
    ($dir:expr, $($arg:expr),*) => {{
        let mut cmd = $crate::common::cli::WrCommand::new($dir);
        cmd.args(&[$($arg),*]);
        cmd
    }};
}
