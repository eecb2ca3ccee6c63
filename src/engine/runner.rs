//! Process execution seam for CLI invocations.
//!
//! [`ProcessRunner`] keeps container variants testable without a Docker
//! binary. [`CliRunner`] is the production implementation: it spawns the
//! program directly with [`CommandLine::argv`], so no host shell ever sees
//! the command text and shell metacharacters reach the container intact.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tracing::{debug, info};

use super::CommandLine;

/// Boxed future type returned by [`ProcessRunner::run`].
pub type RunFuture<'a> = Pin<Box<dyn Future<Output = io::Result<ProcessOutput>> + Send + 'a>>;

/// Captured result of a finished CLI process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    status: Option<i32>,
    stdout: String,
    stderr: String,
}

impl ProcessOutput {
    /// Create an output record from an exit code and captured streams.
    #[must_use]
    pub fn new(status: Option<i32>, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a successful output record with the given stdout.
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self::new(Some(0), stdout, "")
    }

    /// Return the exit code, or `None` when the process was killed by a signal.
    #[must_use]
    pub const fn status(&self) -> Option<i32> {
        self.status
    }

    /// Return captured standard output.
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Return captured standard error.
    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Whether the process exited with status zero.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, Some(0))
    }

    /// Describe a failed process for error messages.
    #[must_use]
    pub fn failure_description(&self) -> String {
        let status = self.status.map_or_else(
            || String::from("terminated by signal"),
            |code| format!("exited with status {code}"),
        );
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("command {status}")
        } else {
            format!("command {status}: {stderr}")
        }
    }
}

/// Behaviour required to run a CLI invocation to completion.
pub trait ProcessRunner: Send + Sync {
    /// Run `command`, capturing its output.
    fn run(&self, command: &CommandLine) -> RunFuture<'_>;
}

/// Spawns command lines directly, without a host shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliRunner;

impl CliRunner {
    /// Create a direct-spawn runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Launch `command` with the caller's terminal attached and wait for it.
    ///
    /// Used for interactive login sessions.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` when the program cannot be spawned.
    pub async fn launch_interactive(command: &CommandLine) -> io::Result<ExitStatus> {
        debug!("launching interactive command: {}", command.shell_line());
        process_for(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
    }
}

impl ProcessRunner for CliRunner {
    fn run(&self, command: &CommandLine) -> RunFuture<'_> {
        let mut process = process_for(command);
        process
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        Box::pin(async move {
            let output = process.output().await?;
            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            for line in stdout.lines() {
                info!("{line}");
            }
            Ok(ProcessOutput {
                status: output.status.code(),
                stdout,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }
}

fn process_for(command: &CommandLine) -> Command {
    let mut process = Command::new(command.program());
    process.args(command.argv());
    process
}
