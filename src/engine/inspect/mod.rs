//! Inspection command execution for verifiers.
//!
//! Verification tools run many small probe commands (file checks, package
//! queries, service state) against the container under test. On Windows
//! containers those probes must go through PowerShell. [`InspectableExecution`]
//! is the capability a verifier depends on; it is implemented by the Windows
//! container variant (through the Docker CLI) and by [`InspectionSession`]
//! (through the Docker API at the shared [`super::DaemonEndpoint`]).

mod session;

use std::future::Future;
use std::pin::Pin;

pub use session::{
    ContainerExecClient, CreateExecFuture, InspectExecFuture, InspectionSession,
    StartExecFuture,
};

use crate::error::DockhandError;

/// Boxed future type returned by [`InspectableExecution::run_inspection`].
pub type InspectionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<InspectionOutput, DockhandError>> + Send + 'a>>;

/// Shell used to interpret inspection commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectionShell {
    /// `sh -c <command>`.
    Posix,
    /// `powershell -Command <command>`.
    PowerShell,
}

impl InspectionShell {
    /// Wrap `command` for this shell as an argv.
    #[must_use]
    pub fn argv(self, command: &str) -> Vec<String> {
        let (program, flag) = match self {
            Self::Posix => ("sh", "-c"),
            Self::PowerShell => ("powershell", "-Command"),
        };
        vec![String::from(program), String::from(flag), String::from(command)]
    }
}

/// Output of an inspection command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionOutput {
    stdout: String,
    stderr: String,
    exit_code: i64,
}

impl InspectionOutput {
    /// Create an inspection result.
    #[must_use]
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, exit_code: i64) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
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

    /// Return the command's exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i64 {
        self.exit_code
    }
}

/// Capability to run verifier probe commands inside a container.
///
/// A non-zero exit code is a normal result, not an error: probes such as
/// `Test-Path` report their answer through it.
pub trait InspectableExecution: Send + Sync {
    /// Run `command` through the container's inspection shell.
    fn run_inspection<'a>(&'a self, command: &'a str) -> InspectionFuture<'a>;
}
