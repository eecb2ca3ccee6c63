//! Docker API backed inspection sessions.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bollard::Docker;
use bollard::container::LogOutput;
use bollard::errors::Error as BollardError;
use bollard::exec::{CreateExecOptions, CreateExecResults, StartExecOptions, StartExecResults};
use bollard::models::ExecInspectResponse;
use futures_util::StreamExt;
use tokio::time::sleep;
use tracing::debug;

use super::{InspectableExecution, InspectionFuture, InspectionOutput, InspectionShell};
use crate::engine::{ContainerPlatform, DaemonEndpoint, EngineConnector};
use crate::error::{ContainerError, DockhandError};

const EXEC_INSPECT_POLL_INTERVAL_MS: u64 = 100;

/// Boxed future type returned by [`ContainerExecClient::create_exec`].
pub type CreateExecFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CreateExecResults, BollardError>> + Send + 'a>>;

/// Boxed future type returned by [`ContainerExecClient::start_exec`].
pub type StartExecFuture<'a> =
    Pin<Box<dyn Future<Output = Result<StartExecResults, BollardError>> + Send + 'a>>;

/// Boxed future type returned by [`ContainerExecClient::inspect_exec`].
pub type InspectExecFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ExecInspectResponse, BollardError>> + Send + 'a>>;

/// Behaviour required to run and inspect exec sessions.
///
/// This abstraction keeps inspection testable without a live daemon.
pub trait ContainerExecClient: Send + Sync {
    /// Create an exec session in a running container.
    fn create_exec(
        &self,
        container_id: &str,
        options: CreateExecOptions<String>,
    ) -> CreateExecFuture<'_>;

    /// Start a previously created exec session.
    fn start_exec(&self, exec_id: &str, options: Option<StartExecOptions>) -> StartExecFuture<'_>;

    /// Inspect an exec session for running status and exit code.
    fn inspect_exec(&self, exec_id: &str) -> InspectExecFuture<'_>;
}

impl ContainerExecClient for Docker {
    fn create_exec(
        &self,
        container_id: &str,
        options: CreateExecOptions<String>,
    ) -> CreateExecFuture<'_> {
        let container_id_owned = String::from(container_id);
        Box::pin(async move { Self::create_exec(self, &container_id_owned, options).await })
    }

    fn start_exec(&self, exec_id: &str, options: Option<StartExecOptions>) -> StartExecFuture<'_> {
        let exec_id_owned = String::from(exec_id);
        Box::pin(async move { Self::start_exec(self, &exec_id_owned, options).await })
    }

    fn inspect_exec(&self, exec_id: &str) -> InspectExecFuture<'_> {
        let exec_id_owned = String::from(exec_id);
        Box::pin(async move { Self::inspect_exec(self, &exec_id_owned).await })
    }
}

/// Runs inspection commands through the Docker exec API.
///
/// A verifier builds one session per container from the shared
/// [`DaemonEndpoint`], so it talks to the same daemon as the transport.
#[derive(Debug)]
pub struct InspectionSession<C> {
    client: C,
    container_id: String,
    shell: InspectionShell,
}

impl InspectionSession<Docker> {
    /// Connect to the published endpoint and bind to `container_id`.
    ///
    /// The shell is chosen from `platform` with the same rule the connection
    /// uses to pick a container variant.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::ConnectionFailed` when no endpoint has been
    /// published or the client cannot be created.
    pub fn connect(
        endpoint: &DaemonEndpoint,
        container_id: impl Into<String>,
        platform: &str,
    ) -> Result<Self, DockhandError> {
        let client = EngineConnector::connect_endpoint(endpoint)?;
        let shell = if ContainerPlatform::from_platform_name(platform).is_windows() {
            InspectionShell::PowerShell
        } else {
            InspectionShell::Posix
        };
        Ok(Self::new(client, container_id, shell))
    }
}

impl<C: ContainerExecClient> InspectionSession<C> {
    /// Create a session over an existing exec client.
    #[must_use]
    pub fn new(client: C, container_id: impl Into<String>, shell: InspectionShell) -> Self {
        Self {
            client,
            container_id: container_id.into(),
            shell,
        }
    }

    /// Return the shell commands are wrapped in.
    #[must_use]
    pub const fn shell(&self) -> InspectionShell {
        self.shell
    }

    /// Run `command` and collect its output and exit code.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::ExecFailed` when any exec API call fails or the
    /// daemon does not report an exit code.
    pub async fn run_async(&self, command: &str) -> Result<InspectionOutput, DockhandError> {
        debug!("inspection command on {}: {command}", self.container_id);
        let created = self
            .client
            .create_exec(&self.container_id, self.create_options(command))
            .await
            .map_err(|error| self.exec_failed(format!("create exec failed: {error}")))?;

        let started = self
            .client
            .start_exec(
                &created.id,
                Some(StartExecOptions {
                    detach: false,
                    tty: false,
                    output_capacity: None,
                }),
            )
            .await
            .map_err(|error| self.exec_failed(format!("start exec failed: {error}")))?;

        let StartExecResults::Attached { mut output, .. } = started else {
            return Err(self.exec_failed("daemon returned detached start result"));
        };

        let mut stdout = String::new();
        let mut stderr = String::new();
        while let Some(chunk_result) = output.next().await {
            let chunk = chunk_result
                .map_err(|error| self.exec_failed(format!("exec stream failed: {error}")))?;
            match chunk {
                LogOutput::StdErr { message } => {
                    stderr.push_str(&String::from_utf8_lossy(&message));
                }
                LogOutput::StdOut { message }
                | LogOutput::Console { message }
                | LogOutput::StdIn { message } => {
                    stdout.push_str(&String::from_utf8_lossy(&message));
                }
            }
        }

        let exit_code = self.wait_for_exit_code(&created.id).await?;
        Ok(InspectionOutput::new(stdout, stderr, exit_code))
    }

    fn create_options(&self, command: &str) -> CreateExecOptions<String> {
        CreateExecOptions::<String> {
            attach_stdin: Some(false),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            tty: Some(false),
            cmd: Some(self.shell.argv(command)),
            ..CreateExecOptions::default()
        }
    }

    async fn wait_for_exit_code(&self, exec_id: &str) -> Result<i64, DockhandError> {
        loop {
            let inspect = self
                .client
                .inspect_exec(exec_id)
                .await
                .map_err(|error| self.exec_failed(format!("inspect exec failed: {error}")))?;

            if inspect.running.unwrap_or(false) {
                sleep(Duration::from_millis(EXEC_INSPECT_POLL_INTERVAL_MS)).await;
                continue;
            }

            return inspect.exit_code.ok_or_else(|| {
                self.exec_failed(format!(
                    "exec session '{exec_id}' completed without an exit code"
                ))
            });
        }
    }

    fn exec_failed(&self, message: impl Into<String>) -> DockhandError {
        DockhandError::from(ContainerError::ExecFailed {
            container_id: self.container_id.clone(),
            message: message.into(),
        })
    }
}

impl<C: ContainerExecClient> InspectableExecution for InspectionSession<C> {
    fn run_inspection<'a>(&'a self, command: &'a str) -> InspectionFuture<'a> {
        Box::pin(self.run_async(command))
    }
}
