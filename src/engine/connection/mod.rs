//! Per-session connection to one container.
//!
//! A [`Connection`] owns a read-only [`ConnectionOptions`] snapshot and the
//! container variant chosen for it. The variant is decided on first use and
//! kept for the lifetime of the connection.

use std::sync::{Arc, OnceLock};

use camino::Utf8PathBuf;
use tracing::{debug, info};

use super::container::{Container, ContainerPlatform, ContainerVariant};
use super::inspect::InspectableExecution;
use super::{CommandMode, ConnectionOptions, ProcessRunner, build_command};
use crate::error::{DockhandError, TransportError};

/// An interactive login invocation ready for a terminal-attached launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCommand {
    /// Executable to launch.
    pub program: String,
    /// Ordered arguments following the program.
    pub arguments: Vec<String>,
}

impl LoginCommand {
    fn from_tokens(tokens: Vec<String>) -> Self {
        let mut parts = tokens.into_iter();
        let program = parts.next().unwrap_or_default();
        Self {
            program,
            arguments: parts.collect(),
        }
    }
}

/// A session bound to one container.
#[derive(Debug)]
pub struct Connection<R> {
    options: Arc<ConnectionOptions>,
    runner: Arc<R>,
    container: OnceLock<Container<R>>,
}

impl<R: ProcessRunner> Connection<R> {
    /// Create a connection over `options`, running CLI invocations with
    /// `runner`.
    #[must_use]
    pub fn new(options: ConnectionOptions, runner: Arc<R>) -> Self {
        Self {
            options: Arc::new(options),
            runner,
            container: OnceLock::new(),
        }
    }

    /// Options this connection was opened with.
    #[must_use]
    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    /// The container variant, selecting it on first call.
    pub fn container(&self) -> &Container<R> {
        self.container.get_or_init(|| {
            let container = Container::for_options(Arc::clone(&self.options), Arc::clone(&self.runner));
            debug!(
                "selected {:?} container variant for platform {}",
                container.platform(),
                self.options.platform
            );
            container
        })
    }

    /// Platform of the selected variant, or `None` before first use.
    #[must_use]
    pub fn selected_platform(&self) -> Option<ContainerPlatform> {
        self.container.get().map(ContainerVariant::platform)
    }

    /// Inspection capability of the selected variant, if it has one.
    pub fn inspection(&self) -> Option<&dyn InspectableExecution> {
        self.container().inspection()
    }

    /// Execute `command` in the container.
    ///
    /// `None` and the empty string are accepted and do nothing.
    ///
    /// # Errors
    ///
    /// Any failure is reported as [`TransportError::Failed`].
    pub async fn execute_async(&self, command: Option<&str>) -> Result<(), DockhandError> {
        let Some(command) = command.filter(|text| !text.is_empty()) else {
            return Ok(());
        };

        info!("[Docker] Executing command on container");
        debug!("command: {command}");
        self.container().execute(command).await.map_err(|error| {
            DockhandError::from(TransportError::Failed {
                details: error.to_string(),
            })
        })
    }

    /// Blocking form of [`Self::execute_async`].
    ///
    /// # Errors
    ///
    /// Any failure is reported as [`TransportError::Failed`].
    pub fn execute(
        &self,
        runtime: &tokio::runtime::Handle,
        command: Option<&str>,
    ) -> Result<(), DockhandError> {
        runtime.block_on(self.execute_async(command))
    }

    /// Copy `locals` into the container at `remote`.
    ///
    /// # Errors
    ///
    /// Returns the variant's error unchanged.
    pub async fn upload_async(
        &self,
        locals: &[Utf8PathBuf],
        remote: &str,
    ) -> Result<(), DockhandError> {
        self.container().upload(locals, remote).await
    }

    /// Blocking form of [`Self::upload_async`].
    ///
    /// # Errors
    ///
    /// Returns the variant's error unchanged.
    pub fn upload(
        &self,
        runtime: &tokio::runtime::Handle,
        locals: &[Utf8PathBuf],
        remote: &str,
    ) -> Result<(), DockhandError> {
        runtime.block_on(self.upload_async(locals, remote))
    }

    /// Build the interactive login invocation for this container.
    ///
    /// Stored options are not modified.
    #[must_use]
    pub fn login_command(&self) -> LoginCommand {
        let login_options = self.options.for_login();
        LoginCommand::from_tokens(build_command(&login_options, CommandMode::Login).into_tokens())
    }
}
