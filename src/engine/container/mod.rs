//! Platform-specific container variants.
//!
//! A [`Container`] is selected once per connection from the target platform
//! name and then owns all knowledge of how to execute commands and copy files
//! into that kind of container. Both variants drive the Docker CLI through a
//! [`ProcessRunner`].

mod environment;
mod linux;
mod windows;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use camino::Utf8PathBuf;
use tracing::debug;

pub use linux::LinuxContainer;
pub use windows::WindowsContainer;

use super::inspect::InspectableExecution;
use super::{
    CommandMode, ConnectionOptions, ProcessOutput, ProcessRunner, build_command,
    build_copy_command,
};
use crate::error::{ContainerError, DockhandError};

/// Substring of a platform name that selects the Windows variant.
const WINDOWS_MARKER: &str = "windows";

/// Boxed future type returned by [`ContainerVariant`] operations.
pub type VariantFuture<'a> = Pin<Box<dyn Future<Output = Result<(), DockhandError>> + Send + 'a>>;

/// Container operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerPlatform {
    /// Linux containers.
    Linux,
    /// Windows containers.
    Windows,
}

impl ContainerPlatform {
    /// Classify a platform name.
    ///
    /// Any name containing `windows` (case-sensitive) is Windows; everything
    /// else is Linux.
    #[must_use]
    pub fn from_platform_name(name: &str) -> Self {
        if name.contains(WINDOWS_MARKER) {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    /// Whether this is the Windows family.
    #[must_use]
    pub const fn is_windows(self) -> bool {
        matches!(self, Self::Windows)
    }
}

/// Operations every container variant provides.
pub trait ContainerVariant: Send + Sync {
    /// Platform family this variant targets.
    fn platform(&self) -> ContainerPlatform;

    /// Execute `command` inside the container.
    fn execute<'a>(&'a self, command: &'a str) -> VariantFuture<'a>;

    /// Copy each of `locals` into the container at `remote`.
    fn upload<'a>(&'a self, locals: &'a [Utf8PathBuf], remote: &'a str) -> VariantFuture<'a>;

    /// Inspection capability for verifiers, when the variant provides one.
    fn inspection(&self) -> Option<&dyn InspectableExecution> {
        None
    }
}

/// The variant chosen for one connection.
#[derive(Debug)]
pub enum Container<R> {
    /// Linux container variant.
    Linux(LinuxContainer<R>),
    /// Windows container variant.
    Windows(WindowsContainer<R>),
}

impl<R: ProcessRunner> Container<R> {
    /// Select the variant for `options.platform`.
    #[must_use]
    pub fn for_options(options: Arc<ConnectionOptions>, runner: Arc<R>) -> Self {
        match ContainerPlatform::from_platform_name(&options.platform) {
            ContainerPlatform::Windows => Self::Windows(WindowsContainer::new(options, runner)),
            ContainerPlatform::Linux => Self::Linux(LinuxContainer::new(options, runner)),
        }
    }

    fn variant(&self) -> &dyn ContainerVariant {
        match self {
            Self::Linux(linux) => linux,
            Self::Windows(windows) => windows,
        }
    }
}

impl<R: ProcessRunner> ContainerVariant for Container<R> {
    fn platform(&self) -> ContainerPlatform {
        self.variant().platform()
    }

    fn execute<'a>(&'a self, command: &'a str) -> VariantFuture<'a> {
        self.variant().execute(command)
    }

    fn upload<'a>(&'a self, locals: &'a [Utf8PathBuf], remote: &'a str) -> VariantFuture<'a> {
        self.variant().upload(locals, remote)
    }

    fn inspection(&self) -> Option<&dyn InspectableExecution> {
        self.variant().inspection()
    }
}

/// Run `mode` through `docker exec`, failing on a non-zero exit.
async fn run_exec<R: ProcessRunner>(
    runner: &R,
    options: &ConnectionOptions,
    mode: CommandMode<'_>,
) -> Result<ProcessOutput, DockhandError> {
    let line = build_command(options, mode);
    let output = runner
        .run(&line)
        .await
        .map_err(|error| exec_failed(options, format!("failed to run docker: {error}")))?;

    if output.is_success() {
        Ok(output)
    } else {
        Err(exec_failed(options, output.failure_description()))
    }
}

/// Copy each local path to `remote` with `docker cp`.
async fn copy_into_container<R: ProcessRunner>(
    runner: &R,
    options: &ConnectionOptions,
    locals: &[Utf8PathBuf],
    remote: &str,
) -> Result<(), DockhandError> {
    for local in locals {
        debug!("copying {local} to {remote} on container");
        let line = build_copy_command(options, local.as_str(), remote);
        let output = runner.run(&line).await.map_err(|error| {
            upload_failed(options, format!("failed to run docker: {error}"))
        })?;

        if !output.is_success() {
            return Err(upload_failed(
                options,
                format!("copying {local}: {}", output.failure_description()),
            ));
        }
    }

    Ok(())
}

fn exec_failed(options: &ConnectionOptions, message: impl Into<String>) -> DockhandError {
    DockhandError::from(ContainerError::ExecFailed {
        container_id: options.container_id.clone(),
        message: message.into(),
    })
}

fn upload_failed(options: &ConnectionOptions, message: impl Into<String>) -> DockhandError {
    DockhandError::from(ContainerError::UploadFailed {
        container_id: options.container_id.clone(),
        message: message.into(),
    })
}
