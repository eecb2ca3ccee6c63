//! Windows container variant.
//!
//! Commands are not passed to `docker exec` directly. Each command is written
//! to a PowerShell script on the host, copied into the container's temporary
//! directory, and run with `powershell -File`, so multi-line provisioning
//! scripts reach PowerShell byte for byte.

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use tempfile::NamedTempFile;
use tracing::debug;

use super::environment::expand_remote_path;
use super::{
    ContainerPlatform, ContainerVariant, VariantFuture, copy_into_container, exec_failed, run_exec,
};
use crate::engine::inspect::{InspectableExecution, InspectionFuture, InspectionOutput};
use crate::engine::{
    CommandMode, ConnectionOptions, POWERSHELL_COMMAND, POWERSHELL_FILE, ProcessRunner,
    build_command,
};
use crate::error::{DockhandError, FilesystemError};

const SCRIPT_PREFIX: &str = "docker-";
const SCRIPT_SUFFIX: &str = ".ps1";

/// Runs commands as uploaded PowerShell scripts and copies files with
/// `docker cp`.
#[derive(Debug)]
pub struct WindowsContainer<R> {
    options: Arc<ConnectionOptions>,
    runner: Arc<R>,
}

impl<R: ProcessRunner> WindowsContainer<R> {
    /// Create the variant for a session.
    #[must_use]
    pub const fn new(options: Arc<ConnectionOptions>, runner: Arc<R>) -> Self {
        Self { options, runner }
    }

    /// Container temp directory with Windows separators.
    fn remote_temp_dir(&self) -> String {
        self.options.temp_dir.replace('/', "\\")
    }

    async fn execute_script(&self, command: &str) -> Result<(), DockhandError> {
        debug!(
            "executing command on Windows container (platform: {})",
            self.options.platform
        );
        let script = write_script(command)?;
        let script_path = utf8_path(&script)?;
        let file_name = script_path.file_name().unwrap_or_default().to_owned();

        let remote_dir = expand_remote_path(
            self.runner.as_ref(),
            &self.options,
            ContainerPlatform::Windows,
            &self.remote_temp_dir(),
        )
        .await?;

        debug!("creating directory {remote_dir} on container");
        let create_directory = create_directory_script(&remote_dir);
        run_exec(
            self.runner.as_ref(),
            &self.options,
            CommandMode::Interpreted {
                interpreter: POWERSHELL_COMMAND,
                script: &create_directory,
            },
        )
        .await?;

        debug!("uploading temp script {script_path} to {remote_dir} on container");
        copy_into_container(
            self.runner.as_ref(),
            &self.options,
            &[script_path],
            &remote_dir,
        )
        .await?;
        drop(script);

        let remote_script = format!("{remote_dir}\\{file_name}");
        debug!("executing temp script {remote_script} on container");
        run_exec(
            self.runner.as_ref(),
            &self.options,
            CommandMode::Interpreted {
                interpreter: POWERSHELL_FILE,
                script: &remote_script,
            },
        )
        .await?;
        Ok(())
    }

    async fn inspect(&self, command: &str) -> Result<InspectionOutput, DockhandError> {
        let line = build_command(
            &self.options,
            CommandMode::Interpreted {
                interpreter: POWERSHELL_COMMAND,
                script: command,
            },
        );
        let output = self.runner.run(&line).await.map_err(|error| {
            exec_failed(&self.options, format!("failed to run docker: {error}"))
        })?;
        Ok(InspectionOutput::new(
            output.stdout(),
            output.stderr(),
            output.status().map_or(-1, i64::from),
        ))
    }
}

impl<R: ProcessRunner> ContainerVariant for WindowsContainer<R> {
    fn platform(&self) -> ContainerPlatform {
        ContainerPlatform::Windows
    }

    fn execute<'a>(&'a self, command: &'a str) -> VariantFuture<'a> {
        Box::pin(self.execute_script(command))
    }

    fn upload<'a>(&'a self, locals: &'a [Utf8PathBuf], remote: &'a str) -> VariantFuture<'a> {
        Box::pin(async move {
            let remote_path = expand_remote_path(
                self.runner.as_ref(),
                &self.options,
                ContainerPlatform::Windows,
                remote,
            )
            .await?;
            copy_into_container(self.runner.as_ref(), &self.options, locals, &remote_path).await
        })
    }

    fn inspection(&self) -> Option<&dyn InspectableExecution> {
        Some(self)
    }
}

impl<R: ProcessRunner> InspectableExecution for WindowsContainer<R> {
    fn run_inspection<'a>(&'a self, command: &'a str) -> InspectionFuture<'a> {
        Box::pin(self.inspect(command))
    }
}

fn create_directory_script(path: &str) -> String {
    format!(
        "if(-not (Test-Path \"{path}\")) {{ New-Item -ItemType Directory -Path \"{path}\" -Force }}"
    )
}

fn write_script(command: &str) -> Result<NamedTempFile, DockhandError> {
    let mut script = tempfile::Builder::new()
        .prefix(SCRIPT_PREFIX)
        .suffix(SCRIPT_SUFFIX)
        .tempfile()
        .map_err(|error| script_error(std::env::temp_dir(), &error))?;
    script
        .write_all(command.as_bytes())
        .map_err(|error| script_error(script.path().to_path_buf(), &error))?;
    Ok(script)
}

fn utf8_path(script: &NamedTempFile) -> Result<Utf8PathBuf, DockhandError> {
    Utf8PathBuf::from_path_buf(script.path().to_path_buf()).map_err(|path| {
        DockhandError::from(FilesystemError::IoError {
            path,
            message: String::from("temporary script path is not valid UTF-8"),
        })
    })
}

fn script_error(path: std::path::PathBuf, error: &std::io::Error) -> DockhandError {
    DockhandError::from(FilesystemError::IoError {
        path,
        message: format!("failed to write temporary script: {error}"),
    })
}
