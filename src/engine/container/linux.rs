//! Linux container variant.

use std::sync::Arc;

use camino::Utf8PathBuf;
use tracing::debug;

use super::environment::expand_remote_path;
use super::{ContainerPlatform, ContainerVariant, VariantFuture, copy_into_container, run_exec};
use crate::engine::{CommandMode, ConnectionOptions, POSIX_SHELL, ProcessRunner};

/// Runs commands through `sh -c` inside the container with `docker exec` and
/// copies files with `docker cp`.
#[derive(Debug)]
pub struct LinuxContainer<R> {
    options: Arc<ConnectionOptions>,
    runner: Arc<R>,
}

impl<R: ProcessRunner> LinuxContainer<R> {
    /// Create the variant for a session.
    #[must_use]
    pub const fn new(options: Arc<ConnectionOptions>, runner: Arc<R>) -> Self {
        Self { options, runner }
    }
}

impl<R: ProcessRunner> ContainerVariant for LinuxContainer<R> {
    fn platform(&self) -> ContainerPlatform {
        ContainerPlatform::Linux
    }

    fn execute<'a>(&'a self, command: &'a str) -> VariantFuture<'a> {
        Box::pin(async move {
            debug!(
                "executing command on Linux container (platform: {})",
                self.options.platform
            );
            run_exec(
                self.runner.as_ref(),
                &self.options,
                CommandMode::Interpreted {
                    interpreter: POSIX_SHELL,
                    script: command,
                },
            )
            .await?;
            Ok(())
        })
    }

    fn upload<'a>(&'a self, locals: &'a [Utf8PathBuf], remote: &'a str) -> VariantFuture<'a> {
        Box::pin(async move {
            let remote_path = expand_remote_path(
                self.runner.as_ref(),
                &self.options,
                ContainerPlatform::Linux,
                remote,
            )
            .await?;
            copy_into_container(self.runner.as_ref(), &self.options, locals, &remote_path).await
        })
    }
}
