//! Container command execution over the Docker CLI.
//!
//! The pieces, leaves first:
//!
//! - [`command`](build_command): turns [`ConnectionOptions`] into an ordered
//!   `docker exec` or `docker cp` token list.
//! - [`ProcessRunner`]: runs a token list; [`CliRunner`] is the default.
//! - [`Container`]: the Linux or Windows variant that knows how to execute
//!   commands and upload files for its platform.
//! - [`Connection`]: one session bound to one container.
//! - [`Transport`]: resolves host defaults and opens connections.
//!
//! The daemon endpoint is resolved through a fallback chain:
//!
//! 1. CLI argument (`--socket`)
//! 2. Config file (`socket` in TOML) or `DOCKHAND_SOCKET`
//! 3. `DOCKER_HOST` environment variable
//! 4. Host default (`unix:///var/run/docker.sock`, or the `docker_engine`
//!    named pipe on Windows)

mod command;
mod connection;
mod container;
mod endpoint;
mod inspect;
mod options;
mod runner;
mod transport;

pub use command::{
    CommandLine, CommandMode, POSIX_SHELL, POWERSHELL_COMMAND, POWERSHELL_FILE, build_command,
    build_copy_command,
};
pub use connection::{Connection, LoginCommand};
pub use container::{
    Container, ContainerPlatform, ContainerVariant, LinuxContainer, VariantFuture,
    WindowsContainer,
};
pub use endpoint::{DOCKER_HOST_ENV, DaemonEndpoint, EngineConnector, HostOs, SocketResolver};
pub use inspect::{
    ContainerExecClient, CreateExecFuture, InspectExecFuture, InspectableExecution,
    InspectionFuture, InspectionOutput, InspectionSession, InspectionShell, StartExecFuture,
};
pub use options::ConnectionOptions;
pub use runner::{CliRunner, ProcessOutput, ProcessRunner, RunFuture};
pub use transport::{SessionState, Transport};

/// CLI binary used when none is configured.
pub const DEFAULT_BINARY: &str = "docker";

/// User for exec sessions launched from non-Windows hosts.
pub const DEFAULT_USERNAME: &str = "kitchen";

/// Container scratch directory on non-Windows hosts.
pub const UNIX_TEMP_DIR: &str = "/tmp";

/// Container scratch directory on Windows hosts.
pub const WINDOWS_TEMP_DIR: &str = "$env:TEMP";
