//! Command-line argument definitions for dockhand.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Command-line interface for dockhand.
#[derive(Debug, Parser)]
#[command(name = "dockhand")]
#[command(
    author,
    version,
    about = "Run commands and copy files inside running Docker containers"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Daemon endpoint URL.
    #[arg(long, global = true)]
    pub socket: Option<String>,

    /// Docker CLI executable name or path.
    #[arg(long, global = true)]
    pub binary: Option<String>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Execute a command in a running container.
    Exec(ExecArgs),

    /// Copy local files into a running container.
    Upload(UploadArgs),

    /// Open an interactive shell in a running container.
    Login(LoginArgs),
}

impl Commands {
    /// Container targeted by this subcommand.
    #[must_use]
    pub const fn target(&self) -> &TargetArgs {
        match self {
            Self::Exec(args) => &args.target,
            Self::Upload(args) => &args.target,
            Self::Login(args) => &args.target,
        }
    }
}

/// Container selection shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Container ID or name.
    #[arg(long, required = true)]
    pub container: String,

    /// Platform name of the container image, for example `windows-2022`.
    #[arg(long, default_value = "linux")]
    pub platform: String,
}

/// Arguments for the `exec` subcommand.
#[derive(Debug, Args)]
pub struct ExecArgs {
    /// Target container.
    #[command(flatten)]
    pub target: TargetArgs,

    /// Command to execute, passed to the container as one string.
    #[arg(trailing_var_arg = true)]
    pub command: Vec<String>,
}

/// Arguments for the `upload` subcommand.
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Target container.
    #[command(flatten)]
    pub target: TargetArgs,

    /// Destination path inside the container.
    #[arg(long, required = true)]
    pub remote: String,

    /// Local files or directories to copy.
    #[arg(required = true)]
    pub locals: Vec<Utf8PathBuf>,
}

/// Arguments for the `login` subcommand.
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Target container.
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print the login command instead of launching it.
    #[arg(long)]
    pub print: bool,
}
