//! `dockhand` application entry point.
//!
//! Runs commands, copies files, or opens a login shell inside a running
//! container through the Docker CLI. It uses `eyre` for opaque error handling
//! at the application boundary, converting domain-specific errors into
//! human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/dockhand/config.toml` or path from `DOCKHAND_CONFIG_PATH`)
//! 3. Environment variables (`DOCKHAND_*`)
//! 4. Command-line arguments
//!
//! Log output goes to stderr and is filtered with `RUST_LOG` (default `info`).

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use dockhand::config::{Cli, Commands, ExecArgs, LoginArgs, TransportConfig, UploadArgs, load_config};
use dockhand::engine::{
    CliRunner, CommandLine, Connection, DaemonEndpoint, LoginCommand, SessionState, Transport,
};
use dockhand::error::{ContainerError, Result as DockhandResult};
use eyre::{Report, Result as EyreResult, eyre};
use mockable::DefaultEnv;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// Installs logging, loads configuration, then dispatches to the subcommand
/// handler.
fn main() -> EyreResult<ExitCode> {
    init_logging()?;

    let cli = Cli::parse();
    let config = load_config(&cli).map_err(Report::from)?;

    run(&cli, &config).map_err(Report::from)
}

fn init_logging() -> EyreResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| eyre!("failed to initialise logging: {e}"))
}

/// Execute the CLI command, returning domain-specific errors.
///
/// Keeps semantic errors inside the run loop so the CLI boundary owns
/// conversion to `eyre::Report`.
fn run(cli: &Cli, config: &TransportConfig) -> DockhandResult<ExitCode> {
    let runtime = Runtime::new().map_err(|e| ContainerError::RuntimeCreationFailed {
        message: e.to_string(),
    })?;
    let env = DefaultEnv::new();
    let transport = Transport::new(config, &env, DaemonEndpoint::new());
    let target = cli.command.target();
    let connection = transport.connection(
        &SessionState::new(&target.container, &target.platform),
        Arc::new(CliRunner::new()),
    )?;

    match &cli.command {
        Commands::Exec(args) => exec_in_container(&runtime, &connection, args),
        Commands::Upload(args) => upload_to_container(&runtime, &connection, args),
        Commands::Login(args) => login_to_container(&runtime, &connection, args),
    }
}

/// Execute a command in a running container.
fn exec_in_container(
    runtime: &Runtime,
    connection: &Connection<CliRunner>,
    args: &ExecArgs,
) -> DockhandResult<ExitCode> {
    let command = args.command.join(" ");
    connection.execute(runtime.handle(), Some(&command))?;
    Ok(ExitCode::SUCCESS)
}

/// Copy local files into a running container.
fn upload_to_container(
    runtime: &Runtime,
    connection: &Connection<CliRunner>,
    args: &UploadArgs,
) -> DockhandResult<ExitCode> {
    connection.upload(runtime.handle(), &args.locals, &args.remote)?;
    Ok(ExitCode::SUCCESS)
}

fn login_line(login: &LoginCommand) -> CommandLine {
    let mut tokens = vec![login.program.clone()];
    tokens.extend(login.arguments.iter().cloned());
    CommandLine::from_tokens(tokens)
}

/// Print or launch the interactive login command.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn login_to_container(
    runtime: &Runtime,
    connection: &Connection<CliRunner>,
    args: &LoginArgs,
) -> DockhandResult<ExitCode> {
    let line = login_line(&connection.login_command());
    if args.print {
        println!("{}", line.shell_line());
        return Ok(ExitCode::SUCCESS);
    }

    let status = runtime
        .block_on(CliRunner::launch_interactive(&line))
        .map_err(|e| ContainerError::ExecFailed {
            container_id: connection.options().container_id.clone(),
            message: format!("failed to launch login shell: {e}"),
        })?;

    Ok(status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .map_or(ExitCode::FAILURE, ExitCode::from))
}
