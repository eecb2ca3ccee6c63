//! Given/When steps for connection scenarios.

use std::sync::{Arc, Mutex};

use dockhand::engine::{
    CommandLine, Connection, ConnectionOptions, ProcessOutput, ProcessRunner, RunFuture,
};
use rstest_bdd_macros::{given, when};

use super::state::{ConnectionState, ExecutionOutcome};

pub type StepResult<T> = Result<T, String>;

/// Records every invocation and answers with a fixed exit code.
struct RecordingRunner {
    exit_code: i32,
    commands: Mutex<Vec<Vec<String>>>,
}

impl RecordingRunner {
    fn recorded(&self) -> Vec<Vec<String>> {
        self.commands
            .lock()
            .map(|commands| commands.clone())
            .unwrap_or_default()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, command: &CommandLine) -> RunFuture<'_> {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command.tokens().to_vec());
        }
        let output = ProcessOutput::new(Some(self.exit_code), "", "simulated failure");
        Box::pin(async move { Ok(output) })
    }
}

fn open_connection(
    state: &ConnectionState,
) -> StepResult<(Connection<RecordingRunner>, Arc<RecordingRunner>)> {
    let container_id = state
        .container_id
        .get()
        .ok_or_else(|| String::from("container id should be configured"))?;
    let platform = state
        .platform
        .get()
        .ok_or_else(|| String::from("platform should be configured"))?;

    let mut options = ConnectionOptions::new(container_id, platform);
    options.username = Some(String::from("kitchen"));

    let runner = Arc::new(RecordingRunner {
        exit_code: state.exit_code.get().unwrap_or(0),
        commands: Mutex::new(Vec::new()),
    });
    Ok((Connection::new(options, Arc::clone(&runner)), runner))
}

fn execute(state: &ConnectionState, command: Option<&str>) -> StepResult<()> {
    let (connection, runner) = open_connection(state)?;
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|error| format!("failed to create runtime: {error}"))?;

    let outcome = match connection.execute(runtime.handle(), command) {
        Ok(()) => ExecutionOutcome::Success,
        Err(error) => ExecutionOutcome::Failure {
            message: error.to_string(),
        },
    };
    state.outcome.set(outcome);
    state.commands.set(runner.recorded());
    Ok(())
}

#[given("a connection to container {container_id} on platform {platform}")]
fn a_connection_to_container(
    connection_state: &ConnectionState,
    container_id: String,
    platform: String,
) {
    connection_state.container_id.set(container_id);
    connection_state.platform.set(platform);
}

#[given("docker commands exit with status {code}")]
fn docker_commands_exit_with_status(connection_state: &ConnectionState, code: i32) {
    connection_state.exit_code.set(code);
}

#[when("an empty command is executed")]
fn an_empty_command_is_executed(connection_state: &ConnectionState) -> StepResult<()> {
    execute(connection_state, Some(""))
}

#[when("command {command} is executed")]
fn command_is_executed(connection_state: &ConnectionState, command: String) -> StepResult<()> {
    execute(connection_state, Some(command.as_str()))
}

#[when("the login command is built")]
fn the_login_command_is_built(connection_state: &ConnectionState) -> StepResult<()> {
    let (connection, runner) = open_connection(connection_state)?;
    connection_state.login.set(connection.login_command());
    connection_state.commands.set(runner.recorded());
    Ok(())
}

#[when("the inspection capability is requested")]
fn the_inspection_capability_is_requested(connection_state: &ConnectionState) -> StepResult<()> {
    let (connection, _runner) = open_connection(connection_state)?;
    connection_state
        .inspectable
        .set(connection.inspection().is_some());
    let platform = connection
        .selected_platform()
        .ok_or_else(|| String::from("requesting inspection should select a variant"))?;
    connection_state.selected_platform.set(platform);
    Ok(())
}
