//! Then-step assertions for connection scenarios.

use dockhand::engine::ContainerPlatform;
use rstest_bdd_macros::then;

use super::state::{ConnectionState, ExecutionOutcome};
use super::steps::StepResult;

fn recorded_outcome(state: &ConnectionState) -> StepResult<ExecutionOutcome> {
    state
        .outcome
        .get()
        .ok_or_else(|| String::from("execution outcome should be recorded"))
}

fn recorded_login(state: &ConnectionState) -> StepResult<dockhand::engine::LoginCommand> {
    state
        .login
        .get()
        .ok_or_else(|| String::from("login command should be recorded"))
}

#[then("execution succeeds")]
fn execution_succeeds(connection_state: &ConnectionState) -> StepResult<()> {
    match recorded_outcome(connection_state)? {
        ExecutionOutcome::Success => Ok(()),
        ExecutionOutcome::Failure { message } => {
            Err(format!("expected success, got failure: {message}"))
        }
    }
}

// Matches the display text of `TransportError::Failed`.
#[then("execution fails with a transport error")]
fn execution_fails_with_transport_error(connection_state: &ConnectionState) -> StepResult<()> {
    match recorded_outcome(connection_state)? {
        ExecutionOutcome::Failure { message }
            if message.starts_with("Docker failed to execute command on container.") =>
        {
            Ok(())
        }
        ExecutionOutcome::Failure { message } => {
            Err(format!("expected transport failure, got: {message}"))
        }
        ExecutionOutcome::Success => Err(String::from("expected failure, got success")),
    }
}

#[then("no docker command is run")]
fn no_docker_command_is_run(connection_state: &ConnectionState) -> StepResult<()> {
    let commands = connection_state.commands.get().unwrap_or_default();
    if commands.is_empty() {
        Ok(())
    } else {
        Err(format!("expected no commands, got {commands:?}"))
    }
}

#[then("the last docker command is {expected}")]
fn the_last_docker_command_is(
    connection_state: &ConnectionState,
    expected: String,
) -> StepResult<()> {
    let commands = connection_state.commands.get().unwrap_or_default();
    let last = commands
        .last()
        .map(|tokens| tokens.join(" "))
        .ok_or_else(|| String::from("a docker command should have run"))?;
    if last == expected {
        Ok(())
    } else {
        Err(format!("expected `{expected}`, got `{last}`"))
    }
}

#[then("the login command is interactive")]
fn the_login_command_is_interactive(connection_state: &ConnectionState) -> StepResult<()> {
    let login = recorded_login(connection_state)?;
    let has = |flag: &str| login.arguments.iter().any(|arg| arg == flag);
    let tail: Vec<&str> = login
        .arguments
        .iter()
        .rev()
        .take(3)
        .rev()
        .map(String::as_str)
        .collect();

    if has("-t") && has("-i") && !has("-d") && tail == ["/bin/bash", "-login", "-i"] {
        Ok(())
    } else {
        Err(format!("login command is not interactive: {login:?}"))
    }
}

#[then("the login command has no user flag")]
fn the_login_command_has_no_user_flag(connection_state: &ConnectionState) -> StepResult<()> {
    let login = recorded_login(connection_state)?;
    if login.arguments.iter().any(|arg| arg.starts_with("-u ")) {
        Err(format!("login command carries a user: {login:?}"))
    } else {
        Ok(())
    }
}

#[then("the {platform} variant is selected")]
fn the_variant_is_selected(connection_state: &ConnectionState, platform: String) -> StepResult<()> {
    let expected = match platform.as_str() {
        "Windows" => ContainerPlatform::Windows,
        "Linux" => ContainerPlatform::Linux,
        other => return Err(format!("unknown platform family {other}")),
    };
    let selected = connection_state
        .selected_platform
        .get()
        .ok_or_else(|| String::from("a variant should be selected"))?;
    if selected == expected {
        Ok(())
    } else {
        Err(format!("expected {expected:?}, got {selected:?}"))
    }
}

#[then("the connection is inspectable")]
fn the_connection_is_inspectable(connection_state: &ConnectionState) -> StepResult<()> {
    if connection_state.inspectable.get().unwrap_or(false) {
        Ok(())
    } else {
        Err(String::from("expected an inspection capability"))
    }
}

#[then("the connection is not inspectable")]
fn the_connection_is_not_inspectable(connection_state: &ConnectionState) -> StepResult<()> {
    if connection_state.inspectable.get().unwrap_or(true) {
        Err(String::from("expected no inspection capability"))
    } else {
        Ok(())
    }
}
