//! Then-step assertions for transport scenarios.

use dockhand::engine::ConnectionOptions;
use rstest_bdd_macros::then;

use super::state::{OpenOutcome, TransportState};
use super::steps::StepResult;

fn opened_options(transport_state: &TransportState) -> StepResult<ConnectionOptions> {
    match transport_state.outcome.get() {
        Some(OpenOutcome::Opened(options)) => Ok(*options),
        Some(OpenOutcome::Failed { message }) => {
            Err(format!("expected an open connection, got: {message}"))
        }
        None => Err(String::from("no connection was opened")),
    }
}

fn expect_equal(field: &str, actual: Option<&str>, expected: Option<&str>) -> StepResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(format!("expected {field} {expected:?}, got {actual:?}"))
    }
}

#[then("the connection socket is {socket}")]
fn the_connection_socket_is(transport_state: &TransportState, socket: String) -> StepResult<()> {
    let options = opened_options(transport_state)?;
    expect_equal("socket", options.socket.as_deref(), Some(&socket))
}

#[then("the connection user is {user}")]
fn the_connection_user_is(transport_state: &TransportState, user: String) -> StepResult<()> {
    let options = opened_options(transport_state)?;
    expect_equal("user", options.username.as_deref(), Some(&user))
}

#[then("the connection has no user")]
fn the_connection_has_no_user(transport_state: &TransportState) -> StepResult<()> {
    let options = opened_options(transport_state)?;
    expect_equal("user", options.username.as_deref(), None)
}

#[then("the connection temp dir is {temp_dir}")]
fn the_connection_temp_dir_is(
    transport_state: &TransportState,
    temp_dir: String,
) -> StepResult<()> {
    let options = opened_options(transport_state)?;
    expect_equal("temp dir", Some(&options.temp_dir), Some(&temp_dir))
}

#[then("the published endpoint is {endpoint}")]
fn the_published_endpoint_is(
    transport_state: &TransportState,
    endpoint: String,
) -> StepResult<()> {
    let published = transport_state
        .endpoint
        .get()
        .ok_or_else(|| String::from("endpoint slot should exist"))?;
    expect_equal("endpoint", published.get(), Some(&endpoint))
}

#[then("opening fails with a missing container id error")]
fn opening_fails_with_missing_container_id(transport_state: &TransportState) -> StepResult<()> {
    match transport_state.outcome.get() {
        Some(OpenOutcome::Failed { message }) if message.contains("container_id") => Ok(()),
        Some(OpenOutcome::Failed { message }) => {
            Err(format!("expected a missing container id error, got: {message}"))
        }
        Some(OpenOutcome::Opened(_)) => Err(String::from("expected opening to fail")),
        None => Err(String::from("no connection attempt was recorded")),
    }
}
