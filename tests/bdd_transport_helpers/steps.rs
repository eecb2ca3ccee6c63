//! Given/When steps for transport scenarios.

use std::sync::Arc;

use dockhand::config::TransportConfig;
use dockhand::engine::{DaemonEndpoint, HostOs, SessionState, CliRunner, Transport};
use mockable::MockEnv;
use rstest_bdd_macros::{given, when};

use super::state::{OpenOutcome, TransportState};

pub type StepResult<T> = Result<T, String>;

fn env_for(docker_host: Option<String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .returning(move |key| docker_host.clone().filter(|_| key == "DOCKER_HOST"));
    env
}

fn open(transport_state: &TransportState, container_id: &str) {
    let config = TransportConfig {
        socket: transport_state.configured_socket.get(),
        ..TransportConfig::default()
    };
    let env = env_for(transport_state.docker_host.get().flatten());
    let endpoint = transport_state.endpoint.get().unwrap_or_default();
    let host_os = transport_state.host_os.get().unwrap_or(HostOs::Unix);
    let transport = Transport::new(&config, &env, endpoint).with_host_os(host_os);

    let outcome = match transport.connection(
        &SessionState::new(container_id, "ubuntu-22.04"),
        Arc::new(CliRunner::new()),
    ) {
        Ok(connection) => OpenOutcome::Opened(Box::new(connection.options().clone())),
        Err(error) => OpenOutcome::Failed {
            message: error.to_string(),
        },
    };
    transport_state.outcome.set(outcome);
}

#[given("no DOCKER_HOST is set")]
fn no_docker_host_is_set(transport_state: &TransportState) {
    transport_state.docker_host.set(None);
}

#[given("DOCKER_HOST is {value}")]
fn docker_host_is(transport_state: &TransportState, value: String) {
    transport_state.docker_host.set(Some(value));
}

#[given("the host operating system is {os}")]
fn the_host_operating_system_is(transport_state: &TransportState, os: String) -> StepResult<()> {
    let host_os = match os.as_str() {
        "unix" => HostOs::Unix,
        "windows" => HostOs::Windows,
        other => return Err(format!("unknown host operating system {other}")),
    };
    transport_state.host_os.set(host_os);
    Ok(())
}

#[given("the endpoint already holds {socket}")]
fn the_endpoint_already_holds(transport_state: &TransportState, socket: String) {
    transport_state
        .endpoint
        .set(DaemonEndpoint::with_socket(socket));
}

#[given("the configured socket is {socket}")]
fn the_configured_socket_is(transport_state: &TransportState, socket: String) {
    transport_state.configured_socket.set(socket);
}

#[when("a connection is opened for container {container_id}")]
fn a_connection_is_opened_for_container(transport_state: &TransportState, container_id: String) {
    open(transport_state, &container_id);
}

#[when("a connection is opened without a container id")]
fn a_connection_is_opened_without_container_id(transport_state: &TransportState) {
    open(transport_state, "");
}
