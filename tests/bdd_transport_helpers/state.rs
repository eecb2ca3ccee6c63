//! Scenario state for transport behavioural tests.

use dockhand::engine::{ConnectionOptions, DaemonEndpoint, HostOs};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

#[derive(Debug, Clone)]
pub(crate) enum OpenOutcome {
    Opened(Box<ConnectionOptions>),
    Failed { message: String },
}

#[derive(Default, ScenarioState)]
pub(crate) struct TransportState {
    pub(crate) docker_host: Slot<Option<String>>,
    pub(crate) host_os: Slot<HostOs>,
    pub(crate) configured_socket: Slot<String>,
    pub(crate) endpoint: Slot<DaemonEndpoint>,
    pub(crate) outcome: Slot<OpenOutcome>,
}

#[fixture]
pub(crate) fn transport_state() -> TransportState {
    let state = TransportState::default();
    state.docker_host.set(None);
    state.host_os.set(HostOs::Unix);
    state.endpoint.set(DaemonEndpoint::new());
    state
}
