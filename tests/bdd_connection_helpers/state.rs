//! Scenario state for connection behavioural tests.

use dockhand::engine::{ContainerPlatform, LoginCommand};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

#[derive(Debug, Clone)]
pub(crate) enum ExecutionOutcome {
    Success,
    Failure { message: String },
}

#[derive(Default, ScenarioState)]
pub(crate) struct ConnectionState {
    pub(crate) container_id: Slot<String>,
    pub(crate) platform: Slot<String>,
    pub(crate) exit_code: Slot<i32>,
    pub(crate) outcome: Slot<ExecutionOutcome>,
    pub(crate) commands: Slot<Vec<Vec<String>>>,
    pub(crate) login: Slot<LoginCommand>,
    pub(crate) selected_platform: Slot<ContainerPlatform>,
    pub(crate) inspectable: Slot<bool>,
}

#[fixture]
pub(crate) fn connection_state() -> ConnectionState {
    let state = ConnectionState::default();
    state.exit_code.set(0);
    state.commands.set(Vec::new());
    state
}
