//! Scenario state for CLI invocation behavioural tests.

use ernest_harness::invoker::Invocation;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Result of one invocation attempt.
#[derive(Debug, Clone)]
pub(crate) enum InvocationResult {
    /// The CLI ran to completion.
    Ran(Invocation),
    /// The CLI could not be started or captured.
    Failed(String),
}

#[derive(Default, ScenarioState)]
pub(crate) struct InvocationState {
    pub(crate) binary: Slot<String>,
    pub(crate) result: Slot<InvocationResult>,
}

#[fixture]
pub(crate) fn invocation_state() -> InvocationState {
    InvocationState::default()
}
