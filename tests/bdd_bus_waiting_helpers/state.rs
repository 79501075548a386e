//! Scenario state for bus waiting behavioural tests.

use std::time::Duration;

use ernest_harness::bus::{LocalBus, Subscription};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// How long assertions wait before declaring a timeout.
pub(crate) const WAIT: Duration = Duration::from_millis(100);

#[derive(Default, ScenarioState)]
pub(crate) struct BusState {
    pub(crate) bus: Slot<LocalBus>,
    pub(crate) subscription: Slot<Subscription>,
}

#[fixture]
pub(crate) fn bus_state() -> BusState {
    BusState::default()
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Runtime::new().map_err(|e| format!("failed to create runtime: {e}"))
}
