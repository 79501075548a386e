//! Scenario state for output checking behavioural tests.

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Users table as printed by `ernest-cli user list`.
pub(crate) const USERS_TABLE: &str = "+----+-------+-------+\n\
| ID | NAME  | GROUP |\n\
| 1  | usr   | test  |\n\
| 2  | admin | ops   |\n\
+----+-------+-------+\n";

#[derive(Default, ScenarioState)]
pub(crate) struct OutputState {
    pub(crate) output: Slot<String>,
    pub(crate) strict: Slot<bool>,
    pub(crate) result: Slot<Result<(), String>>,
}

#[fixture]
pub(crate) fn output_state() -> OutputState {
    let state = OutputState::default();
    state.strict.set(false);
    state
}
