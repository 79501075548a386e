//! Scenario state for step dispatch behavioural tests.

use ernest_harness::bus::{LocalBus, Subscription};
use ernest_harness::config::AppConfig;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Outcome of running a script.
#[derive(Debug, Clone)]
pub(crate) enum ScriptResult {
    /// Every step passed.
    Passed(usize),
    /// A step failed.
    Failed(String),
}

#[derive(Default, ScenarioState)]
pub(crate) struct DispatchState {
    pub(crate) config: Slot<AppConfig>,
    pub(crate) bus: Slot<LocalBus>,
    pub(crate) observer: Slot<Subscription>,
    pub(crate) result: Slot<ScriptResult>,
    pub(crate) last_output: Slot<String>,
}

#[fixture]
pub(crate) fn dispatch_state() -> DispatchState {
    let state = DispatchState::default();
    state.config.set(AppConfig::default());
    state
}

/// Look up a named step script.
pub(crate) fn script(name: &str) -> Option<&'static str> {
    match name {
        "listing" => Some(
            r#"Feature: Users
  Scenario: Listing users
    Given I setup ernest with target "https://ernest.local"
    And I'm logged in as "usr" / "secret"
    # the echo CLI prints its arguments back
    When I run ernest with "user   list"
    Then The output should contain "user list"
    And The output line number "0" should contain "user"
"#,
        ),
        "target" => Some(r#"Given I setup ernest with target "https://ernest.local""#),
        "failing" => Some(
            r#"When I run ernest with "service list"
Then The output should contain "Specified service not found"
And I logout
"#,
        ),
        "group" => Some(r#"Given the group "test" exists"#),
        "unknown" => Some("Given I dance"),
        _ => None,
    }
}
