//! Assertion steps for output checking scenarios.

use rstest_bdd_macros::then;

use super::StepResult;
use super::state::OutputState;

fn outcome(output_state: &OutputState) -> StepResult<Result<(), String>> {
    output_state
        .result
        .get()
        .ok_or_else(|| String::from("check result should be set"))
}

#[then("the check passes")]
fn check_passes(output_state: &OutputState) -> StepResult<()> {
    outcome(output_state)?.map_err(|message| format!("expected check to pass: {message}"))
}

#[then("the check fails mentioning {fragment}")]
fn check_fails_mentioning(output_state: &OutputState, fragment: String) -> StepResult<()> {
    match outcome(output_state)? {
        Ok(()) => Err(String::from("expected check to fail")),
        Err(message) if message.contains(&fragment) => Ok(()),
        Err(message) => Err(format!("expected failure to mention {fragment:?}, got: {message}")),
    }
}
