//! Assertion steps for CLI invocation scenarios.

use ernest_harness::invoker::{CommandOutcome, Invocation};
use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{InvocationResult, InvocationState};

fn invocation(invocation_state: &InvocationState) -> StepResult<Invocation> {
    match invocation_state.result.get() {
        Some(InvocationResult::Ran(invocation)) => Ok(invocation),
        Some(InvocationResult::Failed(message)) => {
            Err(format!("expected the CLI to run, got error: {message}"))
        }
        None => Err(String::from("result should be set")),
    }
}

fn expect_outcome(invocation_state: &InvocationState, expected: CommandOutcome) -> StepResult<()> {
    let actual = invocation(invocation_state)?.outcome();
    if actual == expected {
        Ok(())
    } else {
        Err(format!("expected {expected:?}, got {actual:?}"))
    }
}

#[then("the output lines are {expected}")]
fn output_lines_are(invocation_state: &InvocationState, expected: String) -> StepResult<()> {
    let ran = invocation(invocation_state)?;
    let wanted: Vec<&str> = expected.split(", ").chain(std::iter::once("")).collect();
    let lines = ran.lines();
    if lines == wanted {
        Ok(())
    } else {
        Err(format!("expected lines {wanted:?}, got {lines:?}"))
    }
}

#[then("the outcome is success")]
fn outcome_is_success(invocation_state: &InvocationState) -> StepResult<()> {
    expect_outcome(invocation_state, CommandOutcome::Success)
}

#[then("the outcome is command exit with code {code}")]
fn outcome_is_command_exit(invocation_state: &InvocationState, code: i32) -> StepResult<()> {
    expect_outcome(invocation_state, CommandOutcome::CommandExit { code })
}

#[then("the outcome is terminated")]
fn outcome_is_terminated(invocation_state: &InvocationState) -> StepResult<()> {
    expect_outcome(invocation_state, CommandOutcome::Terminated)
}

#[then("the invocation fails to start")]
fn invocation_fails_to_start(invocation_state: &InvocationState) -> StepResult<()> {
    match invocation_state.result.get() {
        Some(InvocationResult::Failed(message)) if message.starts_with("failed to start") => Ok(()),
        Some(InvocationResult::Failed(message)) => {
            Err(format!("expected a spawn failure, got: {message}"))
        }
        Some(InvocationResult::Ran(ran)) => {
            Err(format!("expected a spawn failure, got {:?}", ran.outcome()))
        }
        None => Err(String::from("result should be set")),
    }
}
