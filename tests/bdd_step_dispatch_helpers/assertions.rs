//! Assertion steps for step dispatch scenarios.

use std::time::Duration;

use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{DispatchState, ScriptResult};

fn result(dispatch_state: &DispatchState) -> StepResult<ScriptResult> {
    dispatch_state
        .result
        .get()
        .ok_or_else(|| String::from("script result should be set"))
}

#[then("the script passes after {count} steps")]
fn script_passes(dispatch_state: &DispatchState, count: usize) -> StepResult<()> {
    match result(dispatch_state)? {
        ScriptResult::Passed(executed) if executed == count => Ok(()),
        ScriptResult::Passed(executed) => Err(format!("expected {count} steps, ran {executed}")),
        ScriptResult::Failed(message) => Err(format!("expected the script to pass: {message}")),
    }
}

#[then("the script fails with {fragment}")]
fn script_fails(dispatch_state: &DispatchState, fragment: String) -> StepResult<()> {
    match result(dispatch_state)? {
        ScriptResult::Failed(message) if message.contains(&fragment) => Ok(()),
        ScriptResult::Failed(message) => {
            Err(format!("expected failure mentioning {fragment:?}, got: {message}"))
        }
        ScriptResult::Passed(executed) => {
            Err(format!("expected the script to fail, it passed {executed} steps"))
        }
    }
}

#[then("the last output is {expected}")]
fn last_output_is(dispatch_state: &DispatchState, expected: String) -> StepResult<()> {
    let output = dispatch_state
        .last_output
        .get()
        .ok_or_else(|| String::from("no CLI output was recorded"))?;
    if output.trim_end() == expected {
        Ok(())
    } else {
        Err(format!("expected output {expected:?}, got {output:?}"))
    }
}

#[then("the observer saw {subjects}")]
fn observer_saw(dispatch_state: &DispatchState, subjects: String) -> StepResult<()> {
    let mut observer = dispatch_state
        .observer
        .take()
        .ok_or_else(|| String::from("observer should be set"))?;
    let expected: Vec<&str> = subjects.split(", ").collect();
    let runtime =
        tokio::runtime::Runtime::new().map_err(|e| format!("failed to create runtime: {e}"))?;
    let received = runtime
        .block_on(observer.wait_many(expected.len(), Duration::from_millis(100)))
        .map_err(|e| format!("observer did not see every request: {e}"))?;
    let seen: Vec<&str> = received.iter().map(|message| message.subject.as_str()).collect();
    if seen == expected {
        Ok(())
    } else {
        Err(format!("expected {expected:?}, observer saw {seen:?}"))
    }
}
