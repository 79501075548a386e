//! Given/when steps for CLI invocation scenarios.

use ernest_harness::invoker::CliInvoker;
use rstest_bdd_macros::{given, when};

use super::StepResult;
use super::state::{InvocationResult, InvocationState};

fn run(invocation_state: &InvocationState, args: Vec<String>) -> StepResult<()> {
    let binary = invocation_state
        .binary
        .get()
        .ok_or_else(|| String::from("binary should be set"))?;
    let result = match CliInvoker::new(binary).invoke(args) {
        Ok(invocation) => InvocationResult::Ran(invocation),
        Err(error) => InvocationResult::Failed(error.to_string()),
    };
    invocation_state.result.set(result);
    Ok(())
}

fn shell(script: &str) -> Vec<String> {
    vec![String::from("-c"), String::from(script)]
}

#[given("the CLI binary is {binary}")]
fn cli_binary(invocation_state: &InvocationState, binary: String) {
    invocation_state.binary.set(binary);
}

#[when("the CLI writes to both streams and exits with code {code}")]
fn cli_writes_both_streams(invocation_state: &InvocationState, code: i32) -> StepResult<()> {
    let script = format!("echo out; echo err 1>&2; echo again; exit {code}");
    run(invocation_state, shell(&script))
}

#[when("the CLI drains its standard input")]
fn cli_drains_stdin(invocation_state: &InvocationState) -> StepResult<()> {
    run(invocation_state, shell("cat; echo done"))
}

#[when("the CLI kills itself")]
fn cli_kills_itself(invocation_state: &InvocationState) -> StepResult<()> {
    run(invocation_state, shell("kill -9 $$"))
}

#[when("the CLI is run without arguments")]
fn cli_run_without_arguments(invocation_state: &InvocationState) -> StepResult<()> {
    run(invocation_state, Vec::new())
}
