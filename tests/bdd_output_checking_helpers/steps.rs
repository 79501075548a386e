//! Given/when steps for output checking scenarios.

use ernest_harness::error::StepError;
use ernest_harness::output::{self, ExpectedLines, OutputPolicy};
use rstest_bdd_macros::{given, when};

use super::StepResult;
use super::state::{OutputState, USERS_TABLE};

fn record(output_state: &OutputState, result: Result<(), StepError>) {
    output_state
        .result
        .set(result.map_err(|error| error.to_string()));
}

fn printed(output_state: &OutputState) -> StepResult<String> {
    output_state
        .output
        .get()
        .ok_or_else(|| String::from("output should be set"))
}

#[given("the CLI printed the users table")]
fn cli_printed_users_table(output_state: &OutputState) {
    output_state.output.set(String::from(USERS_TABLE));
}

#[given("strict output checking is enabled")]
fn strict_enabled(output_state: &OutputState) {
    output_state.strict.set(true);
}

#[given("strict output checking is disabled")]
fn strict_disabled(output_state: &OutputState) {
    output_state.strict.set(false);
}

#[when("the users table is checked for {user} in group {group}")]
fn table_checked(output_state: &OutputState, user: String, group: String) -> StepResult<()> {
    let text = printed(output_state)?;
    record(output_state, output::table_row(&text, &user, &group));
    Ok(())
}

#[when("line {number} is checked for {needle}")]
fn line_checked(output_state: &OutputState, number: usize, needle: String) -> StepResult<()> {
    let text = printed(output_state)?;
    record(output_state, output::line_contains(&text, number, &needle));
    Ok(())
}

#[when("line {number} is expected to read {text}")]
fn line_expected(output_state: &OutputState, number: usize, text: String) -> StepResult<()> {
    let actual = printed(output_state)?;
    let policy = OutputPolicy {
        strict: output_state.strict.get().unwrap_or(false),
    };
    let expected = ExpectedLines::new().line(number, text);
    record(output_state, policy.verify(&actual, &expected));
    Ok(())
}

#[when("the output is checked not to contain {needle}")]
fn output_checked_absent(output_state: &OutputState, needle: String) -> StepResult<()> {
    let text = printed(output_state)?;
    record(output_state, output::not_contains(&text, &needle));
    Ok(())
}
