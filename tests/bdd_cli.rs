//! Behavioural tests for the ernest-harness CLI.
//!
//! These tests validate the command-line interface behaviour using rstest-bdd.

use clap::{CommandFactory, Parser};
use ernest_harness::config::Cli;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then};

/// State shared across CLI test scenarios.
#[derive(Default, ScenarioState)]
struct CliState {
    /// The output from running the CLI.
    output: Slot<String>,
    /// Any error message from the CLI.
    error: Slot<String>,
    /// Whether the CLI invocation succeeded.
    success: Slot<bool>,
}

/// Fixture providing a fresh CLI state.
#[fixture]
fn cli_state() -> CliState {
    CliState::default()
}

// Step definitions

#[given("the help text is requested")]
fn invoke_with_help(cli_state: &CliState) {
    let mut cmd = Cli::command();
    let help_text = cmd.render_help().to_string();
    cli_state.output.set(help_text);
    cli_state.success.set(true);
}

#[given("the version is requested")]
fn invoke_with_version(cli_state: &CliState) {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown").to_owned();
    let name = cmd.get_name();
    cli_state.output.set(format!("{name} {version}"));
    cli_state.success.set(true);
}

#[given("the CLI is invoked with {arguments}")]
fn invoke_with_arguments(cli_state: &CliState, arguments: String) {
    let argv = std::iter::once("ernest-harness").chain(arguments.split_whitespace());
    match Cli::try_parse_from(argv) {
        Ok(_) => {
            cli_state.success.set(true);
        }
        Err(e) => {
            cli_state.error.set(e.to_string());
            cli_state.success.set(false);
        }
    }
}

#[then("the output contains {text}")]
#[expect(
    clippy::expect_used,
    reason = "test assertion - panic on missing state is intentional"
)]
fn output_contains(cli_state: &CliState, text: String) {
    let output = cli_state
        .output
        .get()
        .expect("output should be set before checking");
    assert!(
        output.contains(&text),
        "Expected output to contain '{text}', but got:\n{output}"
    );
}

#[then("an error is returned")]
#[expect(
    clippy::expect_used,
    reason = "test assertion - panic on missing state is intentional"
)]
fn error_is_returned(cli_state: &CliState) {
    let success = cli_state
        .success
        .get()
        .expect("success should be set before checking");
    assert!(!success, "Expected an error to be returned");
}

#[then("the error mentions {text}")]
#[expect(
    clippy::expect_used,
    reason = "test assertion - panic on missing state is intentional"
)]
fn error_mentions(cli_state: &CliState, text: String) {
    let error = cli_state
        .error
        .get()
        .expect("error should be set before checking");
    assert!(
        error.contains(&text),
        "Expected error to mention '{text}', but got:\n{error}"
    );
}

#[then("the invocation succeeds")]
#[expect(
    clippy::expect_used,
    reason = "test assertion - panic on missing state is intentional"
)]
fn invocation_succeeds(cli_state: &CliState) {
    let success = cli_state
        .success
        .get()
        .expect("success should be set before checking");
    let error = cli_state.error.get().unwrap_or_default();
    assert!(success, "Expected invocation to succeed, got:\n{error}");
}

// Scenario bindings

#[scenario(path = "tests/features/cli.feature", name = "Display help information")]
fn display_help_information(cli_state: CliState) {
    let _ = cli_state;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Display version information"
)]
fn display_version_information(cli_state: CliState) {
    let _ = cli_state;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Invoke requires CLI arguments"
)]
fn invoke_requires_arguments(cli_state: CliState) {
    let _ = cli_state;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Invoke passes hyphenated arguments through"
)]
fn invoke_passes_hyphenated_arguments(cli_state: CliState) {
    let _ = cli_state;
}

#[scenario(path = "tests/features/cli.feature", name = "Wait requires a subject")]
fn wait_requires_subject(cli_state: CliState) {
    let _ = cli_state;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Wait accepts a count and timeout"
)]
fn wait_accepts_count_and_timeout(cli_state: CliState) {
    let _ = cli_state;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Fixture rejects an unknown provider"
)]
fn fixture_rejects_unknown_provider(cli_state: CliState) {
    let _ = cli_state;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Steps accepts a file with a global target"
)]
fn steps_accepts_file_with_target(cli_state: CliState) {
    let _ = cli_state;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Steps accepts a setup provider"
)]
fn steps_accepts_setup_provider(cli_state: CliState) {
    let _ = cli_state;
}
