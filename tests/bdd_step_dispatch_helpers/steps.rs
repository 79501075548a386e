//! Given/when steps for step dispatch scenarios.

use std::sync::Arc;
use std::time::Duration;

use ernest_harness::bus::{LocalBus, MessageBus};
use ernest_harness::config::AppConfig;
use ernest_harness::invoker::CliInvoker;
use ernest_harness::steps::ScenarioContext;
use rstest_bdd_macros::{given, when};

use super::StepResult;
use super::state::{DispatchState, ScriptResult, script};

const SHORT: Duration = Duration::from_millis(50);

fn runtime() -> StepResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| format!("failed to create runtime: {e}"))
}

fn config(dispatch_state: &DispatchState) -> StepResult<AppConfig> {
    dispatch_state
        .config
        .get()
        .ok_or_else(|| String::from("config should be set"))
}

fn bus(dispatch_state: &DispatchState) -> StepResult<LocalBus> {
    dispatch_state
        .bus
        .get()
        .ok_or_else(|| String::from("bus should be set"))
}

#[given("an in-process message bus")]
fn in_process_bus(dispatch_state: &DispatchState) {
    dispatch_state.bus.set(LocalBus::new());
}

#[given("the ernest CLI is replaced by echo")]
fn cli_replaced_by_echo(dispatch_state: &DispatchState) -> StepResult<()> {
    let mut updated = config(dispatch_state)?;
    updated.cli.binary = String::from("echo");
    dispatch_state.config.set(updated);
    Ok(())
}

#[given("the target override is {target}")]
fn target_override(dispatch_state: &DispatchState, target: String) -> StepResult<()> {
    let mut updated = config(dispatch_state)?;
    updated.target = Some(target);
    dispatch_state.config.set(updated);
    Ok(())
}

#[given("an observer on {subject}")]
fn observer_on(dispatch_state: &DispatchState, subject: String) -> StepResult<()> {
    let local = bus(dispatch_state)?;
    let observer = runtime()?
        .block_on(local.subscribe(&subject, 8))
        .map_err(|e| format!("subscribe failed: {e}"))?;
    dispatch_state.observer.set(observer);
    Ok(())
}

#[when("the {name} script runs")]
fn script_runs(dispatch_state: &DispatchState, name: String) -> StepResult<()> {
    let text = script(&name).ok_or_else(|| format!("no script named {name:?}"))?;
    let settings = config(dispatch_state)?;
    let shared: Arc<dyn MessageBus> = Arc::new(bus(dispatch_state)?);
    let mut context = ScenarioContext::new(&settings, CliInvoker::from_config(&settings.cli), shared)
        .with_request_timeout(SHORT)
        .with_wait_timeout(SHORT);

    let result = match runtime()?.block_on(context.run_script(text)) {
        Ok(executed) => ScriptResult::Passed(executed),
        Err(error) => ScriptResult::Failed(error.to_string()),
    };
    dispatch_state.result.set(result);
    if let Ok(output) = context.last_output() {
        dispatch_state.last_output.set(String::from(output));
    }
    Ok(())
}
