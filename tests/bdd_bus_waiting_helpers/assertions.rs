//! Assertion steps for bus waiting scenarios.

use ernest_harness::bus::{BusMessage, Subscription};
use ernest_harness::error::BusError;
use ernest_harness::events::{InstanceEvent, RouterEvent};
use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{BusState, WAIT, runtime};

fn take_subscription(bus_state: &BusState) -> StepResult<Subscription> {
    bus_state
        .subscription
        .take()
        .ok_or_else(|| String::from("subscription should be set"))
}

fn next_message(bus_state: &BusState) -> StepResult<Result<BusMessage, BusError>> {
    let mut subscription = take_subscription(bus_state)?;
    let result = runtime()?.block_on(subscription.wait(WAIT));
    bus_state.subscription.set(subscription);
    Ok(result)
}

#[then("the next event is a router named {name}")]
fn next_event_is_router(bus_state: &BusState, name: String) -> StepResult<()> {
    let mut subscription = take_subscription(bus_state)?;
    let result = runtime()?.block_on(subscription.wait_event::<RouterEvent>(WAIT));
    bus_state.subscription.set(subscription);

    let event = result.map_err(|e| format!("expected a router event: {e}"))?;
    if event.router_name == name {
        Ok(())
    } else {
        Err(format!("expected router {name:?}, got {:?}", event.router_name))
    }
}

#[then("the next message arrived on {subject}")]
fn next_message_arrived_on(bus_state: &BusState, subject: String) -> StepResult<()> {
    let message = next_message(bus_state)?.map_err(|e| format!("expected a message: {e}"))?;
    if message.subject == subject {
        Ok(())
    } else {
        Err(format!("expected subject {subject:?}, got {:?}", message.subject))
    }
}

#[then("waiting times out on {subject}")]
fn waiting_times_out(bus_state: &BusState, subject: String) -> StepResult<()> {
    match next_message(bus_state)? {
        Err(BusError::Timeout { subject: waited, .. }) if waited == subject => Ok(()),
        Err(other) => Err(format!("expected a timeout on {subject:?}, got: {other}")),
        Ok(message) => Err(format!("expected a timeout, got a message on {}", message.subject)),
    }
}

#[then("decoding the next event fails")]
fn decoding_fails(bus_state: &BusState) -> StepResult<()> {
    let mut subscription = take_subscription(bus_state)?;
    let result = runtime()?.block_on(subscription.wait_event::<InstanceEvent>(WAIT));
    bus_state.subscription.set(subscription);

    match result {
        Err(BusError::DecodeFailed { .. }) => Ok(()),
        Err(other) => Err(format!("expected a decode failure, got: {other}")),
        Ok(event) => Err(format!("expected a decode failure, got {event:?}")),
    }
}
