//! Given/when steps for bus waiting scenarios.

use bytes::Bytes;
use ernest_harness::bus::{LocalBus, MessageBus, publish_json};
use ernest_harness::events::RouterEvent;
use rstest_bdd_macros::{given, when};

use super::StepResult;
use super::state::{BusState, runtime};

fn bus(bus_state: &BusState) -> StepResult<LocalBus> {
    bus_state
        .bus
        .get()
        .ok_or_else(|| String::from("bus should be set"))
}

fn subscribe(bus_state: &BusState, subject: &str, capacity: usize) -> StepResult<()> {
    let local = bus(bus_state)?;
    let subscription = runtime()?
        .block_on(local.subscribe(subject, capacity))
        .map_err(|e| format!("subscribe failed: {e}"))?;
    bus_state.subscription.set(subscription);
    Ok(())
}

#[given("an in-process message bus")]
fn in_process_bus(bus_state: &BusState) {
    bus_state.bus.set(LocalBus::new());
}

#[given("a bounded subscription to {subject} holding {capacity} message")]
fn bounded_subscription(bus_state: &BusState, subject: String, capacity: usize) -> StepResult<()> {
    subscribe(bus_state, &subject, capacity)
}

#[given("a subscription to {subject}")]
fn subscription(bus_state: &BusState, subject: String) -> StepResult<()> {
    subscribe(bus_state, &subject, 8)
}

#[when("a router event named {name} is published on {subject}")]
fn router_event_published(bus_state: &BusState, name: String, subject: String) -> StepResult<()> {
    let local = bus(bus_state)?;
    let event = RouterEvent {
        router_name: name,
        ..RouterEvent::default()
    };
    runtime()?
        .block_on(publish_json(&local, &subject, &event))
        .map_err(|e| format!("publish failed: {e}"))
}

#[when("a malformed payload is published on {subject}")]
fn malformed_payload_published(bus_state: &BusState, subject: String) -> StepResult<()> {
    let local = bus(bus_state)?;
    runtime()?
        .block_on(local.publish(&subject, Bytes::from_static(b"{not json")))
        .map_err(|e| format!("publish failed: {e}"))
}
