//! Message bus access for scenarios.
//!
//! Scenarios subscribe to a subject before triggering the CLI, then wait for
//! the orchestrator's messages with a timeout. Each [`Subscription`] owns a
//! bounded queue fixed at subscribe time; messages published before the
//! scenario starts waiting are retained up to that capacity.
//!
//! Two [`MessageBus`] implementations are provided: [`NatsBus`] talks to a
//! NATS server and [`LocalBus`] is an in-process broker with the same
//! subject semantics.

mod local;
mod nats;
mod subject;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::BusError;

pub use local::LocalBus;
pub use nats::NatsBus;
pub use subject::{
    Action, Connector, ControlSubject, InvalidSubject, ResourceKind, ResourceSubject,
    subject_matches,
};

/// A message received from the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    /// The subject the message was published on.
    pub subject: String,

    /// The raw payload.
    pub payload: Bytes,

    /// Reply subject for request messages.
    pub reply: Option<String>,
}

impl BusMessage {
    /// Decode the JSON payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns `BusError::DecodeFailed` when the payload is not valid JSON
    /// for `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, BusError> {
        serde_json::from_slice(&self.payload).map_err(|error| BusError::DecodeFailed {
            subject: self.subject.clone(),
            message: error.to_string(),
        })
    }

    /// The payload as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Stream of messages delivered to one subscription.
pub type MessageStream = Pin<Box<dyn Stream<Item = BusMessage> + Send>>;

/// Boxed future returned by [`MessageBus::subscribe`].
pub type SubscribeFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Subscription, BusError>> + Send + 'a>>;

/// Boxed future returned by [`MessageBus::publish`].
pub type PublishFuture<'a> = Pin<Box<dyn Future<Output = Result<(), BusError>> + Send + 'a>>;

/// Boxed future returned by [`MessageBus::request`].
pub type RequestFuture<'a> =
    Pin<Box<dyn Future<Output = Result<BusMessage, BusError>> + Send + 'a>>;

/// Behaviour required of a publish/subscribe transport.
pub trait MessageBus: Send + Sync {
    /// Register interest in `subject` with a queue of `capacity` messages.
    ///
    /// The subscription is active on the bus when the future resolves.
    fn subscribe(&self, subject: &str, capacity: usize) -> SubscribeFuture<'_>;

    /// Publish `payload` on `subject`.
    fn publish(&self, subject: &str, payload: Bytes) -> PublishFuture<'_>;

    /// Publish `payload` on `subject` and wait up to `timeout` for one reply.
    fn request(&self, subject: &str, payload: Bytes, timeout: Duration) -> RequestFuture<'_>;
}

/// An active subscription to one subject.
///
/// Dropping the subscription releases it on the bus.
pub struct Subscription {
    subject: String,
    messages: MessageStream,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

impl Subscription {
    /// Wrap a message stream for `subject`.
    #[must_use]
    pub fn new(subject: impl Into<String>, messages: MessageStream) -> Self {
        Self {
            subject: subject.into(),
            messages,
        }
    }

    /// The subject (or pattern) this subscription listens on.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Wait up to `timeout` for the next message.
    ///
    /// # Errors
    ///
    /// Returns `BusError::Timeout` when nothing arrives in time and
    /// `BusError::Closed` when the bus has dropped the subscription.
    pub async fn wait(&mut self, timeout: Duration) -> Result<BusMessage, BusError> {
        match tokio::time::timeout(timeout, self.messages.next()).await {
            Ok(Some(message)) => {
                debug!(subject = %message.subject, bytes = message.payload.len(), "received message");
                Ok(message)
            }
            Ok(None) => Err(BusError::Closed {
                subject: self.subject.clone(),
            }),
            Err(_) => Err(BusError::Timeout {
                subject: self.subject.clone(),
                millis: timeout.as_millis(),
            }),
        }
    }

    /// Wait for the next message and decode its JSON payload.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Subscription::wait`], or
    /// `BusError::DecodeFailed` when the payload does not decode into `T`.
    pub async fn wait_event<T: DeserializeOwned>(&mut self, timeout: Duration) -> Result<T, BusError> {
        self.wait(timeout).await?.decode()
    }

    /// Wait for `count` messages, each within `timeout`.
    ///
    /// # Errors
    ///
    /// Fails on the first message that does not arrive in time.
    pub async fn wait_many(
        &mut self,
        count: usize,
        timeout: Duration,
    ) -> Result<Vec<BusMessage>, BusError> {
        let mut received = Vec::with_capacity(count);
        for _ in 0..count {
            received.push(self.wait(timeout).await?);
        }
        Ok(received)
    }

    /// Release the subscription.
    pub fn unsubscribe(self) {
        debug!(subject = %self.subject, "unsubscribing");
    }
}

/// Encode `value` as JSON and publish it on `subject`.
///
/// # Errors
///
/// Returns `BusError::EncodeFailed` when `value` cannot be serialised, or the
/// bus's publish error.
pub async fn publish_json<T: Serialize + ?Sized>(
    bus: &dyn MessageBus,
    subject: &str,
    value: &T,
) -> Result<(), BusError> {
    let payload = encode(subject, value)?;
    bus.publish(subject, payload).await
}

/// Encode `value` as JSON, send it as a request and return the reply.
///
/// # Errors
///
/// Returns `BusError::EncodeFailed` when `value` cannot be serialised, or the
/// bus's request error.
pub async fn request_json<T: Serialize + ?Sized>(
    bus: &dyn MessageBus,
    subject: &str,
    value: &T,
    timeout: Duration,
) -> Result<BusMessage, BusError> {
    let payload = encode(subject, value)?;
    bus.request(subject, payload, timeout).await
}

fn encode<T: Serialize + ?Sized>(subject: &str, value: &T) -> Result<Bytes, BusError> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(|error| BusError::EncodeFailed {
            subject: String::from(subject),
            message: error.to_string(),
        })
}
