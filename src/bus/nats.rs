//! NATS transport.

use std::time::Duration;

use async_nats::{Client, ConnectOptions};
use bytes::Bytes;
use futures_util::StreamExt;
use tracing::{debug, info};

use super::{BusMessage, MessageBus, PublishFuture, RequestFuture, SubscribeFuture, Subscription};
use crate::error::BusError;

const CLIENT_NAME: &str = "ernest-harness";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A [`MessageBus`] backed by a NATS server connection.
#[derive(Debug, Clone)]
pub struct NatsBus {
    client: Client,
}

impl NatsBus {
    /// Connect to the server at `uri`.
    ///
    /// # Errors
    ///
    /// Returns `BusError::ConnectionFailed` when the server cannot be reached.
    pub async fn connect(uri: &str, request_timeout: Duration) -> Result<Self, BusError> {
        let options = ConnectOptions::new()
            .name(CLIENT_NAME)
            .connection_timeout(CONNECT_TIMEOUT)
            .request_timeout(Some(request_timeout));

        let client = async_nats::connect_with_options(uri, options)
            .await
            .map_err(|error| BusError::ConnectionFailed {
                uri: String::from(uri),
                message: error.to_string(),
            })?;

        info!(uri, "connected to message bus");
        Ok(Self { client })
    }
}

fn to_bus_message(message: async_nats::Message) -> BusMessage {
    BusMessage {
        subject: message.subject.to_string(),
        payload: message.payload,
        reply: message.reply.map(|reply| reply.to_string()),
    }
}

impl MessageBus for NatsBus {
    fn subscribe(&self, subject: &str, capacity: usize) -> SubscribeFuture<'_> {
        let owned_subject = String::from(subject);
        Box::pin(async move {
            let subscriber = self
                .client
                .subscribe(owned_subject.clone())
                .await
                .map_err(|error| BusError::SubscribeFailed {
                    subject: owned_subject.clone(),
                    message: error.to_string(),
                })?;

            // Interest must reach the server before the caller triggers
            // the publisher.
            self.client
                .flush()
                .await
                .map_err(|error| BusError::SubscribeFailed {
                    subject: owned_subject.clone(),
                    message: error.to_string(),
                })?;

            // The client buffers per subscription well beyond `capacity`, so
            // publishing up to `capacity` messages before a wait never drops.
            debug!(subject = %owned_subject, capacity, "subscribed");
            let messages = subscriber.map(to_bus_message);
            Ok(Subscription::new(owned_subject, Box::pin(messages)))
        })
    }

    fn publish(&self, subject: &str, payload: Bytes) -> PublishFuture<'_> {
        let owned_subject = String::from(subject);
        Box::pin(async move {
            self.client
                .publish(owned_subject.clone(), payload)
                .await
                .map_err(|error| BusError::PublishFailed {
                    subject: owned_subject.clone(),
                    message: error.to_string(),
                })?;
            debug!(subject = %owned_subject, "published");
            Ok(())
        })
    }

    fn request(&self, subject: &str, payload: Bytes, timeout: Duration) -> RequestFuture<'_> {
        let owned_subject = String::from(subject);
        Box::pin(async move {
            let reply = tokio::time::timeout(
                timeout,
                self.client.request(owned_subject.clone(), payload),
            )
            .await
            .map_err(|_| BusError::RequestFailed {
                subject: owned_subject.clone(),
                message: format!("no reply within {} ms", timeout.as_millis()),
            })?
            .map_err(|error| BusError::RequestFailed {
                subject: owned_subject.clone(),
                message: error.to_string(),
            })?;
            Ok(to_bus_message(reply))
        })
    }
}
