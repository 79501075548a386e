//! In-process message broker.
//!
//! Routes published messages to every live subscription whose pattern
//! matches the subject. Each subscription queue is bounded; a full queue
//! drops the message and logs it, as a slow consumer on a real server would.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{
    BusMessage, MessageBus, PublishFuture, RequestFuture, SubscribeFuture, Subscription,
    subject_matches,
};
use crate::error::BusError;

#[derive(Debug)]
struct Route {
    pattern: String,
    sender: mpsc::Sender<BusMessage>,
}

#[derive(Debug, Default)]
struct Broker {
    routes: Vec<Route>,
    next_inbox: u64,
}

/// An in-process [`MessageBus`].
///
/// Clones share the same broker.
#[derive(Debug, Clone, Default)]
pub struct LocalBus {
    broker: Arc<Mutex<Broker>>,
}

impl LocalBus {
    /// Create an empty broker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Broker> {
        self.broker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(&self, pattern: &str, capacity: usize) -> Subscription {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        self.lock().routes.push(Route {
            pattern: String::from(pattern),
            sender,
        });
        debug!(subject = pattern, capacity, "subscribed");

        let messages = stream::unfold(receiver, |mut rx| async move {
            rx.recv().await.map(|message| (message, rx))
        });
        Subscription::new(pattern, Box::pin(messages))
    }

    /// Deliver a message and return how many subscriptions accepted it.
    fn deliver(&self, subject: &str, payload: &Bytes, reply: Option<&str>) -> usize {
        let mut broker = self.lock();
        broker.routes.retain(|route| !route.sender.is_closed());

        let mut delivered = 0;
        for route in broker
            .routes
            .iter()
            .filter(|route| subject_matches(&route.pattern, subject))
        {
            let message = BusMessage {
                subject: String::from(subject),
                payload: payload.clone(),
                reply: reply.map(String::from),
            };
            match route.sender.try_send(message) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(subject, pattern = %route.pattern, "subscription queue full; message dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {}
            }
        }
        delivered
    }

    /// Publish immediately, outside any async context.
    pub fn publish_now(&self, subject: &str, payload: &Bytes) {
        let delivered = self.deliver(subject, payload, None);
        debug!(subject, delivered, "published");
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        let mut broker = self.lock();
        broker.routes.retain(|route| !route.sender.is_closed());
        broker.routes.len()
    }

    fn next_inbox(&self) -> String {
        let mut broker = self.lock();
        broker.next_inbox += 1;
        format!("_INBOX.{}", broker.next_inbox)
    }
}

impl MessageBus for LocalBus {
    fn subscribe(&self, subject: &str, capacity: usize) -> SubscribeFuture<'_> {
        let subscription = self.register(subject, capacity);
        Box::pin(async move { Ok(subscription) })
    }

    fn publish(&self, subject: &str, payload: Bytes) -> PublishFuture<'_> {
        self.publish_now(subject, &payload);
        Box::pin(async move { Ok(()) })
    }

    fn request(&self, subject: &str, payload: Bytes, timeout: Duration) -> RequestFuture<'_> {
        let owned_subject = String::from(subject);
        let inbox = self.next_inbox();
        let mut replies = self.register(&inbox, 1);
        let delivered = self.deliver(subject, &payload, Some(&inbox));

        Box::pin(async move {
            if delivered == 0 {
                return Err(BusError::RequestFailed {
                    subject: owned_subject,
                    message: String::from("no responders"),
                });
            }
            replies
                .wait(timeout)
                .await
                .map_err(|error| BusError::RequestFailed {
                    subject: owned_subject,
                    message: error.to_string(),
                })
        })
    }
}
