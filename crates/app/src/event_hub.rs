//! In-process event hub fanning change notifications out to live subscribers.
//!
//! Every subscriber owns a bounded mailbox. Publishing never waits: an event
//! that does not fit into a full mailbox is dropped for that subscriber only.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use shoplist_domain::event::Event;

use crate::ports::{EventPublisher, PublishError};

/// Number of undelivered events a subscriber may have pending.
pub const MAILBOX_CAPACITY: usize = 16;

/// An event already encoded for the wire, shared by all mailboxes.
pub type Message = Arc<str>;

/// Handle identifying one subscriber inside the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    subscribers: Mutex<HashMap<SubscriberId, mpsc::Sender<Message>>>,
}

impl Registry {
    fn lock(&self) -> MutexGuard<'_, HashMap<SubscriberId, mpsc::Sender<Message>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Process-wide publish/subscribe registry.
///
/// Cloning is cheap and every clone shares the same subscribers. The
/// registry is only reachable through [`subscribe`](Self::subscribe),
/// [`broadcast`](Self::broadcast) and dropping a [`Subscription`].
#[derive(Clone, Default)]
pub struct EventHub {
    registry: Arc<Registry>,
}

/// Result of one broadcast pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: usize,
    pub dropped: usize,
}

impl EventHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber with an empty mailbox.
    ///
    /// The subscriber only sees events published after this call. It stays
    /// registered until the returned [`Subscription`] is dropped.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let id = SubscriberId(self.registry.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, mailbox) = mpsc::channel(MAILBOX_CAPACITY);
        self.registry.lock().insert(id, sender);
        tracing::debug!(subscriber = %id, "subscriber registered");
        Subscription {
            id,
            mailbox,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Encode `event` once and offer it to every mailbox without blocking.
    ///
    /// The registry lock is held for the whole pass, so subscribers joining
    /// or leaving wait until the fan-out is done.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Encode`] if the event cannot be serialized.
    /// Full mailboxes are not an error.
    pub fn broadcast(&self, event: &Event) -> Result<Delivery, PublishError> {
        let message: Message = serde_json::to_string(event)?.into();
        let mut delivery = Delivery::default();

        let mut subscribers = self.registry.lock();
        subscribers.retain(|id, sender| match sender.try_send(Arc::clone(&message)) {
            Ok(()) => {
                delivery.delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!(subscriber = %id, "mailbox full, event dropped");
                delivery.dropped += 1;
                true
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(subscriber = %id, "mailbox closed, removing subscriber");
                false
            }
        });
        drop(subscribers);

        tracing::info!(
            list_id = %event.list_id(),
            delivered = delivery.delivered,
            dropped = delivery.dropped,
            "event published"
        );
        Ok(delivery)
    }
}

impl EventPublisher for EventHub {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), PublishError>> + Send {
        let result = self.broadcast(&event).map(|_| ());
        async move { result }
    }
}

/// A registered subscriber and its private mailbox.
///
/// Dropping the subscription removes it from the hub.
pub struct Subscription {
    id: SubscriberId,
    mailbox: mpsc::Receiver<Message>,
    registry: Weak<Registry>,
}

impl Subscription {
    #[must_use]
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next event.
    ///
    /// Returns `None` once the hub itself is gone.
    pub async fn recv(&mut self) -> Option<Message> {
        self.mailbox.recv().await
    }

    /// Take the next pending event, if any, without waiting.
    pub fn try_recv(&mut self) -> Option<Message> {
        self.mailbox.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().remove(&self.id);
            tracing::debug!(subscriber = %self.id, "subscriber removed");
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
