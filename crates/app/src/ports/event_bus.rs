//! Event bus port: publish/subscribe for change notifications.

use std::future::Future;

use shoplist_domain::event::Event;

/// Failure to hand an event to the bus.
///
/// Delivery problems of individual subscribers are not errors: they are
/// contained inside the bus.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The event could not be encoded for the wire.
    #[error("failed to encode event")]
    Encode(#[from] serde_json::Error),
}

/// Publishes change notifications to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), PublishError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), PublishError>> + Send {
        (**self).publish(event)
    }
}
