//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod item_service;
pub mod list_service;

use shoplist_domain::event::Event;

use crate::ports::EventPublisher;

/// Publish `event` on a detached task.
///
/// The mutation that triggered the event has already succeeded, so the
/// caller never waits for the outcome. Failures are only logged.
fn publish_detached<P>(publisher: &P, event: Event)
where
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    let list_id = event.list_id();
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        tracing::warn!(%list_id, "no runtime available, event not published");
        return;
    };
    let publisher = publisher.clone();
    runtime.spawn(async move {
        if let Err(err) = publisher.publish(event).await {
            tracing::error!(error = %err, %list_id, "error during publish");
        }
    });
}
