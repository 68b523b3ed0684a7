//! Shared application state for axum handlers.

use std::sync::Arc;
use std::time::Duration;

use shoplist_app::event_hub::EventHub;
use shoplist_app::ports::{EventPublisher, ItemRepository, ListRepository};
use shoplist_app::services::item_service::ItemService;
use shoplist_app::services::list_service::ListService;

/// Write timeout applied to every websocket frame unless configured otherwise.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Application state shared across all axum handlers.
///
/// Generic over the repository types and the event publisher to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<LR, IR, P> {
    /// List use-cases.
    pub list_service: Arc<ListService<LR, P>>,
    /// Item use-cases.
    pub item_service: Arc<ItemService<LR, IR, P>>,
    /// Hub the websocket connections subscribe to.
    pub hub: EventHub,
    /// Upper bound for writing one frame to a websocket client.
    pub write_timeout: Duration,
}

impl<LR, IR, P> Clone for AppState<LR, IR, P> {
    fn clone(&self) -> Self {
        Self {
            list_service: Arc::clone(&self.list_service),
            item_service: Arc::clone(&self.item_service),
            hub: self.hub.clone(),
            write_timeout: self.write_timeout,
        }
    }
}

impl<LR, IR, P> AppState<LR, IR, P>
where
    LR: ListRepository + Send + Sync + 'static,
    IR: ItemRepository + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        list_service: ListService<LR, P>,
        item_service: ItemService<LR, IR, P>,
        hub: EventHub,
    ) -> Self {
        Self {
            list_service: Arc::new(list_service),
            item_service: Arc::new(item_service),
            hub,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    /// Override the websocket write timeout.
    #[must_use]
    pub fn with_write_timeout(mut self, write_timeout: Duration) -> Self {
        self.write_timeout = write_timeout;
        self
    }
}
