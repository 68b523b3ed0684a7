//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod events;
#[allow(clippy::missing_errors_doc)]
pub mod items;
#[allow(clippy::missing_errors_doc)]
pub mod lists;

use axum::Router;
use axum::routing::{get, patch, post};

use shoplist_app::ports::{EventPublisher, ItemRepository, ListRepository};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<LR, IR, P>() -> Router<AppState<LR, IR, P>>
where
    LR: ListRepository + Send + Sync + 'static,
    IR: ItemRepository + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    Router::new()
        // Lists
        .route(
            "/lists",
            get(lists::list::<LR, IR, P>).post(lists::create::<LR, IR, P>),
        )
        .route(
            "/lists/{list_id}",
            get(lists::get::<LR, IR, P>).patch(lists::update::<LR, IR, P>),
        )
        // Items
        .route(
            "/lists/{list_id}/items",
            get(items::list::<LR, IR, P>).post(items::create::<LR, IR, P>),
        )
        .route("/lists/{list_id}/items/tree", get(items::tree::<LR, IR, P>))
        .route(
            "/lists/{list_id}/items/{item_id}",
            patch(items::update::<LR, IR, P>).delete(items::delete::<LR, IR, P>),
        )
        .route(
            "/lists/{list_id}/items/{item_id}/move",
            post(items::move_item::<LR, IR, P>),
        )
        // Push channel
        .route("/events", get(events::subscribe::<LR, IR, P>))
}
