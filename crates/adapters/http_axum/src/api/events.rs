//! Websocket push channel for change notifications.

use axum::extract::State;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::StreamExt;

use shoplist_app::event_hub::EventHub;
use shoplist_app::ports::{EventPublisher, ItemRepository, ListRepository};

use crate::push;
use crate::state::AppState;

/// `GET /api/events`: upgrade to a websocket receiving every event.
///
/// Each message is a JSON text frame such as
/// `{"type":"ITEMS_IN_LIST_CHANGED","listID":"…"}`. Only events published
/// after the upgrade are delivered.
pub async fn subscribe<LR, IR, P>(
    State(state): State<AppState<LR, IR, P>>,
    ws: WebSocketUpgrade,
) -> Response
where
    LR: ListRepository + Send + Sync + 'static,
    IR: ItemRepository + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    let hub = state.hub.clone();
    let write_timeout = state.write_timeout;
    ws.on_upgrade(move |socket| session(socket, hub, write_timeout))
}

async fn session(socket: WebSocket, hub: EventHub, write_timeout: std::time::Duration) {
    let subscription = hub.subscribe();
    let subscriber = subscription.id();
    tracing::info!(%subscriber, "websocket client connected");

    let (sink, stream) = socket.split();
    let reason = push::run(sink, stream, subscription, write_timeout).await;

    tracing::info!(%subscriber, %reason, "websocket client disconnected");
}
