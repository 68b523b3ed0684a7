//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use shoplist_app::ports::{EventPublisher, ItemRepository, ListRepository};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api`. Includes a [`TraceLayer`] that logs each
/// HTTP request/response at the `DEBUG` level using the `tracing` ecosystem.
pub fn build<LR, IR, P>(state: AppState<LR, IR, P>) -> Router
where
    LR: ListRepository + Send + Sync + 'static,
    IR: ItemRepository + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use futures::StreamExt;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use shoplist_app::event_hub::EventHub;
    use shoplist_app::services::item_service::ItemService;
    use shoplist_app::services::list_service::ListService;
    use shoplist_domain::error::ShoppingListError;
    use shoplist_domain::event::Event;
    use shoplist_domain::id::{ItemId, ListId};
    use shoplist_domain::item::Item;
    use shoplist_domain::list::{List, ListStatus};
    use shoplist_domain::order_key::OrderKey;

    use super::*;

    #[derive(Default)]
    struct MemoryLists(Mutex<HashMap<ListId, List>>);

    #[derive(Default)]
    struct MemoryItems(Mutex<HashMap<ItemId, Item>>);

    impl ListRepository for MemoryLists {
        fn create(&self, list: List) -> impl Future<Output = Result<List, ShoppingListError>> + Send {
            self.0.lock().unwrap().insert(list.id, list.clone());
            async { Ok(list) }
        }

        fn get_by_id(
            &self,
            id: ListId,
        ) -> impl Future<Output = Result<Option<List>, ShoppingListError>> + Send {
            let found = self.0.lock().unwrap().get(&id).cloned();
            async { Ok(found) }
        }

        fn get_all(&self) -> impl Future<Output = Result<Vec<List>, ShoppingListError>> + Send {
            let all = self.0.lock().unwrap().values().cloned().collect();
            async { Ok(all) }
        }

        fn update_status(
            &self,
            id: ListId,
            status: ListStatus,
        ) -> impl Future<Output = Result<(), ShoppingListError>> + Send {
            if let Some(list) = self.0.lock().unwrap().get_mut(&id) {
                list.status = status;
            }
            async { Ok(()) }
        }
    }

    impl ItemRepository for MemoryItems {
        fn find_all_by_list(
            &self,
            list_id: ListId,
        ) -> impl Future<Output = Result<Vec<Item>, ShoppingListError>> + Send {
            let mut items: Vec<Item> = self
                .0
                .lock()
                .unwrap()
                .values()
                .filter(|item| item.list_id == list_id)
                .cloned()
                .collect();
            items.sort_by(|a, b| a.order_key.cmp(&b.order_key).then(a.id.cmp(&b.id)));
            async { Ok(items) }
        }

        fn find_by_id(
            &self,
            id: ItemId,
        ) -> impl Future<Output = Result<Option<Item>, ShoppingListError>> + Send {
            let found = self.0.lock().unwrap().get(&id).cloned();
            async { Ok(found) }
        }

        fn create(&self, item: Item) -> impl Future<Output = Result<Item, ShoppingListError>> + Send {
            self.0.lock().unwrap().insert(item.id, item.clone());
            async { Ok(item) }
        }

        fn update_text(
            &self,
            id: ItemId,
            text: String,
        ) -> impl Future<Output = Result<(), ShoppingListError>> + Send {
            if let Some(item) = self.0.lock().unwrap().get_mut(&id) {
                item.text = text;
            }
            async { Ok(()) }
        }

        fn update_checked(
            &self,
            id: ItemId,
            checked: bool,
        ) -> impl Future<Output = Result<(), ShoppingListError>> + Send {
            if let Some(item) = self.0.lock().unwrap().get_mut(&id) {
                item.checked = checked;
            }
            async { Ok(()) }
        }

        fn set_parent_and_order(
            &self,
            id: ItemId,
            parent_id: Option<ItemId>,
            order_key: OrderKey,
        ) -> impl Future<Output = Result<(), ShoppingListError>> + Send {
            if let Some(item) = self.0.lock().unwrap().get_mut(&id) {
                item.parent_id = parent_id;
                item.order_key = order_key;
            }
            async { Ok(()) }
        }

        fn delete(&self, id: ItemId) -> impl Future<Output = Result<(), ShoppingListError>> + Send {
            self.0.lock().unwrap().remove(&id);
            async { Ok(()) }
        }
    }

    fn app() -> Router {
        app_with_hub(EventHub::new())
    }

    fn app_with_hub(hub: EventHub) -> Router {
        let lists = Arc::new(MemoryLists::default());
        let items = MemoryItems::default();
        build(AppState::new(
            ListService::new(Arc::clone(&lists), hub.clone()),
            ItemService::new(lists, items, hub.clone()),
            hub,
        ))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let app = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_create_list_and_update_status() {
        let app = app();
        let (status, list) = send(&app, "POST", "/api/lists", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(list["status"], "todo");
        let id = list["id"].as_str().unwrap();

        let (status, updated) = send(
            &app,
            "PATCH",
            &format!("/api/lists/{id}"),
            Some(json!({ "status": "inprogress" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "inprogress");
    }

    #[tokio::test]
    async fn should_reject_unknown_status() {
        let app = app();
        let (_, list) = send(&app, "POST", "/api/lists", None).await;
        let id = list["id"].as_str().unwrap();

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/api/lists/{id}"),
            Some(json!({ "status": "bought" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("bought"));
    }

    #[tokio::test]
    async fn should_return_bad_request_for_malformed_id() {
        let app = app();
        let (status, _) = send(&app, "GET", "/api/lists/nope", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_list() {
        let app = app();
        let uri = format!("/api/lists/{}/items", ListId::new());
        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_conflict_for_cycle() {
        let app = app();
        let (_, list) = send(&app, "POST", "/api/lists", None).await;
        let items_uri = format!("/api/lists/{}/items", list["id"].as_str().unwrap());
        let (_, parent) = send(&app, "POST", &items_uri, Some(json!({ "text": "p" }))).await;
        let (_, child) = send(&app, "POST", &items_uri, Some(json!({ "text": "c" }))).await;
        let parent_id = parent["id"].as_str().unwrap();
        let child_id = child["id"].as_str().unwrap();

        let (status, _) = send(
            &app,
            "POST",
            &format!("{items_uri}/{child_id}/move"),
            Some(json!({ "parentId": parent_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            "POST",
            &format!("{items_uri}/{parent_id}/move"),
            Some(json!({ "parentId": child_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn should_reject_move_without_exactly_one_target() {
        let app = app();
        let (_, list) = send(&app, "POST", "/api/lists", None).await;
        let items_uri = format!("/api/lists/{}/items", list["id"].as_str().unwrap());
        let (_, item) = send(&app, "POST", &items_uri, Some(json!({ "text": "a" }))).await;
        let item_id = item["id"].as_str().unwrap();

        let (status, _) = send(
            &app,
            "POST",
            &format!("{items_uri}/{item_id}/move"),
            Some(json!({})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_refuse_plain_request_to_push_channel() {
        let app = app();
        let (status, _) = send(&app, "GET", "/api/events", None).await;
        assert!(status.is_client_error());
    }

    async fn wait_for_subscribers(hub: &EventHub, expected: usize) {
        for _ in 0..100 {
            if hub.subscriber_count() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {expected} subscribers, found {}",
            hub.subscriber_count()
        );
    }

    #[tokio::test]
    async fn should_stream_events_to_websocket_client_until_it_closes() {
        let hub = EventHub::new();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(axum::serve(listener, app_with_hub(hub.clone())).into_future());

        let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/api/events"))
            .await
            .unwrap();
        wait_for_subscribers(&hub, 1).await;

        let list_id = ListId::new();
        hub.broadcast(&Event::ItemsInListChanged { list_id }).unwrap();
        let frame = tokio::time::timeout(Duration::from_secs(1), socket.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let event: Event = serde_json::from_str(&frame.into_text().unwrap()).unwrap();
        assert_eq!(event, Event::ItemsInListChanged { list_id });

        socket.close(None).await.unwrap();
        wait_for_subscribers(&hub, 0).await;
        server.abort();
    }
}
