//! JSON handlers for the items of a list.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use shoplist_app::ports::{EventPublisher, ItemRepository, ListRepository};
use shoplist_domain::error::ValidationError;
use shoplist_domain::id::{ItemId, ListId};
use shoplist_domain::item::{Item, ItemPatch, Placement};
use shoplist_domain::tree::ItemNode;

use crate::error::{ApiError, parse_id};
use crate::state::AppState;

/// Exact order key as exposed to clients.
#[derive(Debug, Serialize)]
pub struct OrderBody {
    pub numerator: u64,
    pub denominator: u64,
}

/// Item as exposed to clients.
#[derive(Debug, Serialize)]
pub struct ItemBody {
    pub id: ItemId,
    pub text: String,
    pub checked: bool,
    pub parent: Option<ItemId>,
    pub list: ListId,
    /// Float projection of the order key.
    pub sort: f64,
    pub order: OrderBody,
}

impl From<Item> for ItemBody {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            text: item.text,
            checked: item.checked,
            parent: item.parent_id,
            list: item.list_id,
            sort: item.order_key.as_f64(),
            order: OrderBody {
                numerator: item.order_key.numerator(),
                denominator: item.order_key.denominator(),
            },
        }
    }
}

/// Item with its nested children.
#[derive(Debug, Serialize)]
pub struct ItemNodeBody {
    #[serde(flatten)]
    pub item: ItemBody,
    pub children: Vec<ItemNodeBody>,
}

impl From<ItemNode> for ItemNodeBody {
    fn from(node: ItemNode) -> Self {
        Self {
            item: node.item.into(),
            children: node.children.into_iter().map(Self::from).collect(),
        }
    }
}

/// Request body for creating an item.
#[derive(Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub text: String,
    /// Place the new item right after this one instead of at the end.
    pub after: Option<String>,
}

/// Request body for updating an item.
#[derive(Deserialize)]
pub struct UpdateItemRequest {
    pub text: Option<String>,
    pub checked: Option<bool>,
}

/// Request body for moving an item. Exactly one field must be set.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveItemRequest {
    pub after_id: Option<String>,
    pub parent_id: Option<String>,
}

impl MoveItemRequest {
    fn placement(&self) -> Result<Placement, ApiError> {
        match (&self.after_id, &self.parent_id) {
            (Some(after), None) => Ok(Placement::After(parse_id("item", after)?)),
            (None, Some(parent)) => Ok(Placement::FirstChildOf(parse_id("item", parent)?)),
            _ => Err(ValidationError::AmbiguousPlacement.into()),
        }
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ItemBody>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the tree endpoint.
pub enum TreeResponse {
    Ok(Json<Vec<ItemNodeBody>>),
}

impl IntoResponse for TreeResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the update and move endpoints.
pub enum ItemResponse {
    Ok(Json<ItemBody>),
}

impl IntoResponse for ItemResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<ItemBody>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

fn parse_path(list_id: &str, item_id: &str) -> Result<(ListId, ItemId), ApiError> {
    Ok((parse_id("list", list_id)?, parse_id("item", item_id)?))
}

/// `GET /api/lists/:list_id/items`
pub async fn list<LR, IR, P>(
    State(state): State<AppState<LR, IR, P>>,
    Path(list_id): Path<String>,
) -> Result<ListResponse, ApiError>
where
    LR: ListRepository + Send + Sync + 'static,
    IR: ItemRepository + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    let list_id: ListId = parse_id("list", &list_id)?;
    let items = state.item_service.list_items(list_id).await?;
    Ok(ListResponse::Ok(Json(
        items.into_iter().map(ItemBody::from).collect(),
    )))
}

/// `GET /api/lists/:list_id/items/tree`
pub async fn tree<LR, IR, P>(
    State(state): State<AppState<LR, IR, P>>,
    Path(list_id): Path<String>,
) -> Result<TreeResponse, ApiError>
where
    LR: ListRepository + Send + Sync + 'static,
    IR: ItemRepository + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    let list_id: ListId = parse_id("list", &list_id)?;
    let nodes = state.item_service.item_tree(list_id).await?;
    Ok(TreeResponse::Ok(Json(
        nodes.into_iter().map(ItemNodeBody::from).collect(),
    )))
}

/// `POST /api/lists/:list_id/items`
pub async fn create<LR, IR, P>(
    State(state): State<AppState<LR, IR, P>>,
    Path(list_id): Path<String>,
    Json(req): Json<CreateItemRequest>,
) -> Result<CreateResponse, ApiError>
where
    LR: ListRepository + Send + Sync + 'static,
    IR: ItemRepository + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    let list_id: ListId = parse_id("list", &list_id)?;
    let after = req
        .after
        .as_deref()
        .map(|id| parse_id::<ItemId>("item", id))
        .transpose()?;
    let item = state
        .item_service
        .create_item(list_id, req.text, after)
        .await?;
    Ok(CreateResponse::Created(Json(item.into())))
}

/// `PATCH /api/lists/:list_id/items/:item_id`
pub async fn update<LR, IR, P>(
    State(state): State<AppState<LR, IR, P>>,
    Path((list_id, item_id)): Path<(String, String)>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<ItemResponse, ApiError>
where
    LR: ListRepository + Send + Sync + 'static,
    IR: ItemRepository + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    let (list_id, item_id) = parse_path(&list_id, &item_id)?;
    let patch = ItemPatch {
        text: req.text,
        checked: req.checked,
    };
    let item = state
        .item_service
        .update_item(list_id, item_id, patch)
        .await?;
    Ok(ItemResponse::Ok(Json(item.into())))
}

/// `POST /api/lists/:list_id/items/:item_id/move`
pub async fn move_item<LR, IR, P>(
    State(state): State<AppState<LR, IR, P>>,
    Path((list_id, item_id)): Path<(String, String)>,
    Json(req): Json<MoveItemRequest>,
) -> Result<ItemResponse, ApiError>
where
    LR: ListRepository + Send + Sync + 'static,
    IR: ItemRepository + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    let (list_id, item_id) = parse_path(&list_id, &item_id)?;
    let placement = req.placement()?;
    let item = state
        .item_service
        .move_item(list_id, item_id, placement)
        .await?;
    Ok(ItemResponse::Ok(Json(item.into())))
}

/// `DELETE /api/lists/:list_id/items/:item_id`
pub async fn delete<LR, IR, P>(
    State(state): State<AppState<LR, IR, P>>,
    Path((list_id, item_id)): Path<(String, String)>,
) -> Result<DeleteResponse, ApiError>
where
    LR: ListRepository + Send + Sync + 'static,
    IR: ItemRepository + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    let (list_id, item_id) = parse_path(&list_id, &item_id)?;
    state.item_service.delete_item(list_id, item_id).await?;
    Ok(DeleteResponse::NoContent)
}
