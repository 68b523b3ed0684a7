//! JSON handlers for lists.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use shoplist_app::ports::{EventPublisher, ItemRepository, ListRepository};
use shoplist_domain::id::ListId;
use shoplist_domain::list::{List, ListStatus};

use crate::error::{ApiError, parse_id};
use crate::state::AppState;

/// Request body for changing a list's status.
#[derive(Deserialize)]
pub struct UpdateListRequest {
    pub status: String,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<List>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and update endpoints.
pub enum GetResponse {
    Ok(Json<List>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<List>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/lists`
pub async fn list<LR, IR, P>(
    State(state): State<AppState<LR, IR, P>>,
) -> Result<ListResponse, ApiError>
where
    LR: ListRepository + Send + Sync + 'static,
    IR: ItemRepository + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    let lists = state.list_service.list_lists().await?;
    Ok(ListResponse::Ok(Json(lists)))
}

/// `POST /api/lists`
pub async fn create<LR, IR, P>(
    State(state): State<AppState<LR, IR, P>>,
) -> Result<CreateResponse, ApiError>
where
    LR: ListRepository + Send + Sync + 'static,
    IR: ItemRepository + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    let list = state.list_service.create_list().await?;
    Ok(CreateResponse::Created(Json(list)))
}

/// `GET /api/lists/:list_id`
pub async fn get<LR, IR, P>(
    State(state): State<AppState<LR, IR, P>>,
    Path(list_id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    LR: ListRepository + Send + Sync + 'static,
    IR: ItemRepository + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    let list_id: ListId = parse_id("list", &list_id)?;
    let list = state.list_service.get_list(list_id).await?;
    Ok(GetResponse::Ok(Json(list)))
}

/// `PATCH /api/lists/:list_id`
pub async fn update<LR, IR, P>(
    State(state): State<AppState<LR, IR, P>>,
    Path(list_id): Path<String>,
    Json(req): Json<UpdateListRequest>,
) -> Result<GetResponse, ApiError>
where
    LR: ListRepository + Send + Sync + 'static,
    IR: ItemRepository + Send + Sync + 'static,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    let list_id: ListId = parse_id("list", &list_id)?;
    let status = ListStatus::from_str(&req.status)?;
    let list = state.list_service.update_status(list_id, status).await?;
    Ok(GetResponse::Ok(Json(list)))
}
