//! Item API handlers
//!
//! GET /items, GET /items/:id, PUT /items/:id/context,
//! PUT /items/:id/saved, POST /items/:id/saved/toggle

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use feedmix_common::FeedmixEvent;
use serde::Deserialize;

use crate::{
    error::ApiResult,
    models::{ContentItem, ItemId},
    store::ViewFilter,
    AppState,
};

/// GET /items query
#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    #[serde(default)]
    pub view: ViewFilter,
}

/// PUT /items/:id/context request
#[derive(Debug, Deserialize)]
pub struct SetContextRequest {
    pub context: String,
}

/// PUT /items/:id/saved request
#[derive(Debug, Deserialize)]
pub struct SetSavedRequest {
    pub saved: bool,
}

/// GET /items?view=all|saved
///
/// Items in ingestion order.
pub async fn list_items(
    State(state): State<AppState>,
    query: Result<Query<ListItemsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ContentItem>>> {
    let Query(query) = query?;
    Ok(Json(state.store.view(query.view).await))
}

/// GET /items/:id
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ContentItem>> {
    Ok(Json(state.store.get(&ItemId::new(id)).await?))
}

/// PUT /items/:id/context
pub async fn set_context(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<SetContextRequest>, JsonRejection>,
) -> ApiResult<Json<ContentItem>> {
    let Json(request) = request?;
    let id = ItemId::new(id);
    state.store.set_context(&id, request.context).await?;

    tracing::debug!(item_id = %id, "Context updated");
    state.event_bus.emit_lossy(FeedmixEvent::ItemContextUpdated {
        item_id: id.to_string(),
        timestamp: Utc::now(),
    });

    Ok(Json(state.store.get(&id).await?))
}

/// PUT /items/:id/saved
pub async fn set_saved(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<SetSavedRequest>, JsonRejection>,
) -> ApiResult<Json<ContentItem>> {
    let Json(request) = request?;
    let id = ItemId::new(id);
    state.store.set_saved(&id, request.saved).await?;
    emit_saved(&state, &id, request.saved);
    Ok(Json(state.store.get(&id).await?))
}

/// POST /items/:id/saved/toggle
pub async fn toggle_saved(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ContentItem>> {
    let id = ItemId::new(id);
    let saved = state.store.toggle_saved(&id).await?;
    emit_saved(&state, &id, saved);
    Ok(Json(state.store.get(&id).await?))
}

fn emit_saved(state: &AppState, id: &ItemId, saved: bool) {
    tracing::debug!(item_id = %id, saved, "Save flag updated");
    state.event_bus.emit_lossy(FeedmixEvent::ItemSavedChanged {
        item_id: id.to_string(),
        saved,
        timestamp: Utc::now(),
    });
}

/// Build item routes
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items))
        .route("/items/:id", get(get_item))
        .route("/items/:id/context", put(set_context))
        .route("/items/:id/saved", put(set_saved))
        .route("/items/:id/saved/toggle", post(toggle_saved))
}
