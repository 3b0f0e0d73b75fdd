//! Personalization API handlers
//!
//! POST /items/:id/personalize, GET /personalize/status

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::{
    error::ApiResult,
    models::{ItemId, PersonalizedResult},
    AppState,
};

/// POST /items/:id/personalize response
#[derive(Debug, Serialize)]
pub struct PersonalizeResponse {
    pub item_id: ItemId,
    pub result: PersonalizedResult,
}

/// GET /personalize/status response
#[derive(Debug, Serialize)]
pub struct PersonalizeStatusResponse {
    /// "idle" or "processing"
    pub state: &'static str,
    pub processing_id: Option<ItemId>,
}

/// POST /items/:id/personalize
///
/// Runs the pipeline in the request task and returns the committed result.
/// 404 for an unknown id, 409 while another run holds the processing token.
pub async fn personalize_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PersonalizeResponse>> {
    let id = ItemId::new(id);
    let result = state.pipeline.run(&id).await?;
    Ok(Json(PersonalizeResponse {
        item_id: id,
        result,
    }))
}

/// GET /personalize/status
pub async fn personalize_status(State(state): State<AppState>) -> Json<PersonalizeStatusResponse> {
    let current = state.pipeline.state();
    Json(PersonalizeStatusResponse {
        state: current.as_str(),
        processing_id: current.processing_id().cloned(),
    })
}

/// Build personalization routes
pub fn personalize_routes() -> Router<AppState> {
    Router::new()
        .route("/items/:id/personalize", post(personalize_item))
        .route("/personalize/status", get(personalize_status))
}
