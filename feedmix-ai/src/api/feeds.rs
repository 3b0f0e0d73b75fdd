//! Feed extraction handler
//!
//! POST /feeds/extract

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use crate::{
    error::ApiResult,
    ingestion::{self, IngestOutcome},
    AppState,
};

/// POST /feeds/extract response
#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    /// Items in the store after the call
    pub count: usize,
    /// True when items were already present and nothing was inserted
    pub already_extracted: bool,
}

/// POST /feeds/extract
///
/// Loads the configured feed into an empty store. Repeated or concurrent
/// calls report the existing count.
pub async fn extract_feed(State(state): State<AppState>) -> ApiResult<Json<ExtractResponse>> {
    let outcome =
        ingestion::ingest_into_empty(&state.store, state.feed.as_ref(), &state.event_bus).await?;

    let response = match outcome {
        IngestOutcome::Inserted(count) => ExtractResponse {
            count,
            already_extracted: false,
        },
        IngestOutcome::AlreadyPopulated(count) => ExtractResponse {
            count,
            already_extracted: true,
        },
    };
    Ok(Json(response))
}

/// Build feed routes
pub fn feed_routes() -> Router<AppState> {
    Router::new().route("/feeds/extract", post(extract_feed))
}
