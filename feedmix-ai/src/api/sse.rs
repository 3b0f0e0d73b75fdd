//! SSE endpoint
//!
//! GET /events streams every `FeedmixEvent` so clients know when to re-read items.

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;

use crate::AppState;

/// GET /events
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    feedmix_common::sse::create_event_sse_stream("feedmix-ai", &state.event_bus)
}
