//! feedmix-ai library interface
//!
//! Item store, generative transform clients, the personalization pipeline,
//! and the HTTP API that exposes them.

pub mod api;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use feedmix_common::EventBus;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::ingestion::FeedSource;
use crate::pipeline::PersonalizationPipeline;
use crate::store::ItemStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: ItemStore,
    pub pipeline: PersonalizationPipeline,
    /// Supplies items for `POST /feeds/extract`
    pub feed: Arc<dyn FeedSource>,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        store: ItemStore,
        pipeline: PersonalizationPipeline,
        feed: Arc<dyn FeedSource>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            store,
            pipeline,
            feed,
            event_bus,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .merge(api::item_routes())
        .merge(api::personalize_routes())
        .merge(api::feed_routes())
        .merge(api::health_routes())
        .route("/events", get(api::event_stream))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
