//! HTTP API handlers for feedmix-ai
//!
//! The operations a presentation layer needs: list/filter items, edit
//! context and save flags, trigger personalization, and follow changes via SSE.

pub mod feeds;
pub mod health;
pub mod items;
pub mod personalize;
pub mod sse;

pub use feeds::feed_routes;
pub use health::health_routes;
pub use items::item_routes;
pub use personalize::personalize_routes;
pub use sse::event_stream;
