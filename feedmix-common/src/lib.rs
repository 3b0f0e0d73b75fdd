//! # feedmix Common Library
//!
//! Shared code for the feedmix services:
//! - Error types
//! - Configuration loading (TOML + environment)
//! - Event types (FeedmixEvent) and the EventBus
//! - Server-Sent Events helpers

pub mod config;
pub mod error;
pub mod events;
pub mod sse;

pub use error::{Error, Result};
pub use events::{EventBus, FeedmixEvent};
