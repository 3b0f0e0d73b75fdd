//! Data models for feedmix-ai

pub mod content_item;

pub use content_item::{ContentItem, ItemId, ItemStatus, PersonalizedResult, Platform};
