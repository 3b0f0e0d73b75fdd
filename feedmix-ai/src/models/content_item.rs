//! Content item data model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable item identifier, assigned at ingestion and never reused
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Where the item came from (informational only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Rss,
    News,
    Youtube,
    Tiktok,
    Facebook,
}

/// Editorial status carried from the source feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Approved,
    Published,
}

/// Output of one personalization run
///
/// Always a complete pair: a failed image stage still yields the source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalizedResult {
    pub text: String,
    pub image_reference: String,
}

/// One piece of content eligible for personalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ItemId,
    pub title: String,
    pub summary: String,
    pub platform: Platform,
    pub source_image_reference: String,

    /// Display timestamp as supplied by the feed
    pub timestamp: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<u64>,
    #[serde(default)]
    pub status: ItemStatus,

    /// Free-text instructions for the text stage; empty when unset
    #[serde(default)]
    pub user_context: String,
    #[serde(default)]
    pub personalized_result: Option<PersonalizedResult>,
    #[serde(default)]
    pub is_saved: bool,
}

impl ContentItem {
    /// New item with empty user state
    pub fn new(
        id: impl Into<ItemId>,
        title: impl Into<String>,
        summary: impl Into<String>,
        platform: Platform,
        source_image_reference: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: summary.into(),
            platform,
            source_image_reference: source_image_reference.into(),
            timestamp: String::new(),
            author: String::new(),
            duration: None,
            tags: Vec::new(),
            likes: None,
            comments: None,
            status: ItemStatus::default(),
            user_context: String::new(),
            personalized_result: None,
            is_saved: false,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn with_saved(mut self, saved: bool) -> Self {
        self.is_saved = saved;
        self
    }
}
