//! Event types and EventBus for feedmix
//!
//! Events tell a presentation layer when to re-read the item store. They are
//! broadcast over a `tokio::sync::broadcast` channel and serialized for SSE.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// feedmix event types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeedmixEvent {
    /// Ingestion loaded items into the store
    ItemsIngested {
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// User context text changed for an item
    ItemContextUpdated {
        item_id: String,
        timestamp: DateTime<Utc>,
    },

    /// Save flag changed for an item
    ItemSavedChanged {
        item_id: String,
        saved: bool,
        timestamp: DateTime<Utc>,
    },

    /// Pipeline took the processing token for an item
    PersonalizationStarted {
        item_id: String,
        timestamp: DateTime<Utc>,
    },

    /// Pipeline committed a result and released the token
    ///
    /// The degraded flags mark which stage fell back.
    PersonalizationCompleted {
        item_id: String,
        degraded_text: bool,
        degraded_image: bool,
        timestamp: DateTime<Utc>,
    },
}

impl FeedmixEvent {
    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            FeedmixEvent::ItemsIngested { .. } => "ItemsIngested",
            FeedmixEvent::ItemContextUpdated { .. } => "ItemContextUpdated",
            FeedmixEvent::ItemSavedChanged { .. } => "ItemSavedChanged",
            FeedmixEvent::PersonalizationStarted { .. } => "PersonalizationStarted",
            FeedmixEvent::PersonalizationCompleted { .. } => "PersonalizationCompleted",
        }
    }
}

/// Broadcast bus for [`FeedmixEvent`]
///
/// Cloning shares the same channel. Slow subscribers lose the oldest events
/// once the channel capacity is exceeded.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<FeedmixEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<FeedmixEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: FeedmixEvent) {
        let _ = self.tx.send(event);
    }
}
