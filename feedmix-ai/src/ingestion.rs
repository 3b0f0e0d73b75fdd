//! Ingestion: loading the initial item list into the store
//!
//! Real RSS/Atom fetching is out of scope. [`MockFeed`] stands in for it
//! with a fixed list of items.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use feedmix_common::{EventBus, FeedmixEvent, Result};
use tracing::{debug, info};

use crate::models::{ContentItem, Platform};
use crate::store::ItemStore;

/// Supplier of fully-formed items at session start
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Source name for logging
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<Vec<ContentItem>>;
}

/// Built-in static feed
#[derive(Debug, Clone, Default)]
pub struct MockFeed {
    delay: Option<Duration>,
}

impl MockFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate fetch latency
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay: Some(delay) }
    }

    pub fn items() -> Vec<ContentItem> {
        vec![
            ContentItem::new(
                "1",
                "La IA Generativa redefine el Arte Moderno",
                "Los nuevos modelos de difusión están permitiendo a los artistas explorar fronteras nunca antes vistas en la creación digital.",
                Platform::News,
                "https://picsum.photos/seed/ai-art/800/450",
            )
            .with_author("Art Daily")
            .with_timestamp("Hoy, 14:05 PM"),
            ContentItem::new(
                "2",
                "Gadgets que cambiarán tu 2024",
                "Desde anillos inteligentes hasta gafas de realidad mixta, esta es la lista definitiva de tecnología que debes conocer.",
                Platform::Rss,
                "https://picsum.photos/seed/gadget/800/450",
            )
            .with_author("Tech Cruncher")
            .with_timestamp("Hoy, 11:20 AM"),
            ContentItem::new(
                "3",
                "Recetas Minimalistas para el Trabajo",
                "Cómo preparar platos saludables en menos de 10 minutos para mantener tu energía durante el día.",
                Platform::News,
                "https://picsum.photos/seed/food/800/450",
            )
            .with_author("Chef Mode")
            .with_timestamp("Hoy, 09:45 AM"),
        ]
    }
}

#[async_trait]
impl FeedSource for MockFeed {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch(&self) -> Result<Vec<ContentItem>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(Self::items())
    }
}

/// Result of [`ingest_into_empty`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The store was empty and received this many items
    Inserted(usize),
    /// Items were already present; holds the current count
    AlreadyPopulated(usize),
}

/// Fetch from `source` and insert into `store`
///
/// Returns the number of items inserted. Duplicate ids fail the whole batch.
pub async fn ingest(store: &ItemStore, source: &dyn FeedSource, event_bus: &EventBus) -> Result<usize> {
    let items = source.fetch().await?;
    let count = store.insert_all(items).await?;
    announce(source, count, event_bus);
    Ok(count)
}

/// Load `source` into `store` once
///
/// A populated store is left alone. Concurrent callers race on the store's
/// write lock: one inserts, the others report the existing count.
pub async fn ingest_into_empty(
    store: &ItemStore,
    source: &dyn FeedSource,
    event_bus: &EventBus,
) -> Result<IngestOutcome> {
    if !store.is_empty().await {
        return Ok(IngestOutcome::AlreadyPopulated(store.len().await));
    }

    let items = source.fetch().await?;
    match store.insert_all_if_empty(items).await? {
        Some(count) => {
            announce(source, count, event_bus);
            Ok(IngestOutcome::Inserted(count))
        }
        None => {
            debug!(source = source.name(), "Store populated during fetch, discarding batch");
            Ok(IngestOutcome::AlreadyPopulated(store.len().await))
        }
    }
}

fn announce(source: &dyn FeedSource, count: usize, event_bus: &EventBus) {
    info!(source = source.name(), count, "Items ingested");
    event_bus.emit_lossy(FeedmixEvent::ItemsIngested {
        count,
        timestamp: Utc::now(),
    });
}
