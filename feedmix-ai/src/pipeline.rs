//! Personalization pipeline
//!
//! Runs the two-stage transform for one item:
//! `AwaitingText → AwaitingImage → Done`. The image stage always receives
//! the text stage's output, fallback included, and is always attempted.
//!
//! One run at a time per pipeline instance. The processing token is an
//! explicit [`PipelineState`] owned by the pipeline and released by a guard
//! on every exit path (success, store error, panic, or the future being
//! dropped mid-flight).

use std::sync::{Arc, Mutex};

use chrono::Utc;
use feedmix_common::{Error, EventBus, FeedmixEvent};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{ItemId, PersonalizedResult};
use crate::services::{or_fallback, ImageTransformer, TextTransformer, TEXT_FALLBACK};
use crate::store::ItemStore;

/// Processing token
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Processing(ItemId),
}

impl PipelineState {
    /// Wire name used by the status endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Processing(_) => "processing",
        }
    }

    pub fn processing_id(&self) -> Option<&ItemId> {
        match self {
            PipelineState::Idle => None,
            PipelineState::Processing(id) => Some(id),
        }
    }
}

/// Position within a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingText,
    AwaitingImage,
    Done,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    /// Another run holds the token (global, not per item)
    #[error("Personalization already running for item {processing}")]
    Busy { processing: ItemId },

    #[error(transparent)]
    Store(#[from] Error),
}

/// Resets the token to `Idle` when dropped
struct ProcessingGuard {
    state: Arc<Mutex<PipelineState>>,
    item_id: ItemId,
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *state = PipelineState::Idle;
        debug!(item_id = %self.item_id, "Processing token released");
    }
}

#[derive(Clone)]
pub struct PersonalizationPipeline {
    store: ItemStore,
    text: Arc<dyn TextTransformer>,
    image: Arc<dyn ImageTransformer>,
    event_bus: EventBus,
    state: Arc<Mutex<PipelineState>>,
}

impl PersonalizationPipeline {
    pub fn new(
        store: ItemStore,
        text: Arc<dyn TextTransformer>,
        image: Arc<dyn ImageTransformer>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            store,
            text,
            image,
            event_bus,
            state: Arc::new(Mutex::new(PipelineState::Idle)),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn processing_id(&self) -> Option<ItemId> {
        self.state().processing_id().cloned()
    }

    fn acquire(&self, id: &ItemId) -> Result<ProcessingGuard, PipelineError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let PipelineState::Processing(current) = &*state {
            return Err(PipelineError::Busy {
                processing: current.clone(),
            });
        }
        *state = PipelineState::Processing(id.clone());
        Ok(ProcessingGuard {
            state: Arc::clone(&self.state),
            item_id: id.clone(),
        })
    }

    /// Personalize one item and commit the result to the store
    ///
    /// Stage failures degrade (fallback text, original image) rather than
    /// fail. Errors are only `NotFound`, `Busy`, or a store failure on commit.
    pub async fn run(&self, id: &ItemId) -> Result<PersonalizedResult, PipelineError> {
        let item = self.store.get(id).await.map_err(|e| match e {
            Error::NotFound(_) => PipelineError::NotFound(id.clone()),
            other => PipelineError::Store(other),
        })?;

        let guard = self.acquire(id)?;
        info!(item_id = %id, "Personalization started");
        self.event_bus.emit_lossy(FeedmixEvent::PersonalizationStarted {
            item_id: id.to_string(),
            timestamp: Utc::now(),
        });

        debug!(item_id = %id, stage = ?Stage::AwaitingText, "Pipeline stage");
        let text_result = self
            .text
            .transform(&item.title, &item.summary, &item.user_context)
            .await;
        let (text, degraded_text) = or_fallback("text", text_result, || TEXT_FALLBACK.to_string());

        debug!(item_id = %id, stage = ?Stage::AwaitingImage, "Pipeline stage");
        let image_result = self
            .image
            .transform(&item.source_image_reference, &text)
            .await;
        let (image_reference, degraded_image) =
            or_fallback("image", image_result, || item.source_image_reference.clone());

        let result = PersonalizedResult {
            text,
            image_reference,
        };
        self.store.set_personalized_result(id, result.clone()).await?;

        debug!(item_id = %id, stage = ?Stage::Done, "Pipeline stage");
        drop(guard);

        info!(
            item_id = %id,
            degraded_text,
            degraded_image,
            "Personalization completed"
        );
        self.event_bus.emit_lossy(FeedmixEvent::PersonalizationCompleted {
            item_id: id.to_string(),
            degraded_text,
            degraded_image,
            timestamp: Utc::now(),
        });

        Ok(result)
    }
}
