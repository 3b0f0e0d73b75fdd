//! Generative service clients
//!
//! Both transform clients surface a typed [`TransformError`]. Substitution of
//! the fallback value happens one layer up ([`or_fallback`]), so callers
//! always receive a usable value while the failure cause is still logged.

pub mod gemini_client;
pub mod image_transformer;
pub mod text_transformer;

pub use gemini_client::{GeminiClient, GeminiSettings};
pub use image_transformer::{GeminiImageTransformer, ImageTransformer};
pub use text_transformer::{GeminiTextTransformer, TextTransformer, TEXT_FALLBACK};

use thiserror::Error;

/// Failure of a generative service call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Service unreachable, timed out, or connection dropped
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response
    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx response without the expected payload
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Collapse a stage result into a usable value
///
/// Returns `(value, degraded)`; `degraded` is true when `fallback` was used.
pub fn or_fallback(
    stage: &'static str,
    result: Result<String, TransformError>,
    fallback: impl FnOnce() -> String,
) -> (String, bool) {
    match result {
        Ok(value) => (value, false),
        Err(e) => {
            tracing::warn!(stage = stage, error = %e, "Generative call failed, using fallback");
            (fallback(), true)
        }
    }
}
