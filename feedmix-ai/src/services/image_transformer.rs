//! Image transform client: re-renders an item's image to match new text
//!
//! Steps: fetch the source image, send it inline (base64) with an editing
//! instruction, return the first inline image of the reply as a data URI.
//! Any failure maps to the source reference via `transform_or_original`.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::gemini_client::{GenerateContentRequest, Part};
use super::{or_fallback, GeminiClient, TransformError};

/// MIME type sent when the source does not declare an image type
const DEFAULT_SOURCE_MIME: &str = "image/jpeg";

/// MIME type assumed for a returned payload without one
const DEFAULT_RESULT_MIME: &str = "image/png";

/// Produces a re-rendered image reference
#[async_trait]
pub trait ImageTransformer: Send + Sync {
    async fn transform(
        &self,
        source_image_reference: &str,
        target_text: &str,
    ) -> Result<String, TransformError>;

    /// Never fails: any error yields `source_image_reference` unchanged
    async fn transform_or_original(&self, source_image_reference: &str, target_text: &str) -> String {
        let result = self.transform(source_image_reference, target_text).await;
        or_fallback("image", result, || source_image_reference.to_string()).0
    }
}

/// Editing instruction sent alongside the image
pub fn build_instruction(target_text: &str) -> String {
    format!(
        "Re-imagine this image to match this new social media post content: \"{target_text}\". \
         Maintain the style but make it more vibrant and aligned with the topic."
    )
}

/// Format a base64 payload as a data URI
pub fn to_data_uri(mime_type: &str, base64_data: &str) -> String {
    let mime = if mime_type.is_empty() {
        DEFAULT_RESULT_MIME
    } else {
        mime_type
    };
    format!("data:{};base64,{}", mime, base64_data)
}

/// Split a `data:<mime>;base64,<payload>` URI
fn parse_data_uri(reference: &str) -> Option<(&str, &str)> {
    let rest = reference.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    Some((mime, payload))
}

/// Keep `image/*` content types (parameters stripped), else use the default
fn source_mime(content_type: Option<&str>) -> String {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or(DEFAULT_SOURCE_MIME)
        .to_string()
}

/// [`ImageTransformer`] backed by a Gemini image model
#[derive(Debug, Clone)]
pub struct GeminiImageTransformer {
    client: GeminiClient,
    model: String,
}

impl GeminiImageTransformer {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Source image as `(mime_type, base64 payload)`
    async fn fetch_source(&self, reference: &str) -> Result<(String, String), TransformError> {
        if let Some((mime, payload)) = parse_data_uri(reference) {
            return Ok((source_mime(Some(mime)), payload.to_string()));
        }

        let response = self
            .client
            .http()
            .get(reference)
            .send()
            .await
            .map_err(|e| TransformError::Transport(format!("image fetch failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransformError::Status {
                status: status.as_u16(),
                body: format!("image fetch failed for {}", reference),
            });
        }

        let mime = source_mime(
            response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransformError::Transport(format!("image read failed: {}", e)))?;

        tracing::debug!(bytes = bytes.len(), mime = %mime, "Source image fetched");
        Ok((mime, STANDARD.encode(&bytes)))
    }
}

#[async_trait]
impl ImageTransformer for GeminiImageTransformer {
    async fn transform(
        &self,
        source_image_reference: &str,
        target_text: &str,
    ) -> Result<String, TransformError> {
        let (mime, data) = self.fetch_source(source_image_reference).await?;

        let request = GenerateContentRequest::from_parts(vec![
            Part::inline_data(mime, data),
            Part::text(build_instruction(target_text)),
        ]);

        let response = self.client.generate_content(&self.model, &request).await?;

        let inline = response.first_inline_data().ok_or_else(|| {
            TransformError::MalformedResponse("response contained no inline image".into())
        })?;

        tracing::info!(model = %self.model, mime = %inline.mime_type, "Image re-rendered");
        Ok(to_data_uri(&inline.mime_type, &inline.data))
    }
}
