//! Text transform client: rewrites an item as a social-media post

use async_trait::async_trait;

use super::gemini_client::{GenerateContentRequest, Part};
use super::{or_fallback, GeminiClient, TransformError};

/// Post text returned whenever the text stage fails
pub const TEXT_FALLBACK: &str = "Could not generate the post text.";

/// Produces a rewritten post from source text and user context
#[async_trait]
pub trait TextTransformer: Send + Sync {
    async fn transform(
        &self,
        title: &str,
        summary: &str,
        context: &str,
    ) -> Result<String, TransformError>;

    /// Never fails: any error becomes [`TEXT_FALLBACK`]
    async fn transform_or_fallback(&self, title: &str, summary: &str, context: &str) -> String {
        let result = self.transform(title, summary, context).await;
        or_fallback("text", result, || TEXT_FALLBACK.to_string()).0
    }
}

/// Prompt sent to the text model
pub fn build_prompt(title: &str, summary: &str, context: &str) -> String {
    format!(
        "You are a social media expert. Based on this news/article:\n\
         Title: {title}\n\
         Summary: {summary}\n\
         \n\
         And this additional user context/modification: \"{context}\"\n\
         \n\
         Create a highly engaging social media post. Include emojis and relevant hashtags."
    )
}

/// [`TextTransformer`] backed by a Gemini text model
#[derive(Debug, Clone)]
pub struct GeminiTextTransformer {
    client: GeminiClient,
    model: String,
}

impl GeminiTextTransformer {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl TextTransformer for GeminiTextTransformer {
    async fn transform(
        &self,
        title: &str,
        summary: &str,
        context: &str,
    ) -> Result<String, TransformError> {
        let request =
            GenerateContentRequest::from_parts(vec![Part::text(build_prompt(title, summary, context))]);

        let response = self.client.generate_content(&self.model, &request).await?;

        let text = response
            .text()
            .ok_or_else(|| TransformError::MalformedResponse("response contained no text".into()))?;

        tracing::info!(model = %self.model, chars = text.len(), "Post text generated");
        Ok(text)
    }
}
