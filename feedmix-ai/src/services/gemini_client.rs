//! Gemini `generateContent` REST client
//!
//! Thin transport shared by the text and image transform clients. Knows the
//! wire format and HTTP status handling, nothing about prompts.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::TransformError;

const USER_AGENT: &str = concat!("feedmix/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "x-goog-api-key";

/// `generateContent` request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Single user turn made of `parts`
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One content part: text, inline binary data, or (in responses) both absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64 payload plus its MIME type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: String,
    pub data: String,
}

/// `generateContent` response body (only the fields we read)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Parts of the first candidate (empty if there is none)
    pub fn first_candidate_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or(&[])
    }

    /// Concatenated text parts of the first candidate, `None` if blank
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .first_candidate_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline payload of the first candidate
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.first_candidate_parts()
            .iter()
            .find_map(|p| p.inline_data.as_ref())
    }
}

/// Connection settings for [`GeminiClient`]
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Gemini REST client
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Result<Self, TransformError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| TransformError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key,
        })
    }

    /// Underlying HTTP client (also used to fetch source images)
    pub fn http(&self) -> &reqwest::Client {
        &self.http_client
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, TransformError> {
        tracing::debug!(model = model, "Calling generateContent");

        let response = self
            .http_client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| TransformError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransformError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| TransformError::MalformedResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest::from_parts(vec![
            Part::inline_data("image/jpeg", "QUJD"),
            Part::text("make it vibrant"),
        ]);
        let json = serde_json::to_value(&request).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "QUJD");
        assert!(parts[0].get("text").is_none());
        assert_eq!(parts[1]["text"], "make it vibrant");
        assert_eq!(json["contents"][0]["role"], "user");
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_blank_or_missing_text_is_none() {
        let blank: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#)
                .unwrap();
        assert!(blank.text().is_none());

        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.text().is_none());
        assert!(empty.first_inline_data().is_none());
    }

    #[test]
    fn test_first_inline_data_skips_text_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"here you go"},
                {"inlineData":{"mimeType":"image/png","data":"Zmlyc3Q="}},
                {"inlineData":{"mimeType":"image/png","data":"c2Vjb25k"}}
            ]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_inline_data().unwrap().data, "Zmlyc3Q=");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new(GeminiSettings {
            api_key: "k".into(),
            base_url: "http://localhost:1234/".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        assert_eq!(
            client.endpoint("gemini-test"),
            "http://localhost:1234/v1beta/models/gemini-test:generateContent"
        );
    }
}
