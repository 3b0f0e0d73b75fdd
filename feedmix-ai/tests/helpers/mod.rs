//! Shared test helpers: scripted transformers and an in-process mock
//! of the Gemini REST API.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::Notify;

use feedmix_ai::models::{ContentItem, Platform};
use feedmix_ai::services::{
    GeminiClient, GeminiSettings, ImageTransformer, TextTransformer, TransformError,
};

// ============================================================================
// Items
// ============================================================================

pub fn test_item(id: &str) -> ContentItem {
    ContentItem::new(
        id,
        format!("Title {}", id),
        format!("Summary {}", id),
        Platform::News,
        format!("https://images.test/{}.jpg", id),
    )
}

// ============================================================================
// Scripted transformers
// ============================================================================

/// Text stage returning queued results in order (last one repeats)
pub struct ScriptedText {
    results: Mutex<Vec<Result<String, TransformError>>>,
    pub calls: Mutex<Vec<(String, String, String)>>,
}

impl ScriptedText {
    pub fn new(results: Vec<Result<String, TransformError>>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn ok(text: &str) -> Arc<Self> {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn failing(err: TransformError) -> Arc<Self> {
        Self::new(vec![Err(err)])
    }
}

#[async_trait]
impl TextTransformer for ScriptedText {
    async fn transform(
        &self,
        title: &str,
        summary: &str,
        context: &str,
    ) -> Result<String, TransformError> {
        self.calls
            .lock()
            .unwrap()
            .push((title.to_string(), summary.to_string(), context.to_string()));
        let mut results = self.results.lock().unwrap();
        if results.len() > 1 {
            results.remove(0)
        } else {
            results[0].clone()
        }
    }
}

/// Image stage that records its inputs
pub struct RecordingImage {
    result: Result<String, TransformError>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl RecordingImage {
    pub fn ok(reference: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(reference.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: TransformError) -> Arc<Self> {
        Arc::new(Self {
            result: Err(err),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn targets(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }
}

#[async_trait]
impl ImageTransformer for RecordingImage {
    async fn transform(
        &self,
        source_image_reference: &str,
        target_text: &str,
    ) -> Result<String, TransformError> {
        self.calls
            .lock()
            .unwrap()
            .push((source_image_reference.to_string(), target_text.to_string()));
        self.result.clone()
    }
}

/// Text stage that blocks until released, to hold the processing token
pub struct GatedText {
    pub entered: Notify,
    pub release: Notify,
}

impl GatedText {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            release: Notify::new(),
        })
    }
}

#[async_trait]
impl TextTransformer for GatedText {
    async fn transform(&self, _: &str, _: &str, _: &str) -> Result<String, TransformError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok("gated post".to_string())
    }
}

/// Text stage that breaks its own contract by panicking
pub struct PanickingText;

#[async_trait]
impl TextTransformer for PanickingText {
    async fn transform(&self, _: &str, _: &str, _: &str) -> Result<String, TransformError> {
        panic!("text transformer exploded");
    }
}

// ============================================================================
// Mock Gemini server
// ============================================================================

pub const SOURCE_IMAGE_BYTES: &[u8] = b"\x89PNG-source-bytes";
pub const GENERATED_IMAGE_B64: &str = "R0VORVJBVEVE";

/// One recorded generateContent call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
pub struct MockGemini {
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
}

/// Behavior is keyed by model name:
/// - `text-ok`: text reply
/// - `text-empty`: candidate with no parts
/// - `text-error`: 500
/// - `image-ok`: text part followed by an inline image
/// - `image-none`: text-only reply
/// - `*-hang`: no reply for 30s
async fn generate_content(
    State(mock): State<MockGemini>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let model = model_action
        .strip_suffix(":generateContent")
        .unwrap_or(&model_action)
        .to_string();

    mock.calls.lock().unwrap().push(RecordedCall {
        model: model.clone(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    if model.ends_with("-hang") {
        tokio::time::sleep(Duration::from_secs(30)).await;
    }

    match model.as_str() {
        "text-ok" => (
            StatusCode::OK,
            Json(json!({"candidates":[{"content":{"parts":[{"text":"Fresh post 🚀 #ai"}]}}]})),
        ),
        "text-empty" => (
            StatusCode::OK,
            Json(json!({"candidates":[{"content":{"parts":[]}}]})),
        ),
        "image-ok" => (
            StatusCode::OK,
            Json(json!({"candidates":[{"content":{"parts":[
                {"text":"Here is your image"},
                {"inlineData":{"mimeType":"image/png","data":GENERATED_IMAGE_B64}}
            ]}}]})),
        ),
        "image-none" => (
            StatusCode::OK,
            Json(json!({"candidates":[{"content":{"parts":[{"text":"I cannot edit images"}]}}]})),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error":{"code":500,"message":"backend exploded"}})),
        ),
    }
}

async fn source_image() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], SOURCE_IMAGE_BYTES)
}

async fn missing_image() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}

/// Start the mock on an ephemeral port; returns its base URL
pub async fn spawn_mock_gemini(mock: MockGemini) -> String {
    let app = Router::new()
        .route("/v1beta/models/:model_action", post(generate_content))
        .route("/images/source.png", get(source_image))
        .route("/images/missing.png", get(missing_image))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub fn gemini_client(base_url: &str) -> GeminiClient {
    gemini_client_with_timeout(base_url, Duration::from_secs(5))
}

pub fn gemini_client_with_timeout(base_url: &str, timeout: Duration) -> GeminiClient {
    GeminiClient::new(GeminiSettings {
        api_key: "test-key".to_string(),
        base_url: base_url.to_string(),
        timeout,
    })
    .unwrap()
}
