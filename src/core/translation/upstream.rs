//! Upstream machine-translation backend.
//!
//! The service proxies translation to the Hugging Face inference API; the
//! trait keeps handlers testable without network access.

use std::time::Duration;

use serde_json::{Value, json};
use tracing::error;

/// Prefix added to guide the model toward medical phrasing.
pub const MEDICAL_CONTEXT_PREFIX: &str = "Medical translation: ";

/// Default Hugging Face inference endpoint base.
pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models/";

/// Slightly long timeout for the external inference API.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);

/// Failures talking to the upstream translation backend. The handler maps
/// these onto HTTP statuses (504 timeout, 503 unreachable, 500 otherwise).
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("translation service timed out")]
    Timeout,
    #[error("translation service unavailable: {0}")]
    Unavailable(String),
    #[error("translation service returned status {0}")]
    Status(u16),
    #[error("empty translation result")]
    EmptyResult,
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
    #[error("http client error: {0}")]
    Http(String),
}

/// Black-box translation backend: one model invocation per call.
#[async_trait::async_trait]
pub trait TranslationUpstream: Send + Sync {
    async fn translate(&self, model: &str, input: &str) -> Result<String, UpstreamError>;
}

/// Hugging Face inference API client.
pub struct HuggingFaceClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl HuggingFaceClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .map_err(|err| UpstreamError::Http(err.to_string()))?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }
}

#[async_trait::async_trait]
impl TranslationUpstream for HuggingFaceClient {
    async fn translate(&self, model: &str, input: &str) -> Result<String, UpstreamError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, model))
            .bearer_auth(&self.api_key)
            .json(&json!({ "inputs": input }))
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    UpstreamError::Timeout
                } else if err.is_connect() {
                    UpstreamError::Unavailable(err.to_string())
                } else {
                    UpstreamError::Http(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "inference API error");
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|err| UpstreamError::InvalidResponse(err.to_string()))?;
        parse_inference_output(&value)
    }
}

/// Extract translated text from an inference response. The API returns a
/// list of translation objects, occasionally a list of bare strings.
pub(crate) fn parse_inference_output(value: &Value) -> Result<String, UpstreamError> {
    let first = value
        .as_array()
        .and_then(|items| items.first())
        .ok_or_else(|| UpstreamError::InvalidResponse(format!("unexpected shape: {value}")))?;

    let text = if let Some(text) = first.get("translation_text").and_then(Value::as_str) {
        text
    } else if let Some(text) = first.as_str() {
        text
    } else {
        return Err(UpstreamError::InvalidResponse(format!(
            "unexpected item shape: {first}"
        )));
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(UpstreamError::EmptyResult);
    }
    Ok(text.to_string())
}
