//! Client interface to the translation endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for `POST /api/translate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: String,
    #[serde(default = "default_target_language")]
    pub target_language: String,
}

fn default_target_language() -> String {
    "Hindi".to_string()
}

/// Success body for `POST /api/translate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub original_text: String,
    pub translated_text: String,
}

/// Failures from the translation endpoint, as surfaced to the user.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TranslationError {
    /// Transport-level failure reaching the endpoint.
    #[error("network error: {0}")]
    Network(String),
    /// Non-success HTTP status without a readable error body.
    #[error("translation request failed with status {0}")]
    Status(u16),
    /// Error reported in the response body. Takes precedence over the HTTP
    /// status: an `error` field fails the request even on a 200.
    #[error("{0}")]
    Service(String),
    /// Response body did not have the expected shape.
    #[error("malformed translation response")]
    MalformedResponse,
}

/// Interface to the translation service used by the pipeline. Abstract so
/// tests can substitute a scripted client.
#[async_trait::async_trait]
pub trait TranslationClient: Send + Sync {
    /// Translate `text` into the target language (display name, e.g.
    /// "Spanish").
    async fn translate(&self, text: &str, target_language: &str)
        -> Result<String, TranslationError>;

    /// Ask the service to discard its accumulated conversation context.
    async fn reset_context(&self) -> Result<(), TranslationError>;
}

/// HTTP implementation of [`TranslationClient`] against the carevoice
/// service endpoints.
pub struct HttpTranslationClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTranslationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl TranslationClient for HttpTranslationClient {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let request = TranslateRequest {
            text: text.to_string(),
            target_language: target_language.to_string(),
        };

        let response = self
            .http
            .post(format!("{}/api/translate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|err| TranslationError::Network(err.to_string()))?;

        let status = response.status().as_u16();
        let body: Value = response
            .json()
            .await
            .map_err(|_| TranslationError::MalformedResponse)?;

        parse_translate_response(status, &body)
    }

    async fn reset_context(&self) -> Result<(), TranslationError> {
        let response = self
            .http
            .post(format!("{}/api/reset-context", self.base_url))
            .send()
            .await
            .map_err(|err| TranslationError::Network(err.to_string()))?;

        if !response.status().is_success() {
            return Err(TranslationError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Interpret a translation response body. An `error` field always fails the
/// request, regardless of HTTP status.
pub(crate) fn parse_translate_response(
    status: u16,
    body: &Value,
) -> Result<String, TranslationError> {
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        return Err(TranslationError::Service(error.to_string()));
    }
    if !(200..300).contains(&status) {
        return Err(TranslationError::Status(status));
    }
    body.get("translatedText")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(TranslationError::MalformedResponse)
}
