use std::sync::Arc;

use axum::{Json, extract::State};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::core::translation::{
    MEDICAL_CONTEXT_PREFIX, TranslateRequest, TranslateResponse, UpstreamError,
    model_for_language,
};
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Upper bound on request text in characters, matching the widget's input
/// limits.
const MAX_TEXT_LENGTH: usize = 5000;

/// Translate handler
/// Proxies one utterance to the inference backend and records the turn.
pub async fn translate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TranslateRequest>,
) -> AppResult<Json<TranslateResponse>> {
    let text = request.text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::BadRequest("No text provided".to_string()));
    }
    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(AppError::BadRequest(
            "Invalid text format or size".to_string(),
        ));
    }

    let model = model_for_language(&request.target_language).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unsupported target language: {}",
            request.target_language
        ))
    })?;

    // Log a short content hash instead of the utterance itself.
    info!(
        chars = text.len(),
        target = %request.target_language,
        text_hash = %short_hash(&text),
        "translation request"
    );

    let input = format!("{MEDICAL_CONTEXT_PREFIX}{text}");
    let translated = state
        .upstream
        .translate(model, &input)
        .await
        .map_err(map_upstream_error)?;

    let turn = state.context.record_turn();
    debug!(turn, "conversation turn recorded");

    Ok(Json(TranslateResponse {
        original_text: text,
        translated_text: translated,
    }))
}

fn map_upstream_error(err: UpstreamError) -> AppError {
    match err {
        UpstreamError::Timeout => {
            AppError::GatewayTimeout("Translation service timed out".to_string())
        }
        UpstreamError::Unavailable(_) => {
            AppError::ServiceUnavailable("Translation service unavailable".to_string())
        }
        UpstreamError::Status(_) => {
            AppError::InternalServerError("Translation service error".to_string())
        }
        UpstreamError::EmptyResult => {
            AppError::InternalServerError("Empty translation result".to_string())
        }
        UpstreamError::InvalidResponse(_) | UpstreamError::Http(_) => {
            AppError::InternalServerError("An error occurred during translation".to_string())
        }
    }
}

/// First eight hex characters of the utterance's SHA-256 digest.
fn short_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    digest
        .iter()
        .take(4)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
