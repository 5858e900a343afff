use axum::response::Json;
use serde_json::{Value, json};

use crate::core::translation::{PROVIDER_NAME, available_languages};

/// List the target languages the service can translate into.
pub async fn list_models() -> Json<Value> {
    Json(json!({
        "availableLanguages": available_languages(),
        "provider": PROVIDER_NAME,
    }))
}
