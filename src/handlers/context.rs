use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::info;

use crate::state::AppState;

/// Drop the accumulated conversation context and start a fresh session.
pub async fn reset_context(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.context.reset();
    info!("conversation context reset");
    Json(json!({ "status": "ok" }))
}
