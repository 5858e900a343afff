use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{context, models, translate};
use crate::middleware::rate_limit_middleware;
use crate::state::AppState;

/// Create the JSON API router.
///
/// Only `/translate` is rate limited; listing models and resetting context
/// are cheap and safe to call freely.
pub fn create_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/translate",
            post(translate::translate).layer(middleware::from_fn_with_state(
                state,
                rate_limit_middleware,
            )),
        )
        .route("/models", get(models::list_models))
        .route("/reset-context", post(context::reset_context))
        .layer(TraceLayer::new_for_http())
}
