use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::core::context::ContextStore;
use crate::core::translation::upstream::{HuggingFaceClient, TranslationUpstream};
use crate::middleware::rate_limit::RateLimiter;

/// Application state that can be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    /// Upstream machine-translation backend
    pub upstream: Arc<dyn TranslationUpstream>,
    /// Server-held conversation context
    pub context: Arc<ContextStore>,
    /// Fixed-window limiter for the translate endpoint
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Arc<Self>, Box<dyn std::error::Error>> {
        let api_key = config.huggingface_api_key.clone().unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!(
                "HUGGINGFACE_API_KEY not set; upstream requests will be unauthenticated"
            );
        }
        let upstream = HuggingFaceClient::new(api_key, config.huggingface_api_url.clone())
            .map_err(|err| err.to_string())?;

        Ok(Self::with_upstream(config, Arc::new(upstream)))
    }

    /// Build state around an arbitrary upstream; tests substitute a stub.
    pub fn with_upstream(config: ServerConfig, upstream: Arc<dyn TranslationUpstream>) -> Arc<Self> {
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_per_minute,
            Duration::from_secs(60),
        ));
        Arc::new(Self {
            config,
            upstream,
            context: Arc::new(ContextStore::new()),
            rate_limiter,
        })
    }
}
