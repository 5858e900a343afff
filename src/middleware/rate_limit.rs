//! Fixed-window rate limiting for the translate endpoint.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use parking_lot::Mutex;

use crate::errors::AppError;
use crate::state::AppState;

struct Window {
    count: u32,
    reset_at: Instant,
}

/// Per-client fixed-window request counter.
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Per-minute limiter, the translate endpoint policy.
    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    /// Record a request for `key` and report whether it is allowed.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock();
        // Expired windows are dropped on every check; the key space is
        // client-controlled and must not accumulate.
        windows.retain(|_, window| now <= window.reset_at);

        let entry = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            reset_at: now + self.window,
        });

        if entry.count >= self.limit {
            return false;
        }
        entry.count += 1;
        true
    }
}

/// Rate limiting middleware for the translate endpoint.
///
/// Clients are keyed by the first `x-forwarded-for` entry, with a shared
/// fallback key when the header is absent (direct connections, tests).
/// Returns 429 with an `{"error": ...}` body when the window is exhausted.
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.config.rate_limit_enabled {
        return Ok(next.run(request).await);
    }

    let client = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| "direct".to_string());

    if !state.rate_limiter.check(&client) {
        return Err(AppError::TooManyRequests(
            "Rate limit exceeded. Please try again later.".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
