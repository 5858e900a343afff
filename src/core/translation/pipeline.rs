//! Debounced translation request pipeline.
//!
//! Finalized transcript text arrives faster than it is worth translating, so
//! each submission cancels the previously scheduled dispatch and reschedules
//! after a quiet interval; only the latest full text survives a burst. A
//! dispatched request is never cancelled, but a monotone sequence number
//! keeps a stale response from overwriting a newer one.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::client::TranslationClient;
use super::highlight::{HighlightSpan, find_highlights};

/// Quiet interval for debouncing bursts of finalized speech.
pub const QUIET_INTERVAL: Duration = Duration::from_millis(500);

/// Fixed placeholder shown in place of a translation after a failure.
pub const UNAVAILABLE_PLACEHOLDER: &str = "Translation unavailable. Please try again.";

/// Notifications from the pipeline, in display order.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A request was dispatched: show the loading indicator, clear the prior
    /// translation and any error banner.
    TranslationStarted,
    /// A translation arrived: display it, enable playback.
    TranslationReady {
        text: String,
        highlights: Vec<HighlightSpan>,
        turn: u64,
    },
    /// The request failed: show the banner, display the placeholder, disable
    /// playback.
    TranslationFailed { reason: String },
    /// The server confirmed the conversation context was discarded.
    ContextReset,
    /// The context reset request failed; the local counter is untouched.
    ContextResetFailed { reason: String },
}

/// Type alias for pipeline event callbacks
pub type PipelineEventCallback =
    Arc<dyn Fn(PipelineEvent) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

struct PipelineInner {
    client: Arc<dyn TranslationClient>,
    target_language: Mutex<String>,
    /// Last submitted transcript text, kept for the manual retry action.
    last_text: Mutex<String>,
    /// The scheduled-but-not-yet-dispatched debounce timer.
    pending: Mutex<Option<JoinHandle<()>>>,
    /// Sequence number of the most recent dispatch.
    dispatch_seq: AtomicU64,
    /// Conversation turn counter, mirroring the server-held context.
    turns: AtomicU64,
    events: Mutex<Option<PipelineEventCallback>>,
}

/// Converts finalized transcript text into displayed translations with
/// minimal redundant traffic. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct TranslationPipeline {
    inner: Arc<PipelineInner>,
}

impl TranslationPipeline {
    pub fn new(client: Arc<dyn TranslationClient>, target_language: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(PipelineInner {
                client,
                target_language: Mutex::new(target_language.into()),
                last_text: Mutex::new(String::new()),
                pending: Mutex::new(None),
                dispatch_seq: AtomicU64::new(0),
                turns: AtomicU64::new(0),
                events: Mutex::new(None),
            }),
        }
    }

    /// Register a callback for pipeline events.
    pub fn on_event(&self, callback: PipelineEventCallback) {
        *self.inner.events.lock() = Some(callback);
    }

    /// Schedule a translation of `text` after the quiet interval, superseding
    /// any not-yet-dispatched submission. Empty or whitespace-only text is a
    /// no-op.
    pub fn submit(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        *self.inner.last_text.lock() = text.to_string();

        let pipeline = self.clone();
        let text = text.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(QUIET_INTERVAL).await;
            // Detach the dispatch: once the quiet interval has elapsed, a
            // newer submission may only supersede the response, not cancel
            // the in-flight request.
            tokio::spawn(async move {
                pipeline.dispatch(text).await;
            });
        });
        if let Some(prev) = self.inner.pending.lock().replace(handle) {
            prev.abort();
        }
    }

    /// Resubmit the last known transcript text (the banner's retry action).
    pub fn retry(&self) {
        let text = self.inner.last_text.lock().clone();
        if !text.is_empty() {
            self.submit(&text);
        }
    }

    /// Cancel any scheduled dispatch (explicit stop, navigation, page
    /// hidden).
    pub fn cancel_pending(&self) {
        if let Some(handle) = self.inner.pending.lock().take() {
            handle.abort();
        }
    }

    /// Target language used by the next dispatch.
    pub fn set_target_language(&self, language: &str) {
        *self.inner.target_language.lock() = language.to_string();
    }

    pub fn target_language(&self) -> String {
        self.inner.target_language.lock().clone()
    }

    /// Current conversation turn count.
    pub fn turns(&self) -> u64 {
        self.inner.turns.load(Ordering::Acquire)
    }

    /// Ask the server to discard accumulated conversation context. The local
    /// turn counter resets only once the server confirms.
    pub async fn reset_context(&self) {
        match self.inner.client.reset_context().await {
            Ok(()) => {
                self.inner.turns.store(0, Ordering::Release);
                self.emit(PipelineEvent::ContextReset).await;
            }
            Err(err) => {
                warn!(%err, "context reset failed");
                self.emit(PipelineEvent::ContextResetFailed {
                    reason: err.to_string(),
                })
                .await;
            }
        }
    }

    async fn dispatch(&self, text: String) {
        let seq = self.inner.dispatch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let target = self.inner.target_language.lock().clone();

        self.emit(PipelineEvent::TranslationStarted).await;
        let result = self.inner.client.translate(&text, &target).await;

        // A newer request was dispatched while this one was in flight; its
        // outcome wins regardless of arrival order.
        if self.inner.dispatch_seq.load(Ordering::SeqCst) != seq {
            debug!(seq, "dropping stale translation response");
            return;
        }

        match result {
            Ok(translated) => {
                let turn = self.inner.turns.fetch_add(1, Ordering::SeqCst) + 1;
                let highlights = find_highlights(&translated);
                self.emit(PipelineEvent::TranslationReady {
                    text: translated,
                    highlights,
                    turn,
                })
                .await;
            }
            Err(err) => {
                warn!(%err, "translation request failed");
                self.emit(PipelineEvent::TranslationFailed {
                    reason: err.to_string(),
                })
                .await;
            }
        }
    }

    async fn emit(&self, event: PipelineEvent) {
        let callback = self.inner.events.lock().clone();
        if let Some(callback) = callback {
            callback(event).await;
        }
    }
}
