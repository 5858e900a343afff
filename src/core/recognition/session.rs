//! Recognition session manager.
//!
//! Drives a continuous recognition session and keeps it alive across
//! transient failures without user intervention, up to a bounded number of
//! restart attempts. All timers are spawned tasks whose `JoinHandle`s are
//! aborted on explicit stop, so the session never leaves a restart pending
//! after the user has given up.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::events::{SessionEvent, SessionEventCallback};
use super::provider::{
    RecognitionError, RecognitionErrorCallback, RecognitionLifecycleCallback, RecognitionProvider,
    RecognitionResult, RecognitionUpdate, RecognitionUpdateCallback,
};
use super::transcript::Transcript;

/// Maximum automatic restart attempts before the session gives up.
pub const MAX_RESTART_ATTEMPTS: u32 = 3;

/// Delay before each restart attempt, to avoid tight-looping against a
/// failing backend.
pub const RESTART_DELAY: Duration = Duration::from_secs(1);

/// Settling delay after a language change before the session restarts with
/// the new locale.
pub const LANGUAGE_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Lifecycle state of a recognition session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not recording; ready to start.
    Idle,
    /// A recognition session is live.
    Listening,
    /// The session was lost while recording; a restart is scheduled.
    Recovering,
    /// Recovery was exhausted; explicit user action is required.
    Stopped,
    /// Permission was denied; recording is disabled until re-granted.
    Disabled,
}

/// Type alias for the finalized-text callback feeding downstream consumers
/// (the translation pipeline).
pub type FinalizedTextCallback =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

struct SessionInner {
    provider: tokio::sync::Mutex<Box<dyn RecognitionProvider>>,
    status: Mutex<SessionState>,
    /// User intent: true between start() and stop()/failure.
    recording: AtomicBool,
    restart_attempts: AtomicU32,
    language: Mutex<String>,
    /// Pending restart or language-settle timer.
    pending_restart: Mutex<Option<JoinHandle<()>>>,
    transcript: Mutex<Transcript>,
    events: Mutex<Option<SessionEventCallback>>,
    on_finalized: Mutex<Option<FinalizedTextCallback>>,
}

/// Manages one continuous recognition session over a black-box provider.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct RecognitionSession {
    inner: Arc<SessionInner>,
}

impl RecognitionSession {
    pub fn new(provider: Box<dyn RecognitionProvider>, language: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                provider: tokio::sync::Mutex::new(provider),
                status: Mutex::new(SessionState::Idle),
                recording: AtomicBool::new(false),
                restart_attempts: AtomicU32::new(0),
                language: Mutex::new(language.into()),
                pending_restart: Mutex::new(None),
                transcript: Mutex::new(Transcript::new()),
                events: Mutex::new(None),
                on_finalized: Mutex::new(None),
            }),
        }
    }

    /// Register the session's handlers on the underlying provider.
    ///
    /// Must be called once before `start()`.
    pub async fn bind(&self) -> RecognitionResult<()> {
        let session = self.clone();
        let started: RecognitionLifecycleCallback = Arc::new(move || {
            let session = session.clone();
            Box::pin(async move {
                session.handle_started().await;
            })
        });

        let session = self.clone();
        let update: RecognitionUpdateCallback = Arc::new(move |update| {
            let session = session.clone();
            Box::pin(async move {
                session.handle_update(update).await;
            })
        });

        let session = self.clone();
        let errored: RecognitionErrorCallback = Arc::new(move |err| {
            let session = session.clone();
            Box::pin(async move {
                session.handle_error(err).await;
            })
        });

        let session = self.clone();
        let ended: RecognitionLifecycleCallback = Arc::new(move || {
            let session = session.clone();
            Box::pin(async move {
                session.handle_ended().await;
            })
        });

        let mut provider = self.inner.provider.lock().await;
        provider.on_started(started).await?;
        provider.on_update(update).await?;
        provider.on_error(errored).await?;
        provider.on_ended(ended).await?;
        Ok(())
    }

    /// Register a callback for session events.
    pub fn on_event(&self, callback: SessionEventCallback) {
        *self.inner.events.lock() = Some(callback);
    }

    /// Register a callback invoked with the full finalized transcript each
    /// time a new finalized segment arrives.
    pub fn on_finalized_text(&self, callback: FinalizedTextCallback) {
        *self.inner.on_finalized.lock() = Some(callback);
    }

    /// Start a new recording. Clears the transcript from any prior session.
    pub async fn start(&self) -> RecognitionResult<()> {
        if self.state() == SessionState::Disabled {
            return Err(RecognitionError::PermissionDenied(
                "recording is disabled".to_string(),
            ));
        }

        self.cancel_pending_restart();
        self.inner.transcript.lock().clear();
        self.emit_transcript().await;

        self.inner.recording.store(true, Ordering::Release);
        self.inner.restart_attempts.store(0, Ordering::Release);

        let language = self.inner.language.lock().clone();
        let result = {
            let mut provider = self.inner.provider.lock().await;
            provider.set_language(&language).await?;
            provider.start().await
        };

        if let Err(err) = result {
            warn!(%err, "failed to start recognition");
            self.inner.recording.store(false, Ordering::Release);
            return Err(err);
        }
        Ok(())
    }

    /// Stop recording. Cancels any pending restart and returns the session
    /// to `Idle`.
    pub async fn stop(&self) {
        self.inner.recording.store(false, Ordering::Release);
        self.cancel_pending_restart();

        if let Err(err) = self.inner.provider.lock().await.stop().await {
            warn!(%err, "error stopping recognition");
        }

        if self.state() != SessionState::Disabled {
            self.set_status(SessionState::Idle).await;
        }
    }

    /// The page-hidden handler: identical to an explicit stop.
    pub async fn page_hidden(&self) {
        self.stop().await;
    }

    /// The unload handler: identical to an explicit stop.
    pub async fn shutdown(&self) {
        self.stop().await;
    }

    /// Change the recognition locale. Takes effect on the next session; if
    /// currently recording, forces a stop/restart cycle with a short settling
    /// delay so the new locale applies.
    pub async fn set_language(&self, language: &str) -> RecognitionResult<()> {
        *self.inner.language.lock() = language.to_string();
        {
            let mut provider = self.inner.provider.lock().await;
            provider.set_language(language).await?;
        }

        if self.inner.recording.load(Ordering::Acquire) {
            self.inner.recording.store(false, Ordering::Release);
            self.cancel_pending_restart();
            if let Err(err) = self.inner.provider.lock().await.stop().await {
                warn!(%err, "error stopping recognition for language change");
            }

            let session = self.clone();
            let handle = tokio::spawn(async move {
                tokio::time::sleep(LANGUAGE_SETTLE_DELAY).await;
                let result = session.inner.provider.lock().await.start().await;
                if let Err(err) = result {
                    warn!(%err, "failed to restart recognition after language change");
                }
            });
            self.replace_pending_restart(handle);
        }
        Ok(())
    }

    /// Clear the accumulated transcript.
    pub async fn clear_transcript(&self) {
        self.inner.transcript.lock().clear();
        self.emit_transcript().await;
    }

    /// Re-enable recording after microphone permission has been re-granted.
    pub async fn reset_permission(&self) {
        if self.state() == SessionState::Disabled {
            self.emit(SessionEvent::PermissionChanged { granted: true })
                .await;
            self.set_status(SessionState::Idle).await;
        }
    }

    pub fn state(&self) -> SessionState {
        *self.inner.status.lock()
    }

    pub fn restart_attempts(&self) -> u32 {
        self.inner.restart_attempts.load(Ordering::Acquire)
    }

    /// Snapshot of the current transcript.
    pub fn transcript(&self) -> Transcript {
        self.inner.transcript.lock().clone()
    }

    async fn handle_started(&self) {
        self.inner.recording.store(true, Ordering::Release);
        self.inner.restart_attempts.store(0, Ordering::Release);
        self.set_status(SessionState::Listening).await;
    }

    async fn handle_update(&self, update: RecognitionUpdate) {
        let finalized_text = {
            let mut transcript = self.inner.transcript.lock();
            if update.is_final {
                transcript.push_final(&update.transcript);
                Some(transcript.text_for_translation())
            } else {
                transcript.set_interim(&update.transcript);
                None
            }
        };

        self.emit_transcript().await;

        if let Some(text) = finalized_text {
            let callback = self.inner.on_finalized.lock().clone();
            if let Some(callback) = callback {
                callback(text).await;
            }
        }
    }

    async fn handle_error(&self, err: RecognitionError) {
        match err {
            RecognitionError::PermissionDenied(reason) => {
                warn!(%reason, "microphone permission denied, disabling recording");
                self.inner.recording.store(false, Ordering::Release);
                self.cancel_pending_restart();
                if let Err(stop_err) = self.inner.provider.lock().await.stop().await {
                    debug!(%stop_err, "error stopping recognition after permission denial");
                }
                self.emit(SessionEvent::PermissionChanged { granted: false })
                    .await;
                self.set_status(SessionState::Disabled).await;
            }
            RecognitionError::Aborted(reason) => {
                debug!(%reason, "recognition aborted");
            }
            err if err.is_transient() => {
                warn!(%err, "transient recognition error");
                self.attempt_recovery().await;
            }
            err => {
                warn!(%err, "unhandled recognition error");
            }
        }
    }

    async fn handle_ended(&self) {
        // Only recover if the user still intends to be recording.
        if self.inner.recording.load(Ordering::Acquire) {
            self.attempt_recovery().await;
        }
    }

    async fn attempt_recovery(&self) {
        if !self.inner.recording.load(Ordering::Acquire) {
            return;
        }

        if self.inner.restart_attempts.load(Ordering::Acquire) >= MAX_RESTART_ATTEMPTS {
            warn!("maximum restart attempts reached, stopping session");
            self.fail_stopped().await;
            return;
        }

        let attempt = self.inner.restart_attempts.fetch_add(1, Ordering::AcqRel) + 1;
        info!(attempt, max = MAX_RESTART_ATTEMPTS, "scheduling recognition restart");
        self.set_status(SessionState::Recovering).await;
        self.emit(SessionEvent::RecoveryScheduled {
            attempt,
            max: MAX_RESTART_ATTEMPTS,
        })
        .await;

        let session = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(RESTART_DELAY).await;
            session.run_restart().await;
        });
        self.replace_pending_restart(handle);
    }

    /// One restart attempt: try to start; on failure, re-initialize the
    /// engine and try once more after another delay. Two failures in
    /// sequence end the session.
    async fn run_restart(&self) {
        if !self.inner.recording.load(Ordering::Acquire) {
            return;
        }

        let first = self.inner.provider.lock().await.start().await;
        let err = match first {
            Ok(()) => return,
            Err(err) => err,
        };
        warn!(%err, "recognition restart failed");

        if self.inner.restart_attempts.load(Ordering::Acquire) >= MAX_RESTART_ATTEMPTS {
            self.fail_stopped().await;
            return;
        }

        tokio::time::sleep(RESTART_DELAY).await;
        if !self.inner.recording.load(Ordering::Acquire) {
            return;
        }

        let second = {
            let mut provider = self.inner.provider.lock().await;
            let _ = provider.stop().await;
            provider.start().await
        };
        if let Err(err) = second {
            error!(%err, "recognition restart failed twice, giving up");
            self.fail_stopped().await;
        }
    }

    async fn fail_stopped(&self) {
        self.inner.recording.store(false, Ordering::Release);
        // Taking without aborting: this may run inside the pending task.
        drop(self.inner.pending_restart.lock().take());
        self.set_status(SessionState::Stopped).await;
    }

    fn cancel_pending_restart(&self) {
        if let Some(handle) = self.inner.pending_restart.lock().take() {
            handle.abort();
        }
    }

    fn replace_pending_restart(&self, handle: JoinHandle<()>) {
        if let Some(prev) = self.inner.pending_restart.lock().replace(handle) {
            prev.abort();
        }
    }

    async fn set_status(&self, next: SessionState) {
        let changed = {
            let mut status = self.inner.status.lock();
            if *status == next {
                false
            } else {
                *status = next;
                true
            }
        };
        if changed {
            self.emit(SessionEvent::StatusChanged(next)).await;
        }
    }

    async fn emit_transcript(&self) {
        let (finalized, interim) = {
            let transcript = self.inner.transcript.lock();
            (
                transcript.finalized().to_string(),
                transcript.interim().to_string(),
            )
        };
        self.emit(SessionEvent::TranscriptChanged { finalized, interim })
            .await;
    }

    async fn emit(&self, event: SessionEvent) {
        let callback = self.inner.events.lock().clone();
        if let Some(callback) = callback {
            callback(event).await;
        }
    }
}
