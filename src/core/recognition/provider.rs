use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A single update from a continuous recognition session.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionUpdate {
    /// The recognized text segment
    pub transcript: String,
    /// Whether the engine has committed to this segment (finalized) or may
    /// still revise it (interim)
    pub is_final: bool,
    /// Confidence score for the segment (0.0 to 1.0)
    pub confidence: f32,
}

impl RecognitionUpdate {
    pub fn new(transcript: String, is_final: bool, confidence: f32) -> Self {
        Self {
            transcript,
            is_final,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Convenience constructor for a finalized segment.
    pub fn finalized(transcript: impl Into<String>) -> Self {
        Self::new(transcript.into(), true, 1.0)
    }

    /// Convenience constructor for an interim segment.
    pub fn interim(transcript: impl Into<String>) -> Self {
        Self::new(transcript.into(), false, 0.0)
    }
}

/// Error categories reported by recognition engines.
///
/// The category determines recovery policy (see
/// [`RecognitionSession`](super::session::RecognitionSession)): `Network`,
/// `NoSpeech`, and `Other` are transient and trigger bounded auto-recovery;
/// `PermissionDenied` disables the session until permission is re-granted;
/// `Aborted` is logged and left alone.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RecognitionError {
    #[error("network error: {0}")]
    Network(String),
    #[error("no speech detected")]
    NoSpeech,
    #[error("microphone permission denied: {0}")]
    PermissionDenied(String),
    #[error("session aborted: {0}")]
    Aborted(String),
    #[error("recognition error: {0}")]
    Other(String),
}

impl RecognitionError {
    /// Whether the session manager should attempt automatic recovery.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RecognitionError::Network(_) | RecognitionError::NoSpeech | RecognitionError::Other(_)
        )
    }
}

/// Result type for recognition operations
pub type RecognitionResult<T> = Result<T, RecognitionError>;

/// Type alias for recognition update callbacks
pub type RecognitionUpdateCallback =
    Arc<dyn Fn(RecognitionUpdate) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Type alias for recognition error callbacks
pub type RecognitionErrorCallback =
    Arc<dyn Fn(RecognitionError) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Type alias for session lifecycle callbacks (session started / session ended)
pub type RecognitionLifecycleCallback =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Black-box interface to a vendor-supplied continuous speech recognition
/// session.
///
/// The engine's transcription algorithm is out of scope; the session manager
/// only depends on the lifecycle contract: `start` requests a session,
/// the `on_started` callback confirms one is live, `on_update` delivers
/// interim/finalized segments, `on_error` reports categorized failures, and
/// `on_ended` fires when the session stops for any reason.
#[async_trait::async_trait]
pub trait RecognitionProvider: Send + Sync {
    /// Request a new recognition session with the currently configured
    /// language.
    ///
    /// `Ok` means the request was accepted, not that a session is live; the
    /// `on_started` callback confirms that.
    async fn start(&mut self) -> RecognitionResult<()>;

    /// Stop the current session, if any.
    async fn stop(&mut self) -> RecognitionResult<()>;

    /// Whether a session is currently live.
    fn is_active(&self) -> bool;

    /// Set the locale for the next session (e.g. "en-US", "es-ES").
    async fn set_language(&mut self, language: &str) -> RecognitionResult<()>;

    /// Register a callback confirming a session has started.
    async fn on_started(&mut self, callback: RecognitionLifecycleCallback)
        -> RecognitionResult<()>;

    /// Register a callback for interim and finalized recognition updates.
    async fn on_update(&mut self, callback: RecognitionUpdateCallback) -> RecognitionResult<()>;

    /// Register a callback for categorized streaming errors.
    async fn on_error(&mut self, callback: RecognitionErrorCallback) -> RecognitionResult<()>;

    /// Register a callback for session end, expected or not.
    async fn on_ended(&mut self, callback: RecognitionLifecycleCallback) -> RecognitionResult<()>;
}
