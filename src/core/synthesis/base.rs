use async_trait::async_trait;

/// Synthesis-specific error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum SynthesisError {
    #[error("synthesis failed: {0}")]
    SynthesisFailed(String),
    #[error("voice not available for locale {0}")]
    VoiceUnavailable(String),
    #[error("audio playback failed: {0}")]
    PlaybackError(String),
}

/// Result type for synthesis operations
pub type SynthesisResult<T> = Result<T, SynthesisError>;

/// Black-box interface to a vendor-supplied speech synthesis facility.
///
/// `speak` resolves when playback completes; an `Err` covers both synthesis
/// and playback failures.
#[async_trait]
pub trait SynthesisProvider: Send + Sync {
    /// Synthesize and play `text` using a voice for `locale`.
    async fn speak(&mut self, text: &str, locale: &str) -> SynthesisResult<()>;

    /// Whether playback is currently in progress.
    fn is_speaking(&self) -> bool;
}
