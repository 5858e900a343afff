pub mod context;
pub mod display;
pub mod recognition;
pub mod synthesis;
pub mod translation;

// Re-export commonly used types for convenience
pub use context::ContextStore;
pub use display::{DisplayState, PermissionIndicator};
pub use recognition::{
    RecognitionError, RecognitionProvider, RecognitionResult, RecognitionSession,
    RecognitionUpdate, SessionEvent, SessionState, Transcript,
};
pub use synthesis::{Speaker, SynthesisError, SynthesisProvider, locale_for_language};
pub use translation::{
    HighlightKind, HighlightSpan, HttpTranslationClient, PipelineEvent, TranslationClient,
    TranslationError, TranslationPipeline, TranslationUpstream, UNAVAILABLE_PLACEHOLDER,
};
