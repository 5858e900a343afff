//! Translation: the debounced request pipeline, the client interface it
//! talks through, the upstream backend behind the service, and cosmetic
//! highlighting of medical values.

pub mod client;
pub mod highlight;
pub mod models;
pub mod pipeline;
pub mod upstream;

pub use client::{
    HttpTranslationClient, TranslateRequest, TranslateResponse, TranslationClient,
    TranslationError,
};
pub use highlight::{HighlightKind, HighlightSpan, find_highlights};
pub use models::{LANGUAGE_MODELS, PROVIDER_NAME, available_languages, model_for_language};
pub use pipeline::{
    PipelineEvent, PipelineEventCallback, QUIET_INTERVAL, TranslationPipeline,
    UNAVAILABLE_PLACEHOLDER,
};
pub use upstream::{
    DEFAULT_INFERENCE_URL, HuggingFaceClient, MEDICAL_CONTEXT_PREFIX, TranslationUpstream,
    UPSTREAM_TIMEOUT, UpstreamError,
};
