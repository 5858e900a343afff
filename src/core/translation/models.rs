//! Target language to translation model mapping.

/// Supported target languages and the Helsinki-NLP opus-mt model serving
/// each. English is the multilingual-to-English direction; the rest are
/// English-to-target.
pub const LANGUAGE_MODELS: &[(&str, &str)] = &[
    ("English", "Helsinki-NLP/opus-mt-mul-en"),
    ("Spanish", "Helsinki-NLP/opus-mt-en-es"),
    ("French", "Helsinki-NLP/opus-mt-en-fr"),
    ("German", "Helsinki-NLP/opus-mt-en-de"),
    ("Chinese", "Helsinki-NLP/opus-mt-en-zh"),
    ("Arabic", "Helsinki-NLP/opus-mt-en-ar"),
    ("Hindi", "Helsinki-NLP/opus-mt-en-hi"),
];

/// Display name of the translation provider, surfaced by `/api/models`.
pub const PROVIDER_NAME: &str = "Hugging Face Translation Models";

/// Look up the model for a target language display name.
pub fn model_for_language(language: &str) -> Option<&'static str> {
    LANGUAGE_MODELS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, model)| *model)
}

/// The target languages available for selection.
pub fn available_languages() -> Vec<&'static str> {
    LANGUAGE_MODELS.iter().map(|(name, _)| *name).collect()
}
