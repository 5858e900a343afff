//! On-demand playback of the displayed translation.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::base::{SynthesisProvider, SynthesisResult};
use super::locale::locale_for_language;

static TURN_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[Turn \d+\]\s*").expect("turn label pattern"));

/// Strip the `[Turn N]` counter decoration the context-aware display adds,
/// so only the translation itself is spoken.
pub fn strip_turn_label(text: &str) -> &str {
    match TURN_LABEL_RE.find(text) {
        Some(found) => &text[found.end()..],
        None => text,
    }
}

/// Speaks displayed translations through a black-box synthesis provider.
pub struct Speaker {
    provider: tokio::sync::Mutex<Box<dyn SynthesisProvider>>,
}

impl Speaker {
    pub fn new(provider: Box<dyn SynthesisProvider>) -> Self {
        Self {
            provider: tokio::sync::Mutex::new(provider),
        }
    }

    /// Speak the currently displayed translation. Empty text and the
    /// "unavailable" placeholder are skipped silently; a provider error is
    /// returned for the caller to surface in the error banner.
    pub async fn speak_translation(
        &self,
        displayed: &str,
        target_language: &str,
    ) -> SynthesisResult<()> {
        let text = strip_turn_label(displayed).trim();
        if text.is_empty() || text.contains("unavailable") {
            debug!("nothing speakable displayed, skipping playback");
            return Ok(());
        }

        let locale = locale_for_language(target_language);
        self.provider.lock().await.speak(text, locale).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::synthesis::base::SynthesisError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct RecordingProvider {
        spoken: Arc<Mutex<Vec<(String, String)>>>,
        fail: bool,
    }

    #[async_trait]
    impl SynthesisProvider for RecordingProvider {
        async fn speak(&mut self, text: &str, locale: &str) -> SynthesisResult<()> {
            if self.fail {
                return Err(SynthesisError::PlaybackError("audio device busy".into()));
            }
            self.spoken.lock().push((text.to_string(), locale.to_string()));
            Ok(())
        }

        fn is_speaking(&self) -> bool {
            false
        }
    }

    fn speaker(fail: bool) -> (Speaker, Arc<Mutex<Vec<(String, String)>>>) {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let provider = RecordingProvider {
            spoken: spoken.clone(),
            fail,
        };
        (Speaker::new(Box::new(provider)), spoken)
    }

    #[test]
    fn turn_label_is_stripped() {
        assert_eq!(strip_turn_label("[Turn 3] tome dos tabletas"), "tome dos tabletas");
        assert_eq!(strip_turn_label("tome dos tabletas"), "tome dos tabletas");
    }

    #[tokio::test]
    async fn speaks_with_mapped_locale() {
        let (speaker, spoken) = speaker(false);
        speaker
            .speak_translation("[Turn 1] tome dos tabletas", "Spanish")
            .await
            .unwrap();
        assert_eq!(
            spoken.lock().as_slice(),
            [("tome dos tabletas".to_string(), "es-ES".to_string())]
        );
    }

    #[tokio::test]
    async fn unmapped_language_uses_default_locale() {
        let (speaker, spoken) = speaker(false);
        speaker.speak_translation("hello", "Klingon").await.unwrap();
        assert_eq!(spoken.lock()[0].1, "en-US");
    }

    #[tokio::test]
    async fn placeholder_and_empty_text_are_skipped() {
        let (speaker, spoken) = speaker(false);
        speaker
            .speak_translation("Translation unavailable. Please try again.", "Spanish")
            .await
            .unwrap();
        speaker.speak_translation("   ", "Spanish").await.unwrap();
        assert!(spoken.lock().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_is_propagated() {
        let (speaker, _) = speaker(true);
        let err = speaker
            .speak_translation("tome dos tabletas", "Spanish")
            .await
            .unwrap_err();
        assert!(matches!(err, SynthesisError::PlaybackError(_)));
    }
}
