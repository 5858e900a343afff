//! Target language display names mapped to synthesis locale codes.

/// Fixed lookup from language display name to voice locale.
pub const LOCALE_MAP: &[(&str, &str)] = &[
    ("English", "en-US"),
    ("Spanish", "es-ES"),
    ("French", "fr-FR"),
    ("German", "de-DE"),
    ("Chinese", "zh-CN"),
    ("Arabic", "ar-SA"),
    ("Hindi", "hi-IN"),
];

/// Locale used when a language has no mapping.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Resolve the synthesis locale for a target language display name.
pub fn locale_for_language(language: &str) -> &'static str {
    LOCALE_MAP
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, locale)| *locale)
        .unwrap_or(DEFAULT_LOCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_languages_resolve() {
        assert_eq!(locale_for_language("Spanish"), "es-ES");
        assert_eq!(locale_for_language("Hindi"), "hi-IN");
    }

    #[test]
    fn unmapped_language_falls_back_to_default() {
        assert_eq!(locale_for_language("Klingon"), DEFAULT_LOCALE);
        assert_eq!(locale_for_language(""), DEFAULT_LOCALE);
    }
}
