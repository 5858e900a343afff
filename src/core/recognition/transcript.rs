//! Accumulating transcript built from finalized and interim recognition
//! segments.

/// The transcript shown to the user: an append-only run of finalized segments
/// plus one provisional interim segment that is replaced wholesale on each
/// recognition update.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transcript {
    finalized: String,
    interim: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finalized segment and drop the interim text it supersedes.
    pub fn push_final(&mut self, segment: &str) {
        let segment = segment.trim();
        if segment.is_empty() {
            return;
        }
        self.finalized.push_str(segment);
        self.finalized.push(' ');
        self.interim.clear();
    }

    /// Replace the interim segment.
    pub fn set_interim(&mut self, segment: &str) {
        self.interim.clear();
        self.interim.push_str(segment);
    }

    /// The finalized text as accumulated, with trailing separator.
    pub fn finalized(&self) -> &str {
        &self.finalized
    }

    /// The current interim segment.
    pub fn interim(&self) -> &str {
        &self.interim
    }

    /// The finalized text trimmed for submission to translation.
    pub fn text_for_translation(&self) -> String {
        self.finalized.trim().to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.finalized.is_empty() && self.interim.is_empty()
    }

    pub fn clear(&mut self) {
        self.finalized.clear();
        self.interim.clear();
    }
}
