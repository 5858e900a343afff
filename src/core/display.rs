//! UI-visible state, folded from session and pipeline events.
//!
//! Status, transcript, translation, banner, and playback availability are
//! pure reflections of events; nothing here feeds back into the state
//! machines.

use super::recognition::{SessionEvent, SessionState};
use super::translation::highlight::HighlightSpan;
use super::translation::pipeline::{PipelineEvent, UNAVAILABLE_PLACEHOLDER};

/// Microphone permission indicator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionIndicator {
    #[default]
    Unknown,
    Granted,
    Denied,
}

/// Everything a front-end needs to render.
#[derive(Debug, Clone)]
pub struct DisplayState {
    pub status: SessionState,
    pub record_enabled: bool,
    pub mic_permission: PermissionIndicator,
    /// Current recovery attempt as (attempt, max), while recovering.
    pub recovery_attempt: Option<(u32, u32)>,
    pub transcript_finalized: String,
    pub transcript_interim: String,
    pub translation: String,
    pub highlights: Vec<HighlightSpan>,
    pub loading: bool,
    pub playback_enabled: bool,
    pub banner: Option<String>,
    pub turns: u64,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            status: SessionState::Idle,
            record_enabled: true,
            mic_permission: PermissionIndicator::Unknown,
            recovery_attempt: None,
            transcript_finalized: String::new(),
            transcript_interim: String::new(),
            translation: String::new(),
            highlights: Vec::new(),
            loading: false,
            playback_enabled: false,
            banner: None,
            turns: 0,
        }
    }
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_session(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::StatusChanged(status) => {
                self.status = status;
                self.record_enabled = status != SessionState::Disabled;
                if status != SessionState::Recovering {
                    self.recovery_attempt = None;
                }
            }
            SessionEvent::TranscriptChanged { finalized, interim } => {
                self.transcript_finalized = finalized;
                self.transcript_interim = interim;
            }
            SessionEvent::RecoveryScheduled { attempt, max } => {
                self.recovery_attempt = Some((attempt, max));
            }
            SessionEvent::PermissionChanged { granted } => {
                self.mic_permission = if granted {
                    PermissionIndicator::Granted
                } else {
                    PermissionIndicator::Denied
                };
            }
        }
    }

    pub fn apply_pipeline(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::TranslationStarted => {
                self.loading = true;
                self.translation.clear();
                self.highlights.clear();
                self.banner = None;
            }
            PipelineEvent::TranslationReady {
                text,
                highlights,
                turn,
            } => {
                self.loading = false;
                self.translation = text;
                self.highlights = highlights;
                self.playback_enabled = true;
                self.banner = None;
                self.turns = turn;
            }
            PipelineEvent::TranslationFailed { reason } => {
                self.loading = false;
                self.translation = UNAVAILABLE_PLACEHOLDER.to_string();
                self.highlights.clear();
                self.playback_enabled = false;
                self.banner = Some(format!("Translation failed: {reason}. Please try again."));
            }
            PipelineEvent::ContextReset => {
                self.turns = 0;
            }
            PipelineEvent::ContextResetFailed { reason } => {
                self.banner = Some(format!("Context reset failed: {reason}."));
            }
        }
    }

    /// The clear action: empties transcript and translation and disables
    /// playback.
    pub fn clear(&mut self) {
        self.transcript_finalized.clear();
        self.transcript_interim.clear();
        self.translation.clear();
        self.highlights.clear();
        self.playback_enabled = false;
    }

    /// Show a banner outside the pipeline flow (playback failures).
    pub fn show_banner(&mut self, message: impl Into<String>) {
        self.banner = Some(message.into());
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// Translation text decorated with the conversation turn label, as the
    /// context-aware display presents it.
    pub fn decorated_translation(&self) -> String {
        if self.turns > 0 && !self.translation.is_empty() {
            format!("[Turn {}] {}", self.turns, self.translation)
        } else {
            self.translation.clone()
        }
    }
}
