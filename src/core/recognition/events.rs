//! Events emitted by the recognition session manager.
//!
//! Events are pure reflections of session state, intended to drive status
//! and permission indicators; they are never inputs to the state machine.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::session::SessionState;

/// Notifications from a [`RecognitionSession`](super::session::RecognitionSession).
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The session moved to a new state.
    StatusChanged(SessionState),
    /// The transcript changed: finalized text, plus the current interim
    /// segment.
    TranscriptChanged { finalized: String, interim: String },
    /// A recovery attempt was scheduled after an unexpected session loss.
    RecoveryScheduled { attempt: u32, max: u32 },
    /// Microphone permission was granted or revoked.
    PermissionChanged { granted: bool },
}

/// Type alias for session event callbacks
pub type SessionEventCallback =
    Arc<dyn Fn(SessionEvent) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;
