//! Recognition session management: black-box provider interface, transcript
//! accumulation, and the bounded-recovery session state machine.

pub mod events;
pub mod provider;
pub mod session;
pub mod transcript;

#[cfg(test)]
mod tests;

pub use events::{SessionEvent, SessionEventCallback};
pub use provider::{
    RecognitionError, RecognitionErrorCallback, RecognitionLifecycleCallback, RecognitionProvider,
    RecognitionResult, RecognitionUpdate, RecognitionUpdateCallback,
};
pub use session::{
    FinalizedTextCallback, LANGUAGE_SETTLE_DELAY, MAX_RESTART_ATTEMPTS, RESTART_DELAY,
    RecognitionSession, SessionState,
};
pub use transcript::Transcript;
