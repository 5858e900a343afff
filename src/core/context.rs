//! Server-held conversation context.
//!
//! The service accumulates a translation turn counter per deployment; the
//! client mirrors it for display only and resets its mirror when the reset
//! endpoint confirms.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct ContextStore {
    turns: AtomicU64,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed translation turn, returning the new count.
    pub fn record_turn(&self) -> u64 {
        self.turns.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn turns(&self) -> u64 {
        self.turns.load(Ordering::Acquire)
    }

    /// Discard the accumulated context.
    pub fn reset(&self) {
        self.turns.store(0, Ordering::Release);
    }
}
