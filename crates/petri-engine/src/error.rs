//! Fatal run outcomes.
//!
//! Deliberate terminations — the generation cap and an explicit stop —
//! are not errors and never appear here; they surface as a clean
//! `Ok(())` from [`LifeEngine::join`](crate::engine::LifeEngine::join)
//! and a disconnected frame channel.

use std::fmt;

/// A run that ended fatally rather than by a deliberate stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// A worker panicked mid-tick. The destination buffer was left in an
    /// indeterminate partial state and is never recycled.
    WorkerPanic,
    /// The barrier made no progress within the configured stall timeout:
    /// a worker died or wedged without reaching the rendezvous.
    Stalled,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WorkerPanic => write!(f, "a worker panicked mid-tick; run aborted"),
            Self::Stalled => write!(f, "barrier stalled: a worker never arrived"),
        }
    }
}

impl std::error::Error for EngineError {}
