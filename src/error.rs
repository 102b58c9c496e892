//! Error types for the edges of the simulation
//!
//! The simulation itself has no failure modes: game over is a phase, not an
//! error. Errors only arise when loading tuning data or when a caller asks for
//! a phase transition that is not allowed from the current phase.

use crate::sim::GamePhase;

/// Failure to load or validate a [`crate::Tuning`] document
#[derive(thiserror::Error, Debug)]
pub enum TuningError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its allowed range
    #[error("Invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// A phase transition was requested from a phase that does not allow it
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[error("cannot {action} while in phase {from:?}")]
pub struct TransitionError {
    pub from: GamePhase,
    pub action: &'static str,
}
