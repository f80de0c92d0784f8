//! Errors raised while building, solving, or checking the state space.

use std::fmt;

use crate::game::{CodecError, PositionId};

use super::config::ConfigError;

/// Fatal solver errors.
///
/// None of these are retryable: the computation is deterministic, so a run
/// that fails once fails the same way every time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// Position id outside `0..=MAX_ID`.
    Codec(CodecError),
    /// A non-terminal position with no moves was reached.
    NoMoves {
        /// The offending position
        id: PositionId,
    },
    /// Every queued id was retried with no position resolving in between.
    Stalled {
        /// Positions still undecided when the loop gave up
        unresolved: usize,
        /// Worklist length at that point
        queued: usize,
    },
    /// Positions still undecided after the worklist drained.
    Unresolved {
        /// Number of undecided positions
        count: usize,
        /// Lowest undecided id
        first: PositionId,
    },
    /// A solved position contradicts its successors.
    Inconsistent {
        /// The offending position
        id: PositionId,
        /// What was violated
        reason: String,
    },
    /// Invalid configuration.
    Config(ConfigError),
    /// The rayon thread pool could not be created.
    ThreadPool(String),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Codec(e) => write!(f, "{}", e),
            SolveError::NoMoves { id } => {
                write!(f, "Position #{} is not terminal, yet it has no next positions", id)
            }
            SolveError::Stalled { unresolved, queued } => write!(
                f,
                "Solver stalled with {} undecided positions ({} queued)",
                unresolved, queued
            ),
            SolveError::Unresolved { count, first } => write!(
                f,
                "{} positions left undecided after solving (first: #{})",
                count, first
            ),
            SolveError::Inconsistent { id, reason } => {
                write!(f, "Position #{} is inconsistent: {}", id, reason)
            }
            SolveError::Config(e) => write!(f, "{}", e),
            SolveError::ThreadPool(msg) => write!(f, "Failed to build thread pool: {}", msg),
        }
    }
}

impl std::error::Error for SolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolveError::Codec(e) => Some(e),
            SolveError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for SolveError {
    fn from(e: CodecError) -> Self {
        SolveError::Codec(e)
    }
}

impl From<ConfigError> for SolveError {
    fn from(e: ConfigError) -> Self {
        SolveError::Config(e)
    }
}
