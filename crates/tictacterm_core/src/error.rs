//! Error types for the game state machine core.

use derive_more::{Display, Error, From};
use tracing::instrument;

/// The move ledger has no room for another move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Move ledger is full ({} moves)", capacity)]
pub struct CapacityExceeded {
    /// Maximum number of moves the ledger holds.
    pub capacity: usize,
}

/// Failure reported by a renderer while drawing the board.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Render error: {} at {}:{}", message, file, line)]
pub struct RenderError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl RenderError {
    /// Creates a new render error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Error returned by a single mini state machine.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum MachineError {
    /// Recording a move failed.
    #[display("{}", _0)]
    Ledger(#[error(source)] CapacityExceeded),

    /// Rendering the board failed.
    #[display("{}", _0)]
    Render(#[error(source)] RenderError),

    /// The state refers to a user outside the configured player count.
    #[display("User {} is out of range for {} players", user, players)]
    #[from(skip)]
    UserOutOfRange {
        /// Offending user index.
        user: usize,
        /// Configured number of players.
        players: usize,
    },
}

/// A dispatch pass was aborted by one of the registered machines.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Mini state machine '{}' failed: {}", machine, source)]
pub struct DispatchError {
    /// Id of the machine that failed.
    pub machine: String,
    /// Underlying machine error.
    pub source: MachineError,
}
