//! Shared game state mutated by the mini state machines.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::CapacityExceeded;
use crate::moves::{MoveLedger, UserMove};

/// A logical input produced by an input device.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum InputEvent {
    /// Nothing happened.
    #[default]
    None,
    /// Cursor up.
    Up,
    /// Cursor down.
    Down,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Place a mark under the cursor.
    Select,
    /// Ask to quit (twice to confirm).
    Exit,
    /// A key that means nothing to the game.
    Invalid,
}

impl InputEvent {
    /// Returns true if the event should reach the mini state machines.
    pub fn is_actionable(self) -> bool {
        !matches!(self, InputEvent::None | InputEvent::Invalid)
    }
}

/// Identifier of a registered input device.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[display("device#{}", _0)]
pub struct DeviceId(pub usize);

/// One input event together with the device that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct GameInput {
    /// The logical event.
    pub event: InputEvent,
    /// Device the event came from.
    pub device: DeviceId,
}

/// Phase of the game.
///
/// `Quit` and `Win` are terminal. `Winning` lasts exactly one dispatch pass so the
/// display can draw the winning board before the session stops.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
pub enum GamePhase {
    /// Normal play.
    #[default]
    Play,
    /// Waiting for quit confirmation.
    Quitting,
    /// User confirmed quitting.
    Quit,
    /// A line was completed on the last pass.
    Winning,
    /// Game over with a winner.
    Win,
}

impl GamePhase {
    /// Returns true if the session should stop.
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Quit | GamePhase::Win)
    }

    /// Returns true if new moves may be recorded.
    pub fn accepts_moves(self) -> bool {
        matches!(self, GamePhase::Play | GamePhase::Quitting)
    }
}

/// Complete state of one game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    moves: MoveLedger,
    current_user: usize,
    phase: GamePhase,
    winner: Option<usize>,
}

impl GameState {
    /// Creates a fresh game with user 0 to move.
    #[instrument]
    pub fn new(moves: MoveLedger) -> Self {
        Self {
            moves,
            current_user: 0,
            phase: GamePhase::Play,
            winner: None,
        }
    }

    /// Returns the move ledger.
    pub fn moves(&self) -> &MoveLedger {
        &self.moves
    }

    /// Returns the index of the user whose input is being processed.
    pub fn current_user(&self) -> usize {
        self.current_user
    }

    /// Returns the current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Returns the winning user once a line was completed.
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    /// Returns the user whose input the next dispatch pass will be attributed to.
    ///
    /// The turn tracker runs first in a pass and so only sees a mark one pass after it was
    /// placed. Until then the mark's owner is still `current_user`, and the turn already
    /// belongs to the following player.
    pub fn user_to_move(&self, players: usize) -> usize {
        match self.moves.last() {
            Some(last)
                if players > 0 && last.is_mark() && last.user_id() == self.current_user =>
            {
                (self.current_user + 1) % players
            }
            _ => self.current_user,
        }
    }

    /// Appends a move to the ledger.
    pub fn record_move(&mut self, user_move: UserMove) -> Result<(), CapacityExceeded> {
        self.moves.record(user_move)
    }

    /// Sets the user whose turn it is.
    #[instrument(skip(self), fields(from = self.current_user))]
    pub fn set_current_user(&mut self, user: usize) {
        debug!(to = user, "Changing current user");
        self.current_user = user;
    }

    /// Moves the game to another phase.
    #[instrument(skip(self), fields(from = %self.phase))]
    pub fn set_phase(&mut self, phase: GamePhase) {
        debug!(to = %phase, "Changing phase");
        self.phase = phase;
    }

    /// Records the winner.
    pub fn set_winner(&mut self, winner: Option<usize>) {
        self.winner = winner;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(MoveLedger::default())
    }
}
