//! Display trigger.
//!
//! The [`DisplayMachine`] runs after every other machine and hands a read-only
//! [`DisplayData`] view of the state to a [`BoardRenderer`].

use tracing::{instrument, trace};

use crate::error::{MachineError, RenderError};
use crate::machine::MiniStateMachine;
use crate::moves::{Coordinates, MoveType, UserMove};
use crate::state::{GameInput, GamePhase, GameState};

/// A display backend.
pub trait BoardRenderer {
    /// Draws one frame.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the backend could not draw.
    fn render(&mut self, data: &DisplayData<'_>) -> Result<(), RenderError>;
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayData<'a> {
    /// Current phase.
    pub phase: GamePhase,
    /// All moves recorded so far.
    pub moves: &'a [UserMove],
    /// User whose turn is being tracked.
    pub user_id: usize,
    /// Winning user, once known.
    pub winner: Option<usize>,
    /// Number of players.
    pub players: usize,
    /// Board side length.
    pub board_side: usize,
    /// Name of the display backend.
    pub display_id: &'a str,
}

impl<'a> DisplayData<'a> {
    /// Builds the view of `state`.
    pub fn from_state(
        state: &'a GameState,
        players: usize,
        board_side: usize,
        display_id: &'a str,
    ) -> Self {
        Self {
            phase: state.phase(),
            moves: state.moves().as_slice(),
            user_id: state.current_user(),
            winner: state.winner(),
            players,
            board_side,
            display_id,
        }
    }

    /// Returns the user owning the mark on `cell`.
    pub fn mark_at(&self, cell: Coordinates) -> Option<usize> {
        self.moves
            .iter()
            .find(|m| m.is_mark() && m.coordinates() == cell)
            .map(UserMove::user_id)
    }

    /// Returns the cursor cell and the move that put it there.
    pub fn cursor(&self) -> Option<(Coordinates, MoveType)> {
        self.moves
            .last()
            .map(|m| (m.coordinates(), m.move_type()))
    }

    /// Returns true once every cell holds a mark.
    pub fn is_board_full(&self) -> bool {
        self.moves.iter().filter(|m| m.is_mark()).count() >= self.board_side * self.board_side
    }

    /// Returns the user expected to play next.
    pub fn next_user(&self) -> usize {
        match self.moves.last() {
            Some(last) if self.players > 0 && last.is_mark() && last.user_id() == self.user_id => {
                (self.user_id + 1) % self.players
            }
            _ => self.user_id,
        }
    }
}

/// Renders the board after every pass.
pub struct DisplayMachine {
    renderer: Box<dyn BoardRenderer>,
    display_id: String,
    players: usize,
    board_side: usize,
}

impl DisplayMachine {
    /// Creates a display machine drawing through `renderer`.
    pub fn new(
        renderer: impl BoardRenderer + 'static,
        display_id: impl Into<String>,
        players: usize,
        board_side: usize,
    ) -> Self {
        Self {
            renderer: Box::new(renderer),
            display_id: display_id.into(),
            players,
            board_side,
        }
    }

    /// Draws `state` outside a dispatch pass, e.g. the starting screen.
    ///
    /// # Errors
    ///
    /// Propagates the renderer's error.
    #[instrument(skip(self, state), fields(display = %self.display_id))]
    pub fn render(&mut self, state: &GameState) -> Result<(), RenderError> {
        let data = DisplayData::from_state(state, self.players, self.board_side, &self.display_id);
        trace!(moves = data.moves.len(), "Rendering");
        self.renderer.render(&data)
    }
}

impl std::fmt::Debug for DisplayMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayMachine")
            .field("display_id", &self.display_id)
            .field("players", &self.players)
            .field("board_side", &self.board_side)
            .finish_non_exhaustive()
    }
}

impl MiniStateMachine for DisplayMachine {
    fn next_state(&mut self, _input: &GameInput, state: &mut GameState) -> Result<(), MachineError> {
        self.render(state)?;
        Ok(())
    }
}
