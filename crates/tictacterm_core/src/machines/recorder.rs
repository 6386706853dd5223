//! Translates input events into recorded moves.

use tracing::{debug, instrument};

use crate::error::MachineError;
use crate::machine::MiniStateMachine;
use crate::moves::{Coordinates, MoveType, UserMove};
use crate::state::{GameInput, GameState, InputEvent};

/// Keeps the board cursor and records one move per actionable event.
///
/// Row `0` is the top row, so `Up` decreases `y`. The cursor wraps at the board edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecorder {
    side: usize,
    cursor: Coordinates,
}

impl MoveRecorder {
    /// Creates a recorder for a `side × side` board with the cursor in the centre.
    #[instrument]
    pub fn new(side: usize) -> Self {
        let side = side.max(1);
        Self {
            side,
            cursor: Coordinates::new(side / 2, side / 2),
        }
    }

    /// Returns the cursor position.
    pub fn cursor(&self) -> Coordinates {
        self.cursor
    }

    fn step_back(&self, value: usize) -> usize {
        (value + self.side - 1) % self.side
    }

    fn step_forward(&self, value: usize) -> usize {
        (value + 1) % self.side
    }

    fn translate(&mut self, event: InputEvent, state: &GameState) -> Option<MoveType> {
        match event {
            InputEvent::Up => {
                self.cursor.y = self.step_back(self.cursor.y);
                Some(MoveType::Highlight)
            }
            InputEvent::Down => {
                self.cursor.y = self.step_forward(self.cursor.y);
                Some(MoveType::Highlight)
            }
            InputEvent::Left => {
                self.cursor.x = self.step_back(self.cursor.x);
                Some(MoveType::Highlight)
            }
            InputEvent::Right => {
                self.cursor.x = self.step_forward(self.cursor.x);
                Some(MoveType::Highlight)
            }
            InputEvent::Select => {
                if state.moves().mark_at(self.cursor).is_some() {
                    Some(MoveType::SelectInvalid)
                } else {
                    Some(MoveType::SelectValid)
                }
            }
            InputEvent::Exit => Some(MoveType::Quit),
            InputEvent::None | InputEvent::Invalid => None,
        }
    }
}

impl MiniStateMachine for MoveRecorder {
    #[instrument(skip(self, state), fields(user = state.current_user(), phase = %state.phase()))]
    fn next_state(&mut self, input: &GameInput, state: &mut GameState) -> Result<(), MachineError> {
        if !state.phase().accepts_moves() {
            debug!("Phase does not accept moves");
            return Ok(());
        }

        let Some(move_type) = self.translate(input.event, state) else {
            return Ok(());
        };

        let user_move = UserMove::new(move_type, state.current_user(), self.cursor);
        state.record_move(user_move)?;
        Ok(())
    }
}
