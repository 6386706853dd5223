//! Two-step quit confirmation.

use tracing::{info, instrument};

use crate::error::MachineError;
use crate::machine::MiniStateMachine;
use crate::moves::MoveType;
use crate::state::{GameInput, GamePhase, GameState};

/// Overlays a quit confirmation on top of normal play.
///
/// ```text
/// Play     --Quit-->      Quitting
/// Quitting --Quit-->      Quit
/// Quitting --other move-> Play
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuitMachine {
    seen: usize,
}

impl QuitMachine {
    /// Creates the machine.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MiniStateMachine for QuitMachine {
    #[instrument(skip(self, _input, state), fields(phase = %state.phase()))]
    fn next_state(&mut self, _input: &GameInput, state: &mut GameState) -> Result<(), MachineError> {
        let len = state.moves().len();
        if len == self.seen {
            return Ok(());
        }
        self.seen = len;

        let Some(last) = state.moves().last() else {
            return Ok(());
        };
        let is_quit = last.move_type() == MoveType::Quit;

        match (state.phase(), is_quit) {
            (GamePhase::Play, true) => state.set_phase(GamePhase::Quitting),
            (GamePhase::Quitting, true) => {
                info!("Quit confirmed");
                state.set_phase(GamePhase::Quit);
            }
            (GamePhase::Quitting, false) => state.set_phase(GamePhase::Play),
            _ => {}
        }

        Ok(())
    }
}
