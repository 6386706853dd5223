//! Turn tracking.

use tracing::{debug, instrument};

use crate::error::MachineError;
use crate::machine::MiniStateMachine;
use crate::state::{GameInput, GameState};

/// Passes the turn to the next player after a mark was placed.
///
/// Runs before the recorder, so the mark it reacts to is the one recorded on the previous
/// pass. Each ledger entry advances the turn at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnTracker {
    players: usize,
    seen: usize,
}

impl TurnTracker {
    /// Creates a tracker for `players` players.
    #[instrument]
    pub fn new(players: usize) -> Self {
        Self { players, seen: 0 }
    }
}

impl MiniStateMachine for TurnTracker {
    #[instrument(skip(self, _input, state), fields(user = state.current_user()))]
    fn next_state(&mut self, _input: &GameInput, state: &mut GameState) -> Result<(), MachineError> {
        let current = state.current_user();
        if current >= self.players {
            return Err(MachineError::UserOutOfRange {
                user: current,
                players: self.players,
            });
        }

        let len = state.moves().len();
        if len == self.seen {
            return Ok(());
        }
        self.seen = len;

        if let Some(last) = state.moves().last()
            && last.is_mark()
        {
            let next = (current + 1) % self.players;
            debug!(next, "Mark placed, passing turn");
            state.set_current_user(next);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{Coordinates, MoveType, UserMove};
    use crate::state::{DeviceId, InputEvent};

    fn input() -> GameInput {
        GameInput::new(InputEvent::Select, DeviceId(0))
    }

    fn record(state: &mut GameState, move_type: MoveType) {
        let user = state.current_user();
        state
            .record_move(UserMove::new(move_type, user, Coordinates::new(0, 0)))
            .unwrap();
    }

    #[test]
    fn test_valid_select_advances_turn() {
        let mut tracker = TurnTracker::new(3);
        let mut state = GameState::default();

        for expected in [1, 2, 0] {
            record(&mut state, MoveType::SelectValid);
            tracker.next_state(&input(), &mut state).unwrap();
            assert_eq!(state.current_user(), expected);
        }
    }

    #[test]
    fn test_other_moves_keep_turn() {
        let mut tracker = TurnTracker::new(2);
        let mut state = GameState::default();

        for move_type in [MoveType::Highlight, MoveType::SelectInvalid, MoveType::Quit] {
            record(&mut state, move_type);
            tracker.next_state(&input(), &mut state).unwrap();
            assert_eq!(state.current_user(), 0);
        }
    }

    #[test]
    fn test_same_mark_advances_once() {
        let mut tracker = TurnTracker::new(2);
        let mut state = GameState::default();

        record(&mut state, MoveType::SelectValid);
        tracker.next_state(&input(), &mut state).unwrap();
        tracker.next_state(&input(), &mut state).unwrap();

        assert_eq!(state.current_user(), 1);
    }

    #[test]
    fn test_empty_ledger_is_noop() {
        let mut tracker = TurnTracker::new(2);
        let mut state = GameState::default();
        tracker.next_state(&input(), &mut state).unwrap();
        assert_eq!(state, GameState::default());
    }

    #[test]
    fn test_user_out_of_range_is_rejected() {
        let mut tracker = TurnTracker::new(2);
        let mut state = GameState::default();
        state.set_current_user(5);

        let err = tracker.next_state(&input(), &mut state).unwrap_err();
        assert!(matches!(err, MachineError::UserOutOfRange { user: 5, players: 2 }));
    }
}
