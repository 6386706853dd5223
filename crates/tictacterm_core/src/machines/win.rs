//! Win detection on a generalized board.
//!
//! With `P` players the board has side `P + 1`, and a line is won when a user's new mark
//! joins `P` of their earlier marks on the same column, row or diagonal. The `moves` passed
//! to the checks are the moves recorded *before* `current`.

use tracing::{info, instrument};

use crate::error::MachineError;
use crate::machine::MiniStateMachine;
use crate::moves::{Coordinates, UserMove};
use crate::state::{GameInput, GamePhase, GameState};

fn marks_by<'a>(moves: &'a [UserMove], user: usize) -> impl Iterator<Item = &'a UserMove> {
    moves
        .iter()
        .filter(move |m| m.is_mark() && m.user_id() == user)
}

fn has_mark(moves: &[UserMove], user: usize, cell: Option<Coordinates>) -> bool {
    cell.is_some_and(|cell| marks_by(moves, user).any(|m| m.coordinates() == cell))
}

fn offset(base: usize, delta: usize, forward: bool) -> Option<usize> {
    if forward {
        base.checked_add(delta)
    } else {
        base.checked_sub(delta)
    }
}

/// Returns true if `current` completes a column.
#[instrument(skip(moves), fields(moves = moves.len()))]
pub fn is_win_vertical(moves: &[UserMove], current: &UserMove, threshold: usize) -> bool {
    let x = current.coordinates().x;
    marks_by(moves, current.user_id())
        .filter(|m| m.coordinates().x == x)
        .count()
        >= threshold
}

/// Returns true if `current` completes a row.
#[instrument(skip(moves), fields(moves = moves.len()))]
pub fn is_win_horizontal(moves: &[UserMove], current: &UserMove, threshold: usize) -> bool {
    let y = current.coordinates().y;
    marks_by(moves, current.user_id())
        .filter(|m| m.coordinates().y == y)
        .count()
        >= threshold
}

/// Returns true if `current` completes either diagonal through its cell.
///
/// Both diagonals are walked outwards up to `threshold` cells in each direction. Each
/// diagonal is counted on its own.
#[instrument(skip(moves), fields(moves = moves.len()))]
pub fn is_win_diagonal(moves: &[UserMove], current: &UserMove, threshold: usize) -> bool {
    let Coordinates { x, y } = current.coordinates();
    let user = current.user_id();

    let count_line = |x_forward: bool, y_forward: bool| -> usize {
        (1..=threshold)
            .map(|d| {
                let ahead = offset(x, d, x_forward)
                    .zip(offset(y, d, y_forward))
                    .map(|(x, y)| Coordinates::new(x, y));
                let behind = offset(x, d, !x_forward)
                    .zip(offset(y, d, !y_forward))
                    .map(|(x, y)| Coordinates::new(x, y));
                usize::from(has_mark(moves, user, ahead)) + usize::from(has_mark(moves, user, behind))
            })
            .sum()
    };

    let main = count_line(true, true);
    let anti = count_line(true, false);
    main >= threshold || anti >= threshold
}

/// Returns true if `current` completes any line.
pub fn is_win(moves: &[UserMove], current: &UserMove, threshold: usize) -> bool {
    is_win_vertical(moves, current, threshold)
        || is_win_horizontal(moves, current, threshold)
        || is_win_diagonal(moves, current, threshold)
}

/// Checks each new mark for a completed line.
///
/// A completed line moves the game to [`GamePhase::Winning`]. The next pass promotes it to
/// [`GamePhase::Win`], giving the display one render of the winning board first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinDetector {
    players: usize,
    seen: usize,
}

impl WinDetector {
    /// Creates a detector for `players` players.
    #[instrument]
    pub fn new(players: usize) -> Self {
        Self { players, seen: 0 }
    }
}

impl MiniStateMachine for WinDetector {
    #[instrument(skip(self, _input, state), fields(phase = %state.phase()))]
    fn next_state(&mut self, _input: &GameInput, state: &mut GameState) -> Result<(), MachineError> {
        if state.phase() == GamePhase::Winning {
            info!(winner = ?state.winner(), "Game won");
            state.set_phase(GamePhase::Win);
            return Ok(());
        }

        if !state.phase().accepts_moves() {
            return Ok(());
        }

        let len = state.moves().len();
        if len == self.seen {
            return Ok(());
        }
        self.seen = len;

        let moves = state.moves().as_slice();
        let Some((current, prior)) = moves.split_last() else {
            return Ok(());
        };
        if !current.is_mark() {
            return Ok(());
        }

        if is_win(prior, current, self.players) {
            let winner = current.user_id();
            info!(winner, "Line completed");
            state.set_winner(Some(winner));
            state.set_phase(GamePhase::Winning);
        }

        Ok(())
    }
}
