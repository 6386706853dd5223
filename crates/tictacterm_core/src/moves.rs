//! User moves and the append-only move ledger.
//!
//! Every input event that reaches the game turns into exactly one [`UserMove`],
//! which is appended to the [`MoveLedger`] and never modified afterwards.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::CapacityExceeded;

/// Default number of moves a ledger can hold.
pub const DEFAULT_LEDGER_CAPACITY: usize = 1024;

/// What a recorded move did.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum MoveType {
    /// Cursor moved onto a cell.
    Highlight,
    /// A mark was placed on an empty cell.
    SelectValid,
    /// Selection of an already taken cell.
    SelectInvalid,
    /// The user asked to quit.
    Quit,
}

/// Board coordinates, `x` is the column and `y` the row, both in `[0, side)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_new::new,
)]
pub struct Coordinates {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

/// A single recorded move. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserMove {
    move_type: MoveType,
    user_id: usize,
    coordinates: Coordinates,
}

impl UserMove {
    /// Creates a new move.
    #[instrument]
    pub fn new(move_type: MoveType, user_id: usize, coordinates: Coordinates) -> Self {
        Self {
            move_type,
            user_id,
            coordinates,
        }
    }

    /// Returns the move type.
    pub fn move_type(&self) -> MoveType {
        self.move_type
    }

    /// Returns the index of the user who made the move.
    pub fn user_id(&self) -> usize {
        self.user_id
    }

    /// Returns the cell the move refers to.
    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// Returns true if this move placed a mark.
    pub fn is_mark(&self) -> bool {
        self.move_type == MoveType::SelectValid
    }
}

impl std::fmt::Display for UserMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} by user {} at ({}, {})",
            self.move_type, self.user_id, self.coordinates.x, self.coordinates.y
        )
    }
}

/// Ordered, bounded history of all moves of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLedger {
    moves: Vec<UserMove>,
    capacity: usize,
}

impl MoveLedger {
    /// Creates an empty ledger holding at most `capacity` moves.
    #[instrument]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            moves: Vec::with_capacity(capacity.min(DEFAULT_LEDGER_CAPACITY)),
            capacity,
        }
    }

    /// Appends a move to the end of the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityExceeded`] when the ledger already holds `capacity` moves.
    #[instrument(skip(self), fields(len = self.moves.len(), capacity = self.capacity))]
    pub fn record(&mut self, user_move: UserMove) -> Result<(), CapacityExceeded> {
        if self.moves.len() >= self.capacity {
            warn!(%user_move, "Move ledger is full, dropping move");
            return Err(CapacityExceeded {
                capacity: self.capacity,
            });
        }

        debug!(%user_move, "Recording move");
        self.moves.push(user_move);
        Ok(())
    }

    /// Returns the most recently recorded move.
    pub fn last(&self) -> Option<&UserMove> {
        self.moves.last()
    }

    /// Returns all moves in recording order.
    pub fn as_slice(&self) -> &[UserMove] {
        &self.moves
    }

    /// Returns the number of recorded moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Returns true if no move has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns the maximum number of moves.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the mark placed on `cell`, if any.
    pub fn mark_at(&self, cell: Coordinates) -> Option<&UserMove> {
        self.moves
            .iter()
            .find(|m| m.is_mark() && m.coordinates == cell)
    }

    /// Returns the number of marks placed so far.
    pub fn mark_count(&self) -> usize {
        self.moves.iter().filter(|m| m.is_mark()).count()
    }
}

impl Default for MoveLedger {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LEDGER_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(user: usize, x: usize, y: usize) -> UserMove {
        UserMove::new(MoveType::SelectValid, user, Coordinates::new(x, y))
    }

    #[test]
    fn test_empty_ledger_has_no_last_move() {
        let ledger = MoveLedger::default();
        assert!(ledger.is_empty());
        assert_eq!(ledger.last(), None);
    }

    #[test]
    fn test_record_appends_in_order() {
        let mut ledger = MoveLedger::with_capacity(4);
        ledger.record(mark(0, 0, 0)).unwrap();
        ledger.record(mark(1, 1, 1)).unwrap();

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.as_slice()[0], mark(0, 0, 0));
        assert_eq!(ledger.last(), Some(&mark(1, 1, 1)));
    }

    #[test]
    fn test_record_fails_when_full() {
        let mut ledger = MoveLedger::with_capacity(1);
        ledger.record(mark(0, 0, 0)).unwrap();

        let err = ledger.record(mark(1, 1, 1)).unwrap_err();
        assert_eq!(err, CapacityExceeded { capacity: 1 });
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.last(), Some(&mark(0, 0, 0)));
    }

    #[test]
    fn test_move_display_names_type() {
        let m = UserMove::new(MoveType::SelectValid, 1, Coordinates::new(0, 2));
        assert_eq!(m.to_string(), "SelectValid by user 1 at (0, 2)");
        assert_eq!(MoveType::Quit.to_string(), "Quit");
    }

    #[test]
    fn test_mark_at_ignores_highlights() {
        let mut ledger = MoveLedger::default();
        ledger
            .record(UserMove::new(MoveType::Highlight, 0, Coordinates::new(2, 2)))
            .unwrap();
        assert_eq!(ledger.mark_at(Coordinates::new(2, 2)), None);

        ledger.record(mark(0, 2, 2)).unwrap();
        assert_eq!(ledger.mark_at(Coordinates::new(2, 2)), Some(&mark(0, 2, 2)));
        assert_eq!(ledger.mark_count(), 1);
    }
}
