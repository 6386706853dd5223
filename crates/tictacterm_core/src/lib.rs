//! Tic-tac-toe game state machine.
//!
//! A game is driven by a [`Dispatcher`] that owns the [`GameState`] and runs a chain of
//! small [`MiniStateMachine`]s against it for every input event. The run order is fixed by
//! each machine's priority, not by the order in which they were registered.
//!
//! # Example
//!
//! ```
//! use tictacterm_core::{
//!     DeviceId, Dispatcher, GameInput, GamePhase, GameState, InputEvent, MoveRecorder,
//!     QuitMachine, TurnTracker, WinDetector,
//! };
//!
//! let mut dispatcher = Dispatcher::new(GameState::default());
//! dispatcher.register(QuitMachine::new().registration());
//! dispatcher.register(WinDetector::new(2).registration());
//! dispatcher.register(MoveRecorder::new(3).registration());
//! dispatcher.register(TurnTracker::new(2).registration());
//!
//! dispatcher.dispatch(GameInput::new(InputEvent::Exit, DeviceId(0)))?;
//! assert_eq!(dispatcher.state().phase(), GamePhase::Quitting);
//! # Ok::<(), tictacterm_core::DispatchError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod machine;
mod machines;
mod moves;
mod state;

pub use error::{CapacityExceeded, DispatchError, MachineError, RenderError};
pub use machine::{Dispatcher, MAX_REGISTRATIONS, MiniStateMachine, Registration};
pub use machines::{
    BoardRenderer, DISPLAY_PRIORITY, DisplayData, DisplayMachine, MoveRecorder, QUIT_PRIORITY,
    QuitMachine, RECORDER_PRIORITY, TURN_PRIORITY, TurnTracker, WIN_PRIORITY, WinDetector, is_win,
    is_win_diagonal, is_win_horizontal, is_win_vertical,
};
pub use moves::{Coordinates, DEFAULT_LEDGER_CAPACITY, MoveLedger, MoveType, UserMove};
pub use state::{DeviceId, GameInput, GamePhase, GameState, InputEvent};
