//! The mini state machines that make up one game.
//!
//! | Machine | Id | Priority |
//! |---------|----|----------|
//! | [`TurnTracker`] | `turn` | 1 |
//! | [`MoveRecorder`] | `user_move` | 2 |
//! | [`WinDetector`] | `win` | 4 |
//! | [`QuitMachine`] | `quit` | 0 |
//! | [`DisplayMachine`] | `display` | -1 |

mod display;
mod quit;
mod recorder;
mod turn;
mod win;

pub use display::{BoardRenderer, DisplayData, DisplayMachine};
pub use quit::QuitMachine;
pub use recorder::MoveRecorder;
pub use turn::TurnTracker;
pub use win::{WinDetector, is_win, is_win_diagonal, is_win_horizontal, is_win_vertical};

use crate::machine::Registration;

/// Priority of the turn tracker, runs first.
pub const TURN_PRIORITY: i32 = 1;
/// Priority of the move recorder.
pub const RECORDER_PRIORITY: i32 = 2;
/// Priority of the win detector.
pub const WIN_PRIORITY: i32 = 4;
/// Priority of the quit machine.
pub const QUIT_PRIORITY: i32 = 0;
/// Priority of the display trigger, runs last.
pub const DISPLAY_PRIORITY: i32 = -1;

impl TurnTracker {
    /// Wraps the tracker in a registration with its standard id and priority.
    pub fn registration(self) -> Registration {
        Registration::new("turn", TURN_PRIORITY, self)
    }
}

impl MoveRecorder {
    /// Wraps the recorder in a registration with its standard id and priority.
    pub fn registration(self) -> Registration {
        Registration::new("user_move", RECORDER_PRIORITY, self)
    }
}

impl WinDetector {
    /// Wraps the detector in a registration with its standard id and priority.
    pub fn registration(self) -> Registration {
        Registration::new("win", WIN_PRIORITY, self)
    }
}

impl QuitMachine {
    /// Wraps the machine in a registration with its standard id and priority.
    pub fn registration(self) -> Registration {
        Registration::new("quit", QUIT_PRIORITY, self)
    }
}

impl DisplayMachine {
    /// Wraps the machine in a registration with its standard id and priority.
    pub fn registration(self) -> Registration {
        Registration::new("display", DISPLAY_PRIORITY, self)
    }
}
