//! Terminal tic-tac-toe.
//!
//! The game itself lives in [`tictacterm_core`]; this crate supplies its collaborators:
//!
//! - **Config**: named variables from the environment, a TOML file and defaults
//! - **Input**: key mappings and the keyboard reader task
//! - **Display**: the ratatui board renderer
//! - **Session**: wires one game together and feeds it device input
//! - **Terminal**: raw mode setup, restore on exit or panic, shutdown signals

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod display;
mod input;
mod session;
mod terminal;

pub use config::{
    ConfigError, ConfigRegistry, DEFAULT_INPUT, DISPLAY, ENV_PREFIX, GameConfig, MAX_CONFIG_VARS,
    MAX_PLAYERS, MIN_PLAYERS, MOVES_CAPACITY, USERS_AMOUNT, user_input_var,
};
pub use display::{CliRenderer, DisplayKind, SYMBOLS, draw, status_line, symbol};
pub use input::{
    InputDevice, InputError, InputRegistry, KeyboardReader, is_interrupt, spawn_keyboard_reader,
};
pub use session::{Session, SessionError};
pub use terminal::{enter_terminal, restore_terminal, shutdown_signal};
