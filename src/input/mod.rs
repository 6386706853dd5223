//! Input devices.
//!
//! An input device is a named key mapping that turns terminal key presses into
//! [`InputEvent`]s. Devices are registered by name in an [`InputRegistry`], which hands out
//! the [`DeviceId`] that tags every event the device produces.

mod keyboard;

pub use keyboard::{KeyboardReader, spawn_keyboard_reader};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use derive_more::{Display, Error, From};
use tictacterm_core::{DeviceId, GameInput, InputEvent};
use tracing::{debug, instrument, warn};

/// Input subsystem error.
#[derive(Debug, Display, Error, From)]
pub enum InputError {
    /// No device with that name exists.
    #[display("Unknown input device '{}'", _0)]
    #[from(skip)]
    UnknownDevice(#[error(not(source))] String),

    /// Reading the terminal failed.
    #[display("Terminal input failed: {}", _0)]
    Io(std::io::Error),
}

/// Returns true for Ctrl-C, which ends the game on any device.
///
/// Raw mode turns Ctrl-C into an ordinary key press instead of SIGINT.
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c'))
}

/// Available key mappings.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum InputDevice {
    /// `w`/`a`/`s`/`d` to move, `Enter` to select, `q` to quit.
    Keyboard1,
    /// Arrow keys to move, `Space` to select, `Esc` to quit.
    Keyboard2,
}

impl InputDevice {
    /// Maps a key press to an input event.
    ///
    /// Keys the device does not own map to [`InputEvent::None`]. `keyboard1` reports any
    /// other printable character as [`InputEvent::Invalid`].
    pub fn map_key(self, key: &KeyEvent) -> InputEvent {
        if key.kind == KeyEventKind::Release || key.modifiers.contains(KeyModifiers::CONTROL) {
            return InputEvent::None;
        }

        match self {
            InputDevice::Keyboard1 => match key.code {
                KeyCode::Char('w') => InputEvent::Up,
                KeyCode::Char('s') => InputEvent::Down,
                KeyCode::Char('a') => InputEvent::Left,
                KeyCode::Char('d') => InputEvent::Right,
                KeyCode::Enter => InputEvent::Select,
                KeyCode::Char('q') => InputEvent::Exit,
                KeyCode::Char(' ') => InputEvent::None,
                KeyCode::Char(_) => InputEvent::Invalid,
                _ => InputEvent::None,
            },
            InputDevice::Keyboard2 => match key.code {
                KeyCode::Up => InputEvent::Up,
                KeyCode::Down => InputEvent::Down,
                KeyCode::Left => InputEvent::Left,
                KeyCode::Right => InputEvent::Right,
                KeyCode::Char(' ') => InputEvent::Select,
                KeyCode::Esc => InputEvent::Exit,
                _ => InputEvent::None,
            },
        }
    }
}

/// Registered input devices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRegistry {
    devices: Vec<InputDevice>,
}

impl InputRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a device by name and returns its id.
    ///
    /// Registering the same device twice returns the existing id.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::UnknownDevice`] if no device has that name.
    #[instrument(skip(self))]
    pub fn register(&mut self, name: &str) -> Result<DeviceId, InputError> {
        let device: InputDevice = name.trim().parse().map_err(|_| {
            warn!("Unknown input device");
            InputError::UnknownDevice(name.to_string())
        })?;

        if let Some(index) = self.devices.iter().position(|d| *d == device) {
            return Ok(DeviceId(index));
        }

        self.devices.push(device);
        let id = DeviceId(self.devices.len() - 1);
        debug!(%id, %device, "Registered input device");
        Ok(id)
    }

    /// Returns the device registered under `id`.
    pub fn device(&self, id: DeviceId) -> Option<InputDevice> {
        self.devices.get(id.0).copied()
    }

    /// Returns the number of registered devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns true if no device is registered.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Maps a key press through every registered device.
    ///
    /// Devices that ignore the key produce nothing.
    pub fn map_key(&self, key: &KeyEvent) -> Vec<GameInput> {
        self.devices
            .iter()
            .enumerate()
            .map(|(i, device)| GameInput::new(device.map_key(key), DeviceId(i)))
            .filter(|input| input.event != InputEvent::None)
            .collect()
    }
}
