//! One game from the first key press to a terminal phase.

use derive_more::{Display, Error, From};
use tictacterm_core::{
    BoardRenderer, DeviceId, DispatchError, Dispatcher, DisplayMachine, GameInput, GamePhase,
    GameState, MoveLedger, MoveRecorder, QuitMachine, RenderError, TurnTracker, WinDetector,
};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::config::GameConfig;
use crate::input::{InputError, InputRegistry};

/// Error starting or running a session.
#[derive(Debug, Display, Error, From)]
pub enum SessionError {
    /// A user's input device could not be resolved.
    #[display("{}", _0)]
    Input(InputError),
    /// The starting screen could not be drawn.
    #[display("{}", _0)]
    Render(RenderError),
    /// A dispatch pass failed.
    #[display("{}", _0)]
    Dispatch(DispatchError),
}

/// Owns the dispatcher of one game and routes device input to it.
#[derive(Debug)]
pub struct Session {
    dispatcher: Dispatcher,
    players: usize,
    user_devices: Vec<DeviceId>,
}

impl Session {
    /// Builds the game described by `config` and draws the starting screen.
    ///
    /// Each user's input device is registered in `inputs`, so the same registry can then
    /// feed the keyboard reader.
    ///
    /// # Errors
    ///
    /// Fails on an unknown input device name or if the starting screen cannot be drawn.
    #[instrument(skip_all, fields(players = config.players()))]
    pub fn start(
        config: &GameConfig,
        inputs: &mut InputRegistry,
        renderer: impl BoardRenderer + 'static,
    ) -> Result<Self, SessionError> {
        let players = *config.players();
        let side = config.board_side();

        let user_devices = config
            .inputs()
            .iter()
            .map(|name| inputs.register(name))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(?user_devices, "Resolved user input devices");

        let state = GameState::new(MoveLedger::with_capacity(*config.moves_capacity()));
        let mut display = DisplayMachine::new(renderer, config.display().to_string(), players, side);
        display.render(&state)?;

        let mut dispatcher = Dispatcher::new(state);
        for registration in [
            display.registration(),
            QuitMachine::new().registration(),
            WinDetector::new(players).registration(),
            MoveRecorder::new(side).registration(),
            TurnTracker::new(players).registration(),
        ] {
            dispatcher.register(registration);
        }

        info!(side, "Session started");
        Ok(Self {
            dispatcher,
            players,
            user_devices,
        })
    }

    /// Returns the game state.
    pub fn state(&self) -> &GameState {
        self.dispatcher.state()
    }

    /// Returns true once the game reached `Quit` or `Win`.
    pub fn is_over(&self) -> bool {
        self.state().phase().is_terminal()
    }

    /// Returns the device assigned to each user, index 0 is the first user.
    pub fn user_devices(&self) -> &[DeviceId] {
        &self.user_devices
    }

    /// Returns true if `device` may drive the next pass.
    fn accepts_device(&self, device: DeviceId) -> bool {
        if self.state().phase() == GamePhase::Winning {
            return self.user_devices.contains(&device);
        }

        let user = self.state().user_to_move(self.players);
        self.user_devices.get(user) == Some(&device)
    }

    /// Processes one input and returns whether the session should continue.
    ///
    /// Input from a device that does not belong to the user to move is ignored, except
    /// while a win is on screen, when any player's device may end the game.
    ///
    /// # Errors
    ///
    /// Propagates the failing mini state machine.
    #[instrument(skip(self), fields(phase = %self.state().phase()))]
    pub fn handle(&mut self, input: GameInput) -> Result<bool, DispatchError> {
        if self.is_over() {
            return Ok(false);
        }

        if !input.event.is_actionable() {
            debug!("Ignoring non-actionable input");
            return Ok(true);
        }

        if !self.accepts_device(input.device) {
            debug!("Input from a device the user to move does not own");
            return Ok(true);
        }

        self.dispatcher.dispatch(input)?;
        Ok(!self.is_over())
    }

    /// Consumes inputs until the game ends or the channel closes, returning the last phase.
    ///
    /// # Errors
    ///
    /// Propagates the failing mini state machine.
    #[instrument(skip_all)]
    pub async fn run(
        &mut self,
        rx: &mut mpsc::UnboundedReceiver<GameInput>,
    ) -> Result<GamePhase, DispatchError> {
        while let Some(input) = rx.recv().await {
            if !self.handle(input)? {
                break;
            }
        }

        let phase = self.state().phase();
        info!(%phase, winner = ?self.state().winner(), "Session finished");
        Ok(phase)
    }
}
