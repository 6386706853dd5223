//! Priority-ordered dispatcher for mini state machines.
//!
//! A [`Dispatcher`] owns the [`GameState`] of one game together with an ordered list of
//! [`Registration`]s. For every input event each registered machine is invoked in order
//! against the same state; the first failure aborts the pass.
//!
//! # Ordering
//!
//! Registrations are kept sorted by priority class, then by priority value:
//!
//! | Priority | Position | Among equals |
//! |----------|----------|--------------|
//! | `> 0` | first, `1` before `2` | arrival order |
//! | `0` | after all positives | arrival order |
//! | `< 0` | last, `-4` before `-1` | arrival order |
//!
//! So `1` means "run first" and `-1` means "run last".

use std::cmp::Ordering;

use tracing::{debug, error, info, instrument, warn};

use crate::error::{DispatchError, MachineError};
use crate::state::{GameInput, GameState};

/// Maximum number of machines a dispatcher accepts by default.
pub const MAX_REGISTRATIONS: usize = 100;

/// A small unit of game logic that observes and conditionally mutates the shared state.
pub trait MiniStateMachine {
    /// Processes one input event.
    ///
    /// # Errors
    ///
    /// Any error aborts the remaining machines for this event.
    fn next_state(&mut self, input: &GameInput, state: &mut GameState) -> Result<(), MachineError>;
}

impl<F> MiniStateMachine for F
where
    F: FnMut(&GameInput, &mut GameState) -> Result<(), MachineError>,
{
    fn next_state(&mut self, input: &GameInput, state: &mut GameState) -> Result<(), MachineError> {
        self(input, state)
    }
}

/// A mini state machine together with its id and priority.
pub struct Registration {
    id: String,
    priority: i32,
    machine: Box<dyn MiniStateMachine>,
}

impl Registration {
    /// Creates a registration.
    pub fn new(
        id: impl Into<String>,
        priority: i32,
        machine: impl MiniStateMachine + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            priority,
            machine: Box::new(machine),
        }
    }

    /// Returns the machine id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    fn rank(&self) -> (u8, i32) {
        let class = match self.priority.cmp(&0) {
            Ordering::Greater => 0,
            Ordering::Equal => 1,
            Ordering::Less => 2,
        };
        (class, self.priority)
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Owns the game state and the ordered mini state machines that drive it.
#[derive(Debug)]
pub struct Dispatcher {
    registrations: Vec<Registration>,
    capacity: usize,
    state: GameState,
}

impl Dispatcher {
    /// Creates a dispatcher accepting up to [`MAX_REGISTRATIONS`] machines.
    #[instrument(skip(state))]
    pub fn new(state: GameState) -> Self {
        Self::with_capacity(state, MAX_REGISTRATIONS)
    }

    /// Creates a dispatcher accepting up to `capacity` machines.
    #[instrument(skip(state))]
    pub fn with_capacity(state: GameState, capacity: usize) -> Self {
        Self {
            registrations: Vec::new(),
            capacity,
            state,
        }
    }

    /// Inserts a machine at its priority position.
    ///
    /// Returns the index it was stored at, or `None` when the dispatcher is full and the
    /// registration was dropped.
    #[instrument(skip(self, registration), fields(id = %registration.id, priority = registration.priority))]
    pub fn register(&mut self, registration: Registration) -> Option<usize> {
        if self.registrations.len() >= self.capacity {
            warn!(
                capacity = self.capacity,
                "Dispatcher is full, dropping mini state machine"
            );
            return None;
        }

        let rank = registration.rank();
        let index = self
            .registrations
            .iter()
            .position(|existing| existing.rank() > rank)
            .unwrap_or(self.registrations.len());

        debug!(index, "Registering mini state machine");
        self.registrations.insert(index, registration);
        Some(index)
    }

    /// Runs every registered machine, in order, for one input event.
    ///
    /// `None` and `Invalid` events are ignored without touching the state.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] naming the first machine that failed. Machines after it
    /// are not run for this event.
    #[instrument(skip(self), fields(phase = %self.state.phase()))]
    pub fn dispatch(&mut self, input: GameInput) -> Result<(), DispatchError> {
        if !input.event.is_actionable() {
            debug!("Ignoring non-actionable input");
            return Ok(());
        }

        for registration in &mut self.registrations {
            debug!(id = %registration.id, "Processing mini state machine");

            if let Err(source) = registration.machine.next_state(&input, &mut self.state) {
                error!(id = %registration.id, error = %source, "Mini state machine failed");
                return Err(DispatchError {
                    machine: registration.id.clone(),
                    source,
                });
            }
        }

        if self.state.phase().is_terminal() {
            info!(phase = %self.state.phase(), "Game reached a terminal phase");
        }

        Ok(())
    }

    /// Returns the game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the registered machine ids in run order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.registrations.iter().map(Registration::id)
    }

    /// Returns the registered priorities in run order.
    pub fn priorities(&self) -> impl Iterator<Item = i32> + '_ {
        self.registrations.iter().map(Registration::priority)
    }

    /// Returns the number of registered machines.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DeviceId, GamePhase, InputEvent};

    fn noop(_: &GameInput, _: &mut GameState) -> Result<(), MachineError> {
        Ok(())
    }

    fn register_all(priorities: &[i32]) -> Dispatcher {
        let mut dispatcher = Dispatcher::new(GameState::default());
        for (i, &p) in priorities.iter().enumerate() {
            dispatcher.register(Registration::new(format!("sm{i}"), p, noop));
        }
        dispatcher
    }

    #[test]
    fn test_positive_priorities_sort_ascending_before_zero() {
        let dispatcher = register_all(&[0, 3, 1, 4, 0, 2, 5]);
        let order: Vec<_> = dispatcher.priorities().collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5, 0, 0]);
    }

    #[test]
    fn test_negative_priorities_sort_after_zero() {
        let dispatcher = register_all(&[0, -3, -1, -4, 0, -2, -5]);
        let order: Vec<_> = dispatcher.priorities().collect();
        assert_eq!(order, vec![0, 0, -5, -4, -3, -2, -1]);
    }

    #[test]
    fn test_zero_priorities_keep_arrival_order() {
        let dispatcher = register_all(&[0, -2, 1, -1, 0, 2, 0]);
        let ids: Vec<_> = dispatcher.ids().collect();
        assert_eq!(ids, vec!["sm2", "sm5", "sm0", "sm4", "sm6", "sm1", "sm3"]);
    }

    #[test]
    fn test_registrations_beyond_capacity_are_dropped() {
        let mut dispatcher = Dispatcher::with_capacity(GameState::default(), 2);
        assert_eq!(dispatcher.register(Registration::new("a", 0, noop)), Some(0));
        assert_eq!(dispatcher.register(Registration::new("b", 1, noop)), Some(0));
        assert_eq!(dispatcher.register(Registration::new("c", 2, noop)), None);
        assert_eq!(dispatcher.len(), 2);
    }

    #[test]
    fn test_failure_stops_remaining_machines() {
        let mut dispatcher = Dispatcher::new(GameState::default());
        dispatcher.register(Registration::new(
            "fails",
            1,
            |_: &GameInput, _: &mut GameState| -> Result<(), MachineError> {
                Err(MachineError::UserOutOfRange {
                    user: 7,
                    players: 2,
                })
            },
        ));
        dispatcher.register(Registration::new(
            "quits",
            2,
            |_: &GameInput, state: &mut GameState| -> Result<(), MachineError> {
                state.set_phase(GamePhase::Quit);
                Ok(())
            },
        ));

        let err = dispatcher
            .dispatch(GameInput::new(InputEvent::Select, DeviceId(0)))
            .unwrap_err();

        assert_eq!(err.machine, "fails");
        assert_eq!(dispatcher.state().phase(), GamePhase::Play);
    }
}
