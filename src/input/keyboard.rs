//! Keyboard reader task.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::{self, Event};
use tictacterm_core::GameInput;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, trace};

use super::{InputError, InputRegistry, is_interrupt};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Handle to a running keyboard reader.
///
/// Dropping the handle does not stop the reader; call [`KeyboardReader::stop`].
#[derive(Debug)]
pub struct KeyboardReader {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<Result<(), InputError>>,
}

impl KeyboardReader {
    /// Asks the reader to stop and waits for it.
    ///
    /// # Errors
    ///
    /// Returns the reader's terminal error, if it failed.
    #[instrument(skip(self))]
    pub async fn stop(self) -> Result<(), InputError> {
        self.stop.store(true, Ordering::Relaxed);
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(InputError::Io(std::io::Error::other(e))),
        }
    }
}

/// Spawns a blocking task that polls the terminal and forwards mapped key presses.
///
/// Every key press is mapped through all devices in `registry`; each resulting event is
/// sent tagged with its device id. The reader ends when stopped, when the receiver is
/// dropped, or on Ctrl-C, which closes the channel and so ends the session.
#[instrument(skip(registry, tx), fields(devices = registry.len()))]
pub fn spawn_keyboard_reader(
    registry: InputRegistry,
    tx: mpsc::UnboundedSender<GameInput>,
) -> KeyboardReader {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);

    let handle = tokio::task::spawn_blocking(move || -> Result<(), InputError> {
        info!("Keyboard reader started");

        while !flag.load(Ordering::Relaxed) && !tx.is_closed() {
            if !event::poll(POLL_INTERVAL)? {
                continue;
            }

            let Event::Key(key) = event::read()? else {
                continue;
            };
            trace!(?key, "Key event");

            if is_interrupt(&key) {
                info!("Ctrl-C pressed, closing input");
                return Ok(());
            }

            for input in registry.map_key(&key) {
                debug!(event = %input.event, device = %input.device, "Forwarding input");
                if tx.send(input).is_err() {
                    info!("Input receiver closed");
                    return Ok(());
                }
            }
        }

        info!("Keyboard reader stopped");
        Ok(())
    });

    KeyboardReader { stop, handle }
}
