//! Terminal ownership and shutdown signals.

use std::io;

use crossterm::{cursor::Show, execute};
use ratatui::DefaultTerminal;
use tracing::{debug, instrument, warn};

/// Switches to raw mode on the alternate screen.
///
/// Also installs a panic hook that restores the terminal before the panic message is
/// printed.
///
/// # Errors
///
/// Returns the terminal error if raw mode or the alternate screen cannot be entered.
#[instrument]
pub fn enter_terminal() -> io::Result<DefaultTerminal> {
    debug!("Entering raw mode on the alternate screen");
    ratatui::try_init()
}

/// Leaves raw mode and the alternate screen and shows the cursor.
///
/// Safe to call more than once.
#[instrument]
pub fn restore_terminal() {
    ratatui::restore();
    if let Err(e) = execute!(io::stdout(), Show) {
        warn!(error = %e, "Failed to show cursor");
    }
}

/// Waits for SIGINT, SIGTERM or SIGHUP and returns the signal name.
///
/// In raw mode Ctrl-C arrives as a key press, so SIGINT only comes from outside the
/// terminal. If the handlers cannot be installed this never returns.
#[instrument]
pub async fn shutdown_signal() -> &'static str {
    match wait_for_signal().await {
        Ok(name) => name,
        Err(e) => {
            warn!(error = %e, "Unable to listen for shutdown signals");
            std::future::pending().await
        }
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
        _ = hangup.recv() => Ok("SIGHUP"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|()| "ctrl-c")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_signal_waits_without_a_signal() {
        let waited = tokio::time::timeout(Duration::from_millis(20), shutdown_signal()).await;
        assert!(waited.is_err());
    }
}
