use std::{io, panic};

use crossterm::{cursor::Show, execute, terminal};
use tracing::warn;

use crate::model::WindowSize;

/// Keeps the terminal in raw mode while alive.
pub struct RawModeGuard(());

impl RawModeGuard {
    /// Switches the terminal to raw mode.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin is not a terminal.
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self(()))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!(error = %e, "Failed to leave raw mode");
        }
    }
}

/// Current terminal size, or 80x24 if it cannot be read.
pub fn window_size() -> WindowSize {
    match terminal::size() {
        Ok((width, height)) => WindowSize { width, height },
        Err(e) => {
            warn!(error = %e, "Could not read terminal size");
            WindowSize {
                width: 80,
                height: 24,
            }
        }
    }
}

/// Leaves raw mode and shows the cursor before a panic message is printed.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), Show);
        original_hook(panic_info);
    }));
}
