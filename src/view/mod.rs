//! Terminal display.
//!
//! [`frame`] maps a state snapshot to the text of one frame and does no I/O.
//! [`TerminalRenderer`] writes frames in place; [`attach`] wires it to the
//! store so every update redraws and exit shows the cursor again.

mod layout;
mod progress;
mod renderer;
mod text;
mod time;


use std::{
    io::Write,
    sync::{Arc, Mutex, MutexGuard},
};

use tracing::warn;

pub use layout::{FULL_LAYOUT_HEIGHT, MIN_WIDTH, TOO_SMALL, frame};
pub use progress::{marker_index, markers, progress, seek_bar};
pub use renderer::TerminalRenderer;
pub use text::{display_width, fit_title_artist, slice_columns};
pub use time::{format_micros, format_skip, format_time, time_line};

use crate::model::{AppEvent, AppStore};

/// Registers `renderer` on `store`: draws on every update and restores the
/// cursor on exit. Returns the shared renderer.
pub fn attach<W>(store: &AppStore, renderer: TerminalRenderer<W>) -> Arc<Mutex<TerminalRenderer<W>>>
where
    W: Write + Send + 'static,
{
    let renderer = Arc::new(Mutex::new(renderer));

    let drawing = Arc::clone(&renderer);
    store.subscribe(AppEvent::Update, move |state| {
        if let Err(e) = lock(&drawing).draw(state) {
            warn!(error = %e, "Failed to draw frame");
        }
    });

    let restoring = Arc::clone(&renderer);
    store.subscribe(AppEvent::Exit, move |_| {
        if let Err(e) = lock(&restoring).restore() {
            warn!(error = %e, "Failed to restore cursor");
        }
    });

    renderer
}

fn lock<W: Write>(renderer: &Mutex<TerminalRenderer<W>>) -> MutexGuard<'_, TerminalRenderer<W>> {
    match renderer.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
