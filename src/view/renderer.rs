use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveUp, RestorePosition, SavePosition, Show},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};

use super::layout::frame;
use crate::model::AppState;

/// Rows reserved below the prompt before the first frame.
const RESERVED_ROWS: u16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NotYetRendered,
    Rendered,
}

/// Draws frames in place below the cursor.
///
/// The first draw hides the cursor and reserves space; every draw then
/// saves the cursor, clears below it, writes the frame and restores the
/// cursor, so redraws never scroll. After [`restore`](Self::restore) the
/// renderer draws nothing more.
pub struct TerminalRenderer<W: Write> {
    out: W,
    phase: Phase,
    restored: bool,
}

impl<W: Write> TerminalRenderer<W> {
    /// Creates a renderer that has not drawn anything yet.
    pub fn new(out: W) -> Self {
        Self {
            out,
            phase: Phase::NotYetRendered,
            restored: false,
        }
    }

    /// Whether at least one frame has been drawn.
    #[cfg(test)]
    pub(crate) fn has_rendered(&self) -> bool {
        self.phase == Phase::Rendered
    }

    /// Draws `state`.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to the terminal.
    pub fn draw(&mut self, state: &AppState) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }

        if self.phase == Phase::NotYetRendered {
            queue!(
                self.out,
                Hide,
                Print("\n".repeat(usize::from(RESERVED_ROWS))),
                MoveUp(RESERVED_ROWS)
            )?;
            self.phase = Phase::Rendered;
        }

        queue!(
            self.out,
            SavePosition,
            Clear(ClearType::FromCursorDown),
            Print(frame(state)),
            RestorePosition
        )?;
        self.out.flush()
    }

    /// Shows the cursor again. Only the first call writes anything.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to the terminal.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        queue!(self.out, Show)?;
        self.out.flush()
    }

    /// The underlying writer.
    #[cfg(test)]
    pub(crate) fn writer(&self) -> &W {
        &self.out
    }
}
