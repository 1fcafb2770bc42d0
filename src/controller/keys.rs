use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::services::player::TransportCommand;

/// What a keypress asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Select the player before the current one
    PreviousPlayer,
    /// Select the player after the current one
    NextPlayer,
    /// Send a transport command to the selected player
    Transport(TransportCommand),
    /// Move the pending seek one step
    Seek(SeekDirection),
    /// Leave the program
    Exit,
}

/// Direction of a seek key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDirection {
    /// Toward the start of the track
    Backward,
    /// Toward the end of the track
    Forward,
}

impl Action {
    /// Maps a key event to an action. Keys without a binding give `None`.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Action::Exit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('h') => Some(Action::PreviousPlayer),
            KeyCode::Char(';') => Some(Action::NextPlayer),
            KeyCode::Char('J') => Some(Action::Transport(TransportCommand::Previous)),
            KeyCode::Char('j') => Some(Action::Seek(SeekDirection::Backward)),
            KeyCode::Char('k') => Some(Action::Transport(TransportCommand::PlayPause)),
            KeyCode::Char('l') => Some(Action::Seek(SeekDirection::Forward)),
            KeyCode::Char('L') => Some(Action::Transport(TransportCommand::Next)),
            _ => None,
        }
    }
}
