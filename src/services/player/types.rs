use std::fmt;

/// Unique identifier for a media player, as reported by `playerctl -l`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a PlayerId from a player name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the player name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Current playback state of a media player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Player is currently playing
    Playing,

    /// Player is paused
    Paused,

    /// Player is stopped
    #[default]
    Stopped,
}

impl From<&str> for PlaybackState {
    fn from(status: &str) -> Self {
        match status {
            "Playing" => Self::Playing,
            "Paused" => Self::Paused,
            _ => Self::Stopped,
        }
    }
}

/// What one player is doing right now.
///
/// Replaced wholesale on every update for that player. `position` is not
/// clamped to `length`; the renderer does that when it draws.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaState {
    /// Playback status
    pub status: PlaybackState,

    /// Track title, possibly empty
    pub title: String,

    /// Track artist(s), possibly empty
    pub artist: String,

    /// Track length in microseconds
    pub length: u64,

    /// Playback position in microseconds
    pub position: u64,
}

impl MediaState {
    /// The state shown for a stopped player: no track, zero length and position.
    pub fn stopped() -> Self {
        Self::default()
    }

    /// Whether the player reports it is playing.
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackState::Playing
    }
}

crate::merge_by_replacement!(PlayerId, MediaState);

/// Transport commands forwarded to the player without local state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCommand {
    /// Toggle play/pause
    PlayPause,

    /// Skip to next track
    Next,

    /// Go to previous track
    Previous,
}

impl TransportCommand {
    /// The `playerctl` subcommand for this action.
    pub fn as_arg(self) -> &'static str {
        match self {
            TransportCommand::PlayPause => "play-pause",
            TransportCommand::Next => "next",
            TransportCommand::Previous => "previous",
        }
    }
}
