use super::PlayerId;

/// Errors that can occur while talking to the player-control service
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    /// The service executable could not be started
    #[error("failed to launch '{binary}': {details}")]
    Launch {
        /// Executable that failed to start
        binary: String,
        /// Underlying error
        details: String,
    },

    /// A status query for one player failed
    #[error("player {0} is unavailable: {1}")]
    PlayerUnavailable(PlayerId, String),

    /// The service produced output that could not be decoded
    #[error("malformed status: {0}")]
    Parse(#[from] ParseError),

    /// A control command exited unsuccessfully
    #[error("command '{command}' failed for player {player}: {details}")]
    CommandFailed {
        /// Player the command was sent to
        player: PlayerId,
        /// Name of the command
        command: String,
        /// Exit status or error details
        details: String,
    },

    /// I/O error on the service's pipes
    #[error("I/O error talking to player service: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Whether the error means the service itself is gone.
    ///
    /// Only launch failures are fatal; everything else concerns a single
    /// player or a single request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ServiceError::Launch { .. })
    }
}

/// Errors decoding a status line
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The line does not have the status layout
    #[error("line does not match the status format")]
    Malformed,

    /// A numeric field holds something other than a non-negative integer
    #[error("invalid {field} value '{value}'")]
    InvalidNumber {
        /// Field name
        field: &'static str,
        /// Raw field text
        value: String,
    },
}
