use std::path::Path;

use thiserror::Error;

use crate::services::player::ServiceError;

/// Error types for the tuneline application.
///
/// Covers configuration loading, terminal setup and the fatal failures of
/// the player-control service that end the process.
#[derive(Error, Debug)]
pub enum TunelineError {
    /// Configuration field missing or invalid
    #[error("invalid config field '{field}' in {component}: {reason}")]
    InvalidConfigField {
        /// The field that is invalid
        field: String,
        /// Component containing the field
        component: String,
        /// Reason why the field is invalid
        reason: String,
    },

    /// I/O operation error on a known path
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: std::path::PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// The player-control service failed in a way the UI cannot recover from
    #[error("player service failed: {0}")]
    Service(#[from] ServiceError),

    /// Logging could not be initialised
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// A specialized `Result` type for tuneline operations.
pub type Result<T> = std::result::Result<T, TunelineError>;

impl TunelineError {
    /// Creates a TOML parsing error with optional file path context.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying parsing error
    /// * `path` - Optional path to the file that failed to parse
    pub fn toml_parse(error: impl std::fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        TunelineError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Creates an invalid-field error for a config section.
    pub fn invalid_field(component: &str, field: &str, reason: impl Into<String>) -> Self {
        TunelineError::InvalidConfigField {
            field: field.to_string(),
            component: component.to_string(),
            reason: reason.into(),
        }
    }
}
