use std::{fs, path::Path};

use tracing::{debug, info, instrument};

use super::{Config, ConfigPaths};
use crate::{Result, TunelineError};

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// A missing file is not an error: defaults are used and nothing is
    /// written to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined, the
    /// file cannot be read, the TOML is invalid, or a value fails validation.
    pub fn load() -> Result<Config> {
        let path = ConfigPaths::main_config()?;
        Self::load_from(&path)
    }

    /// Loads the configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The TOML content is invalid
    /// - A value fails validation
    #[instrument]
    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            info!("No config file found, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| TunelineError::IoError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

        let config = Self::from_toml_str(&content).map_err(|e| match e {
            TunelineError::TomlParseError { details, .. } => {
                TunelineError::toml_parse(details, Some(path))
            }
            other => other,
        })?;

        debug!(?config, "Loaded configuration");
        Ok(config)
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `TomlParseError` for malformed TOML and
    /// `InvalidConfigField` for values outside their allowed range.
    pub fn from_toml_str(content: &str) -> Result<Config> {
        let config: Config =
            toml::from_str(content).map_err(|e| TunelineError::toml_parse(e, None))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.player.binary.trim().is_empty() {
            return Err(TunelineError::invalid_field(
                "player",
                "binary",
                "must name an executable",
            ));
        }

        if self.player.poll_interval_ms == 0 {
            return Err(TunelineError::invalid_field(
                "player",
                "poll_interval_ms",
                "must be greater than zero",
            ));
        }

        if self.seek.step_seconds <= 0 {
            return Err(TunelineError::invalid_field(
                "seek",
                "step_seconds",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}
