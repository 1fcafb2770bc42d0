//! Configuration schema definitions and loading.
//!
//! Defines the configuration structure for tuneline: logging, the
//! player-control service and seek behaviour. Key bindings are fixed and
//! not part of the schema.

mod general;
mod loading;
mod paths;
mod player;
mod seek;

pub use general::{GeneralConfig, LogLevel};
pub use paths::ConfigPaths;
pub use player::PlayerConfig;
pub use seek::SeekConfig;

use serde::{Deserialize, Serialize};

/// Main configuration structure for tuneline.
///
/// Represents the complete configuration schema that can be loaded
/// from a TOML file. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Player-control service settings.
    #[serde(default)]
    pub player: PlayerConfig,

    /// Seek key behaviour.
    #[serde(default)]
    pub seek: SeekConfig,
}
