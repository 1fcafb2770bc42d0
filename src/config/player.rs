use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Player-control service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Name or path of the `playerctl` executable.
    pub binary: String,

    /// Player name patterns to ignore during discovery
    pub ignored_players: Vec<String>,

    /// Interval between full player list and status polls, in milliseconds.
    pub poll_interval_ms: u64,
}

impl PlayerConfig {
    /// Poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            binary: String::from("playerctl"),
            ignored_players: Vec::new(),
            poll_interval_ms: 1000,
        }
    }
}
