use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Seek key configuration.
///
/// Every seek keypress moves the pending offset by `step_seconds`; the
/// accumulated offset is committed once no seek key has been pressed for
/// `debounce_ms`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeekConfig {
    /// Seconds added or removed per keypress.
    pub step_seconds: i64,

    /// Quiet window before the pending offset is sent to the player.
    pub debounce_ms: u64,
}

impl SeekConfig {
    /// Debounce window as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SeekConfig {
    fn default() -> Self {
        Self {
            step_seconds: 5,
            debounce_ms: 300,
        }
    }
}
