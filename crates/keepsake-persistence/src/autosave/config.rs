//! Auto-save configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for auto-save behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveConfig {
    /// Whether state changes schedule a save at all.
    pub enabled: bool,

    /// Debounce delay in milliseconds.
    ///
    /// After a change, the gateway waits this long before saving.
    /// Additional changes reset the timer.
    pub debounce_ms: u64,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 3000,
        }
    }
}

impl AutoSaveConfig {
    /// Create a disabled auto-save config.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
