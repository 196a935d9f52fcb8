//! Record store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Record store access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Upper bound for a single store call in milliseconds.
    ///
    /// A call that exceeds it fails with `StoreUnavailable`.
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_ms: u64,
    /// Buffer size of each collection's change feed.
    #[serde(default = "default_change_buffer")]
    pub change_buffer_size: usize,
}

impl StoreConfig {
    /// The operation timeout as a [`Duration`].
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            operation_timeout_ms: default_operation_timeout(),
            change_buffer_size: default_change_buffer(),
        }
    }
}

fn default_operation_timeout() -> u64 {
    5_000
}

fn default_change_buffer() -> usize {
    256
}
