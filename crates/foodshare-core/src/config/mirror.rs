//! Profile mirror configuration.

use serde::{Deserialize, Serialize};

/// In-memory profile mirror settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Maximum number of mirrored profiles.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// Time-to-live for mirrored profiles in seconds.
    #[serde(default = "default_ttl")]
    pub time_to_live_seconds: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            time_to_live_seconds: default_ttl(),
        }
    }
}

fn default_max_capacity() -> u64 {
    10_000
}

fn default_ttl() -> u64 {
    600
}
