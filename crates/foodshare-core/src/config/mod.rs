//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files and `FOODSHARE__*` environment variables. Every field
//! has a default, so an empty configuration is valid.

pub mod logging;
pub mod mirror;
pub mod notification;
pub mod store;

use serde::{Deserialize, Serialize};

pub use self::logging::LoggingConfig;
pub use self::mirror::MirrorConfig;
pub use self::notification::NotificationConfig;
pub use self::store::StoreConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Record store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Notification fan-out settings.
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Profile mirror settings.
    #[serde(default)]
    pub mirror: MirrorConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `FOODSHARE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FOODSHARE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialize fine but cannot work.
    pub fn validate(&self) -> Result<(), AppError> {
        self.notifications.validate()
    }
}
