//! FoodShare donation core.
//!
//! Wires the workspace crates together: loads configuration, initialises
//! logging, and builds the [`FoodShare`] service container that a UI layer
//! calls into.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use foodshare_core::config::{AppConfig, LoggingConfig};
use foodshare_core::error::AppError;
use foodshare_core::traits::{IdentityProvider, ProfileMirror, RecordStore};
use foodshare_service::{
    AuditService, DonationService, InboxService, NotificationService, Records, ScheduleService,
    StatsService, VisibilityService,
};
use foodshare_store::{MemoryIdentityProvider, MemoryProfileMirror, MemoryRecordStore};

pub use foodshare_core;
pub use foodshare_entity;
pub use foodshare_service;
pub use foodshare_store;

/// Load configuration for the environment named by `FOODSHARE_ENV`
/// (default `development`).
pub fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("FOODSHARE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env)?;
    tracing::info!(env = %env, "Configuration loaded");
    Ok(config)
}

/// Initialize tracing/logging.
///
/// `RUST_LOG` overrides the configured level. Calling this more than once
/// keeps the first subscriber.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .try_init(),
        _ => fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };
    if result.is_err() {
        tracing::debug!("Logging already initialised");
    }
}

/// Every FoodShare service, wired over one record store.
#[derive(Debug, Clone)]
pub struct FoodShare {
    /// Typed record store handle.
    pub records: Records,
    /// Identity and role provider.
    pub identity: Arc<dyn IdentityProvider>,
    /// Donation lifecycle engine.
    pub donations: Arc<DonationService>,
    /// Fulfillment schedules.
    pub schedules: Arc<ScheduleService>,
    /// Notification fan-out.
    pub notifications: Arc<NotificationService>,
    /// Notification inbox.
    pub inbox: Arc<InboxService>,
    /// Pending donations per NGO.
    pub visibility: Arc<VisibilityService>,
    /// Donor stats.
    pub stats: Arc<StatsService>,
    /// Audit log.
    pub audit: Arc<AuditService>,
}

impl FoodShare {
    /// Build the container over caller-supplied collaborators.
    pub fn with_collaborators(
        config: &AppConfig,
        store: Arc<dyn RecordStore>,
        identity: Arc<dyn IdentityProvider>,
        mirror: Arc<dyn ProfileMirror>,
    ) -> Self {
        tracing::info!(
            backend = store.backend_name(),
            timeout_ms = config.store.operation_timeout_ms,
            "Initializing FoodShare services"
        );

        let records = Records::new(store, &config.store);
        let schedules = Arc::new(ScheduleService::new(records.clone()));
        let notifications = Arc::new(NotificationService::new(records.clone()));
        let inbox = Arc::new(InboxService::new(records.clone()));
        let visibility = Arc::new(VisibilityService::new(records.clone()));
        let stats = Arc::new(StatsService::new(records.clone(), mirror));
        let audit = Arc::new(AuditService::new(records.clone()));
        let donations = Arc::new(DonationService::new(
            records.clone(),
            schedules.clone(),
            notifications.clone(),
            stats.clone(),
            audit.clone(),
            &config.notifications,
        ));

        Self {
            records,
            identity,
            donations,
            schedules,
            notifications,
            inbox,
            visibility,
            stats,
            audit,
        }
    }

    /// Build the container over the in-process store, identity provider, and
    /// profile mirror.
    pub fn in_memory(config: &AppConfig) -> InMemoryFoodShare {
        let store = Arc::new(MemoryRecordStore::new(&config.store));
        let identity = Arc::new(MemoryIdentityProvider::new());
        let mirror = Arc::new(MemoryProfileMirror::new(store.clone(), &config.mirror));
        let app = Self::with_collaborators(config, store.clone(), identity.clone(), mirror.clone());
        InMemoryFoodShare {
            app,
            store,
            identity,
            mirror,
        }
    }
}

/// An in-process [`FoodShare`] with typed access to its collaborators.
#[derive(Debug, Clone)]
pub struct InMemoryFoodShare {
    /// The service container.
    pub app: FoodShare,
    /// The backing store.
    pub store: Arc<MemoryRecordStore>,
    /// The role registry.
    pub identity: Arc<MemoryIdentityProvider>,
    /// The profile mirror.
    pub mirror: Arc<MemoryProfileMirror>,
}
