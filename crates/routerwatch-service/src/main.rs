//! Host service binary for the routerwatch monitor.
//!
//! This is the process that owns the monitor's lifecycle. It loads
//! configuration, wires the collaborators (in-memory document store,
//! configured identity, tokio wake timer, log-backed notification sink),
//! starts the monitor, and stops it cleanly on Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `routerwatch-config.yaml`
//! 3. Seed the in-memory registry from the config
//! 4. Start the monitor service
//! 5. Wait for Ctrl-C
//! 6. Stop the monitor and exit

mod config;
mod error;

use std::path::Path;
use std::sync::Arc;

use routerwatch_monitor::{
    FixedIdentityProvider, MonitorService, TokioWakeScheduler, TracingNotificationSink,
};
use routerwatch_store::MemoryDocumentStore;
use routerwatch_types::{RouterId, RouterRecord, UserId};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{RegistryConfig, ServiceConfig};
use crate::error::ServiceError;

/// Application entry point for the host service.
///
/// # Errors
///
/// Returns an error if configuration loading or monitor startup fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("routerwatch-service starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        poll_interval_secs = config.monitor.poll_interval_secs,
        seed_routers = config.registry.routers.len(),
        "Configuration loaded"
    );

    // 3. Build collaborators and seed the registry.
    let documents = MemoryDocumentStore::new();
    let identity = FixedIdentityProvider::new(config.identity.user_id.clone().map(UserId::from));

    if let Some(user_id) = &config.identity.user_id {
        let seeded = seed_registry(&documents, &config.registry, user_id).await;
        info!(seeded, "Registry seeded");
    }

    // 4. Start the monitor.
    let monitor = MonitorService::start(
        Arc::new(documents),
        &identity,
        Arc::new(TokioWakeScheduler),
        Arc::new(TracingNotificationSink),
        &config.monitor,
    )
    .map_err(ServiceError::from)?;
    info!(user = %monitor.user(), "Monitor started");

    // 5. Wait for shutdown.
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    // 6. Stop cleanly.
    monitor.stop().await;
    info!("routerwatch-service shutdown complete");

    Ok(())
}

/// Load the service configuration from `routerwatch-config.yaml`.
///
/// Looks for the config file relative to the current working directory and
/// falls back to defaults when it does not exist.
fn load_config() -> Result<ServiceConfig, ServiceError> {
    let config_path = Path::new("routerwatch-config.yaml");
    if config_path.exists() {
        let config = ServiceConfig::from_file(config_path).map_err(ServiceError::from)?;
        Ok(config)
    } else {
        info!("Config file not found, using defaults");
        let mut config = ServiceConfig::default();
        config.identity.apply_env_overrides();
        Ok(config)
    }
}

/// Create the configured seed routers for `user_id`. Returns the number of
/// records created.
async fn seed_registry(
    documents: &MemoryDocumentStore,
    registry: &RegistryConfig,
    user_id: &str,
) -> usize {
    let mut seeded = 0_usize;
    for seed in &registry.routers {
        let record = RouterRecord {
            name: seed.name.clone(),
            address: seed.address.clone(),
            model: seed.model.clone(),
            firmware_version: seed.firmware_version.clone(),
            online: seed.online,
            ..RouterRecord::new(RouterId::from("unassigned"), UserId::from(user_id))
        };
        let _ = documents.create(record).await;
        seeded = seeded.saturating_add(1);
    }
    seeded
}
