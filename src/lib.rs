//! Storage Gateway
//!
//! A typed HTTP facade over four storage primitives:
//! - Partitioned key-value tables holding typed records
//! - Blob containers with public object URLs
//! - Message queues
//! - Hierarchical file shares
//!
//! The server side translates `/api/{class}/{name}/...` requests onto storage
//! adapters; the client side ([`infrastructure::client::GatewayClient`]) issues
//! those requests for typed records.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::time::Duration;

use axum::Router;
use tracing::info;

use api::state::AppState;
use infrastructure::services::RecordRegistry;
use infrastructure::storage::StorageFactory;

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = config.storage.storage_config()?;
    let public_base_url = config.public_blob_base_url();

    info!(
        backend = ?storage_config.storage_type(),
        public_base_url = %public_base_url,
        "Creating storage backends"
    );

    let backends = StorageFactory::create(&storage_config, &public_base_url).await?;
    let registry = RecordRegistry::with_defaults();
    info!(resources = ?registry.resources(), "Registered table resources");

    Ok(AppState::new(
        backends,
        registry,
        &config.storage.default_blob_extension,
    ))
}

/// Build the full HTTP application for the given configuration
pub async fn create_app(config: &AppConfig) -> anyhow::Result<Router> {
    let state = create_app_state_with_config(config).await?;
    let timeout = Duration::from_secs(config.server.request_timeout_secs);

    Ok(api::create_router_with_state(state, timeout))
}
