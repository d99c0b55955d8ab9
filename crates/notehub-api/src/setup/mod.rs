//! Application setup and initialization
//!
//! Everything `main` needs to go from a validated [`Config`] to a running router.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use crate::telemetry::{init_telemetry, LogFormat};
use anyhow::{Context, Result};
use notehub_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    init_telemetry(LogFormat::from_env());

    config
        .validate()
        .context("Configuration validation failed")?;
    tracing::info!(
        environment = config.environment(),
        admins = config.admin_emails().len(),
        "Configuration loaded and validated successfully"
    );
    if config.admin_emails().is_empty() {
        tracing::warn!("ADMIN_EMAILS is empty; every admin operation will be refused");
    }

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;
    let state = services::initialize_services(&config, pool, storage)?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
