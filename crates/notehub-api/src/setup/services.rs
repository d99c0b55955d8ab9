//! Wiring of repositories, providers and services into [`AppState`]

use crate::auth::{IdentityProvider, JwtIdentityProvider, SupabaseIdentityProvider};
use crate::services::{DeletionAuditLogger, NoteDeletionService};
use crate::state::AppState;
use anyhow::{anyhow, Result};
use notehub_core::Config;
use notehub_db::{
    PostgresCatalogRepository, PostgresDeletionAuditRepository, PostgresHealthCheck,
    PostgresNoteRepository,
};
use notehub_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Pick the token verifier: local HS256 when the JWT secret is configured,
/// otherwise a round trip to the hosted auth service.
pub fn identity_provider(config: &Config) -> Result<Arc<dyn IdentityProvider>> {
    if let Some(secret) = config.supabase_jwt_secret() {
        tracing::info!("Verifying access tokens locally (HS256)");
        return Ok(Arc::new(JwtIdentityProvider::new(secret)));
    }

    match (config.supabase_url(), config.supabase_service_role_key()) {
        (Some(url), Some(key)) => {
            tracing::info!(url = url, "Verifying access tokens against the auth service");
            let provider = SupabaseIdentityProvider::new(url, key)
                .map_err(|e| anyhow!("Failed to build auth client: {}", e))?;
            Ok(Arc::new(provider))
        }
        _ => Err(anyhow!(
            "SUPABASE_JWT_SECRET or SUPABASE_URL + SUPABASE_SERVICE_ROLE_KEY must be set"
        )),
    }
}

pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let catalog = Arc::new(PostgresCatalogRepository::new(pool.clone()));
    let notes = Arc::new(PostgresNoteRepository::new(pool.clone()));
    let audit = DeletionAuditLogger::new(Arc::new(PostgresDeletionAuditRepository::new(
        pool.clone(),
    )));
    let identity = identity_provider(config)?;
    let admins = config.admin_emails().clone();

    let deletion = NoteDeletionService::new(
        notes.clone(),
        storage.clone(),
        identity.clone(),
        admins.clone(),
        audit,
    )?;

    Ok(Arc::new(AppState {
        catalog,
        notes,
        storage,
        identity,
        admins,
        deletion,
        health: Arc::new(PostgresHealthCheck::new(pool)),
        max_upload_size_bytes: config.max_upload_size_bytes(),
    }))
}
