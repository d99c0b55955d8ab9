//! Postgres pool and schema migrations

use anyhow::{Context, Result};
use notehub_core::Config;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::PathBuf;
use std::time::Duration;

const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Workspace `migrations/`, resolved from this crate's manifest
fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../migrations")
}

async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(POOL_IDLE_TIMEOUT)
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")
}

async fn apply_migrations(pool: &PgPool) -> Result<()> {
    let dir = migrations_dir();
    let migrator = Migrator::new(dir.clone())
        .await
        .with_context(|| format!("Failed to load migrations from {}", dir.display()))?;
    let pending = migrator.iter().count();
    migrator
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!(known_migrations = pending, "Schema up to date");
    Ok(())
}

/// Open the pool and bring the schema (catalog, notes, deletion_audit) up to date
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let pool = connect_pool(config).await?;
    tracing::info!(
        max_connections = config.db_max_connections(),
        timeout_secs = config.db_timeout_seconds(),
        "Database pool ready"
    );

    apply_migrations(&pool).await?;
    Ok(pool)
}
