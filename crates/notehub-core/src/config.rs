//! Configuration module
//!
//! Configuration for the portal API: server, database, identity provider,
//! object storage, admin allow-list and request limits. Everything is read from
//! the process environment (with `.env` support via dotenvy).

use std::env;

use crate::models::AdminAllowList;
use crate::storage_types::StorageBackend;

// Common constants
const DEFAULT_PORT: u16 = 8787;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const HTTP_RATE_LIMIT_PER_WINDOW: u32 = 60;
const HTTP_RATE_LIMIT_WINDOW_SECS: u64 = 60;
const TRUSTED_PROXY_COUNT: usize = 1;
const MAX_UPLOAD_SIZE_MB: usize = 50;
const DEFAULT_BUCKET: &str = "notes";

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub http_rate_limit_per_window: u32,
    pub http_rate_limit_window_secs: u64,
    pub trusted_proxy_count: usize,
    pub environment: String,
}

/// Portal configuration
#[derive(Clone, Debug)]
pub struct PortalConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Identity provider / hosted backend
    pub supabase_url: Option<String>,
    pub supabase_service_role_key: Option<String>,
    /// When set, bearer tokens are verified locally (HS256) instead of calling the provider
    pub supabase_jwt_secret: Option<String>,
    pub admin_emails: AdminAllowList,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub storage_bucket: String,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub max_upload_size_bytes: usize,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config(pub Box<PortalConfig>);

impl Config {
    fn as_portal(&self) -> &PortalConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.as_portal().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = PortalConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_portal().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_portal().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_portal().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_portal().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_portal().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_portal().base.db_timeout_seconds
    }

    pub fn http_rate_limit_per_window(&self) -> u32 {
        self.as_portal().base.http_rate_limit_per_window
    }

    pub fn http_rate_limit_window_secs(&self) -> u64 {
        self.as_portal().base.http_rate_limit_window_secs
    }

    pub fn trusted_proxy_count(&self) -> usize {
        self.as_portal().base.trusted_proxy_count
    }

    pub fn database_url(&self) -> &str {
        &self.as_portal().database_url
    }

    pub fn supabase_url(&self) -> Option<&str> {
        self.as_portal().supabase_url.as_deref()
    }

    pub fn supabase_service_role_key(&self) -> Option<&str> {
        self.as_portal().supabase_service_role_key.as_deref()
    }

    pub fn supabase_jwt_secret(&self) -> Option<&str> {
        self.as_portal().supabase_jwt_secret.as_deref()
    }

    pub fn admin_emails(&self) -> &AdminAllowList {
        &self.as_portal().admin_emails
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_portal().storage_backend
    }

    pub fn storage_bucket(&self) -> &str {
        &self.as_portal().storage_bucket
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_portal().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_portal().local_storage_base_url.as_deref()
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.as_portal().max_upload_size_bytes
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl PortalConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            http_rate_limit_per_window: env::var("HTTP_RATE_LIMIT_PER_WINDOW")
                .unwrap_or_else(|_| HTTP_RATE_LIMIT_PER_WINDOW.to_string())
                .parse()
                .unwrap_or(HTTP_RATE_LIMIT_PER_WINDOW),
            http_rate_limit_window_secs: env::var("HTTP_RATE_LIMIT_WINDOW_SECS")
                .unwrap_or_else(|_| HTTP_RATE_LIMIT_WINDOW_SECS.to_string())
                .parse()
                .unwrap_or(HTTP_RATE_LIMIT_WINDOW_SECS),
            trusted_proxy_count: env::var("TRUSTED_PROXY_COUNT")
                .unwrap_or_else(|_| TRUSTED_PROXY_COUNT.to_string())
                .parse()
                .unwrap_or(TRUSTED_PROXY_COUNT),
            environment,
        };

        let storage_backend = match non_empty_var("STORAGE_BACKEND") {
            Some(raw) => raw.parse::<StorageBackend>()?,
            None => StorageBackend::Supabase,
        };

        let config = PortalConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            supabase_url: non_empty_var("SUPABASE_URL")
                .map(|u| u.trim_end_matches('/').to_string()),
            supabase_service_role_key: non_empty_var("SUPABASE_SERVICE_ROLE_KEY"),
            supabase_jwt_secret: non_empty_var("SUPABASE_JWT_SECRET"),
            admin_emails: AdminAllowList::parse(&env::var("ADMIN_EMAILS").unwrap_or_default()),
            storage_backend,
            storage_bucket: non_empty_var("STORAGE_BUCKET")
                .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            local_storage_path: non_empty_var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: non_empty_var("LOCAL_STORAGE_BASE_URL"),
            max_upload_size_bytes: env::var("MAX_UPLOAD_SIZE_MB")
                .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_UPLOAD_SIZE_MB)
                * 1024
                * 1024,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.database_url.starts_with("postgresql://")
            || self.database_url.starts_with("postgres://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.base.http_rate_limit_per_window == 0 || self.base.http_rate_limit_window_secs == 0 {
            return Err(anyhow::anyhow!(
                "HTTP_RATE_LIMIT_PER_WINDOW and HTTP_RATE_LIMIT_WINDOW_SECS must be positive"
            ));
        }

        // Token verification always needs one of the two paths
        if self.supabase_jwt_secret.is_none()
            && (self.supabase_url.is_none() || self.supabase_service_role_key.is_none())
        {
            return Err(anyhow::anyhow!(
                "SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY must be set unless SUPABASE_JWT_SECRET is provided"
            ));
        }

        if let Some(secret) = &self.supabase_jwt_secret {
            if secret.len() < 32 {
                return Err(anyhow::anyhow!(
                    "SUPABASE_JWT_SECRET must be at least 32 characters long"
                ));
            }
        }

        match self.storage_backend {
            StorageBackend::Supabase => {
                if self.supabase_url.is_none() || self.supabase_service_role_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY must be set when using supabase storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
