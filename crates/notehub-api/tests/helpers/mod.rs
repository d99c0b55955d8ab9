//! Test helpers: build the real router over in-memory dependencies.
//!
//! Run from workspace root: `cargo test -p notehub-api`. Nothing here needs a
//! database or network; Postgres-backed repositories are covered in notehub-db.

#![allow(dead_code)]

pub mod auth;
pub mod memory;
pub mod storage;

use axum_test::TestServer;
use notehub_api::constants;
use notehub_api::middleware::HttpRateLimiter;
use notehub_api::{build_router, AppState, DeletionAuditLogger, NoteDeletionService, RouterSettings};
use notehub_core::models::AdminAllowList;
use notehub_storage::{LocalStorage, Storage};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub use auth::{StaticIdentity, ADMIN_EMAIL, ADMIN_TOKEN, OUTAGE_TOKEN, STUDENT_TOKEN};
pub use memory::{MemoryDb, RecordingAudit, SwitchableHealth};
pub use storage::{MemoryStorage, StorageFault};

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<MemoryDb>,
    pub storage: Arc<MemoryStorage>,
    pub audit: Arc<RecordingAudit>,
    pub health: Arc<SwitchableHealth>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn default_settings() -> RouterSettings {
    RouterSettings {
        cors_origins: vec!["*".to_string()],
        rate_limit_per_window: 1_000,
        rate_limit_window: Duration::from_secs(60),
        trusted_proxy_count: 1,
        max_upload_size_bytes: 64 * 1024,
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(default_settings())
}

pub fn setup_test_app_with(settings: RouterSettings) -> TestApp {
    let storage = Arc::new(MemoryStorage::default());
    let parts = build_app(settings, storage.clone());
    TestApp {
        server: parts.server,
        db: parts.db,
        storage,
        audit: parts.audit,
        health: parts.health,
    }
}

/// App backed by filesystem storage rooted at `root`
pub struct DiskApp {
    pub server: TestServer,
    pub db: Arc<MemoryDb>,
    pub audit: Arc<RecordingAudit>,
}

pub async fn setup_disk_app(root: &Path) -> DiskApp {
    let storage = LocalStorage::new(root, "http://localhost:8787/files".to_string())
        .await
        .expect("local storage");
    let parts = build_app(default_settings(), Arc::new(storage));
    DiskApp {
        server: parts.server,
        db: parts.db,
        audit: parts.audit,
    }
}

struct AppParts {
    server: TestServer,
    db: Arc<MemoryDb>,
    audit: Arc<RecordingAudit>,
    health: Arc<SwitchableHealth>,
}

fn build_app(settings: RouterSettings, storage: Arc<dyn Storage>) -> AppParts {
    let db = Arc::new(MemoryDb::default());
    let audit = Arc::new(RecordingAudit::default());
    let health = Arc::new(SwitchableHealth::default());
    let identity = Arc::new(StaticIdentity::standard());
    let admins = AdminAllowList::parse(&format!("{}, other-admin@college.edu", ADMIN_EMAIL));

    let deletion = NoteDeletionService::new(
        db.clone(),
        storage.clone(),
        identity.clone(),
        admins.clone(),
        DeletionAuditLogger::new(audit.clone()),
    )
    .expect("deletion service");

    let state = Arc::new(AppState {
        catalog: db.clone(),
        notes: db.clone(),
        storage,
        identity,
        admins,
        deletion,
        health: health.clone(),
        max_upload_size_bytes: settings.max_upload_size_bytes,
    });

    let limiter = Arc::new(HttpRateLimiter::new(
        settings.rate_limit_per_window,
        settings.rate_limit_window,
        settings.trusted_proxy_count,
    ));
    let router = build_router(state, &settings, limiter).expect("router");
    let server = TestServer::new(router).expect("test server");

    AppParts {
        server,
        db,
        audit,
        health,
    }
}
