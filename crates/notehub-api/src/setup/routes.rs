//! Router assembly: routes, CORS, body limits, tracing, request ids and rate limiting

use crate::api_doc::ApiDoc;
use crate::constants::API_PREFIX;
use crate::handlers::{catalog, health, note_delete, note_upload, notes};
use crate::middleware::{rate_limit_middleware, request_id_middleware, HttpRateLimiter};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Json, Router,
};
use notehub_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Room for multipart boundaries and text fields on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// HTTP-layer settings, split from [`Config`] so routers can be built in tests
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub cors_origins: Vec<String>,
    pub rate_limit_per_window: u32,
    pub rate_limit_window: Duration,
    pub trusted_proxy_count: usize,
    pub max_upload_size_bytes: usize,
}

impl RouterSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cors_origins: config.cors_origins().to_vec(),
            rate_limit_per_window: config.http_rate_limit_per_window(),
            rate_limit_window: Duration::from_secs(config.http_rate_limit_window_secs()),
            trusted_proxy_count: config.trusted_proxy_count(),
            max_upload_size_bytes: config.max_upload_size_bytes(),
        }
    }

    fn max_body_bytes(&self) -> usize {
        self.max_upload_size_bytes + MULTIPART_OVERHEAD_BYTES
    }
}

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let settings = RouterSettings::from_config(config);
    let rate_limiter = setup_rate_limiter(&settings);
    build_router(state, &settings, rate_limiter)
}

/// Build the full router around `state`
pub fn build_router(
    state: Arc<AppState>,
    settings: &RouterSettings,
    rate_limiter: Arc<HttpRateLimiter>,
) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(&settings.cors_origins)?;

    let api = Router::new()
        .route(
            "/branches",
            get(catalog::list_branches).post(catalog::create_branch),
        )
        .route("/branches/{id}", delete(catalog::delete_branch))
        .route("/branches/{id}/semesters", get(catalog::list_semesters))
        .route("/semesters", post(catalog::create_semester))
        .route("/semesters/{id}", delete(catalog::delete_semester))
        .route("/semesters/{id}/subjects", get(catalog::list_subjects))
        .route("/subjects", post(catalog::create_subject))
        .route("/subjects/{id}", delete(catalog::delete_subject))
        .route("/subjects/{id}/units", get(catalog::list_units))
        .route("/units", post(catalog::create_unit))
        .route("/units/{id}", delete(catalog::delete_unit))
        .route("/units/{id}/notes", get(notes::list_unit_notes))
        .route(
            "/notes",
            post(note_upload::upload_note).layer(DefaultBodyLimit::max(settings.max_body_bytes())),
        )
        .route("/notes/recent", get(notes::list_recent_notes));

    let app = Router::new()
        .route("/delete-note", post(note_delete::delete_note))
        .route("/health", get(health::health_check))
        .nest(API_PREFIX, api)
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(axum::middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ))
        .layer(RequestBodyLimitLayer::new(settings.max_body_bytes()))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(origins: &[String]) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any));
    }

    let origins = origins
        .iter()
        .map(|o| o.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(Any))
}

fn setup_rate_limiter(settings: &RouterSettings) -> Arc<HttpRateLimiter> {
    let rate_limiter = Arc::new(HttpRateLimiter::new(
        settings.rate_limit_per_window,
        settings.rate_limit_window,
        settings.trusted_proxy_count,
    ));

    let for_cleanup = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            for_cleanup.cleanup_expired_buckets().await;
        }
    });

    tracing::info!(
        limit = settings.rate_limit_per_window,
        window_secs = settings.rate_limit_window.as_secs(),
        trusted_proxy_count = settings.trusted_proxy_count,
        "HTTP rate limiting enabled"
    );
    rate_limiter
}
