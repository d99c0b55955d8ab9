//! Fixed-window request limiting per client address
//!
//! Every route shares one budget per client: `limit` requests per `window`.
//! Buckets live in hashed shards so concurrent requests from different clients
//! rarely contend on the same lock.

use crate::error::ErrorResponse;
use crate::utils::ip_extraction::client_key;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

const DEFAULT_SHARDS: usize = 16;
const MAX_BUCKETS_PER_SHARD: usize = 10_000;

#[derive(Debug, Clone)]
struct Window {
    count: u32,
    resets_at: Instant,
}

impl Window {
    fn starting(now: Instant, length: Duration) -> Self {
        Self {
            count: 0,
            resets_at: now + length,
        }
    }
}

/// Outcome of counting one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

#[derive(Clone)]
pub struct HttpRateLimiter {
    shards: Arc<Vec<Mutex<HashMap<String, Window>>>>,
    limit: u32,
    window: Duration,
    trusted_proxy_count: usize,
}

impl HttpRateLimiter {
    pub fn new(limit: u32, window: Duration, trusted_proxy_count: usize) -> Self {
        let shards = (0..DEFAULT_SHARDS)
            .map(|_| Mutex::new(HashMap::new()))
            .collect();
        Self {
            shards: Arc::new(shards),
            limit,
            window,
            trusted_proxy_count,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    fn shard_for(&self, key: &str) -> &Mutex<HashMap<String, Window>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % self.shards.len()]
    }

    /// Count a request from `key` against its current window.
    pub async fn check(&self, key: &str) -> RateDecision {
        let now = Instant::now();
        let mut buckets = self.shard_for(key).lock().await;

        if buckets.len() >= MAX_BUCKETS_PER_SHARD && !buckets.contains_key(key) {
            buckets.retain(|_, w| w.resets_at > now);
            if buckets.len() >= MAX_BUCKETS_PER_SHARD {
                let oldest = buckets
                    .iter()
                    .min_by_key(|(_, w)| w.resets_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    buckets.remove(&oldest);
                }
            }
        }

        let window = buckets
            .entry(key.to_string())
            .or_insert_with(|| Window::starting(now, self.window));
        if now >= window.resets_at {
            *window = Window::starting(now, self.window);
        }

        if window.count < self.limit {
            window.count += 1;
            RateDecision::Allowed {
                remaining: self.limit - window.count,
            }
        } else {
            RateDecision::Limited {
                retry_after: window.resets_at.saturating_duration_since(now),
            }
        }
    }

    /// Drop windows that have already ended
    pub async fn cleanup_expired_buckets(&self) {
        let now = Instant::now();
        let mut removed = 0;
        for shard in self.shards.iter() {
            let mut buckets = shard.lock().await;
            let before = buckets.len();
            buckets.retain(|_, w| w.resets_at > now);
            removed += before - buckets.len();
        }
        if removed > 0 {
            tracing::debug!(buckets_removed = removed, "Cleaned up expired rate limit windows");
        }
    }

    fn key_for(&self, request: &Request) -> String {
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        client_key(request.headers(), peer, self.trusted_proxy_count)
    }
}

fn set_header(headers: &mut HeaderMap, name: &'static str, value: impl ToString) {
    if let Ok(value) = HeaderValue::from_str(&value.to_string()) {
        headers.insert(name, value);
    }
}

/// Apply the per-client limit to every request.
///
/// Adds `X-RateLimit-Limit` and `X-RateLimit-Remaining` to responses, and
/// `Retry-After` (seconds) when rejecting with 429.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<HttpRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let key = limiter.key_for(&request);

    match limiter.check(&key).await {
        RateDecision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            set_header(response.headers_mut(), "x-ratelimit-limit", limiter.limit());
            set_header(response.headers_mut(), "x-ratelimit-remaining", remaining);
            response
        }
        RateDecision::Limited { retry_after } => {
            tracing::warn!(
                client = %key,
                path = %request.uri().path(),
                limit = limiter.limit(),
                "Rate limit exceeded"
            );
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorResponse::new(RATE_LIMITED_MESSAGE)),
            )
                .into_response();
            set_header(response.headers_mut(), "x-ratelimit-limit", limiter.limit());
            set_header(response.headers_mut(), "x-ratelimit-remaining", 0);
            set_header(response.headers_mut(), "retry-after", retry_after.as_secs().max(1));
            response
        }
    }
}
