//! Client address resolution behind reverse proxies
//!
//! `X-Forwarded-For` is only honored when proxies are configured in front of
//! the service; otherwise it is attacker-controlled and the socket peer is used.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";

/// Resolve the address of the client that made the request.
///
/// With `trusted_proxy_count = N`, the last N hops of `X-Forwarded-For` were
/// written by our own proxies, so the client is the entry N places from the end.
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trusted_proxy_count: usize,
) -> Option<IpAddr> {
    if trusted_proxy_count > 0 {
        if let Some(ip) = forwarded_client(headers, trusted_proxy_count) {
            return Some(ip);
        }
        if let Some(ip) = header_ip(headers, REAL_IP) {
            return Some(ip);
        }
    }
    peer.map(|addr| addr.ip())
}

/// Rate-limit / logging key for a request
pub fn client_key(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trusted_proxy_count: usize,
) -> String {
    client_ip(headers, peer, trusted_proxy_count)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_client(headers: &HeaderMap, trusted_proxy_count: usize) -> Option<IpAddr> {
    let chain: Vec<&str> = headers
        .get(FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .collect();

    let index = chain.len().checked_sub(trusted_proxy_count)?;
    chain.get(index)?.parse().ok()
}

fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
