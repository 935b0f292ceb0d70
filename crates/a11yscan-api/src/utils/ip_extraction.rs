//! Client identity extraction for rate limiting.
//!
//! The service runs behind a proxy/load balancer, so the client IP comes from
//! the `X-Forwarded-For` chain. Only the hop before the trusted proxy tail is
//! believed; anything earlier in the chain is caller-controlled and spoofable.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Extract the client IP from forwarded headers.
///
/// `X-Forwarded-For` holds `client, proxy1, proxy2, ...`; with
/// `trusted_proxy_count` = N the last N entries are our own proxies and the
/// entry before them is the client. Falls back to `X-Real-IP`, then to
/// `"unknown"` (which still rate-limits direct unproxied traffic as one
/// shared key).
pub fn extract_client_ip(headers: &HeaderMap, trusted_proxy_count: usize) -> String {
    if let Some(value) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        let ips: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        let candidate = if ips.len() > trusted_proxy_count && trusted_proxy_count > 0 {
            ips.get(ips.len() - trusted_proxy_count - 1).copied()
        } else {
            // Chain too short to strip proxies (or none trusted): use the
            // entry closest to us, which is the hardest to spoof.
            ips.last().copied()
        };

        if let Some(ip) = candidate.filter(|s| is_valid_ip(s)) {
            return ip.to_string();
        }
    }

    if let Some(value) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let trimmed = value.trim();
        if is_valid_ip(trimmed) {
            return trimmed.to_string();
        }
    }

    "unknown".to_string()
}

fn is_valid_ip(s: &str) -> bool {
    s.parse::<IpAddr>().is_ok()
}
