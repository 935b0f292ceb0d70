//! URL safety validation (SSRF guard) for scan targets.
//!
//! Pattern-based allowlist/denylist over the parsed URL: only public
//! HTTP/HTTPS targets are accepted. This check does not resolve DNS, so a
//! hostname that later resolves to a private address (DNS rebinding) is not
//! caught here. That is a documented limitation of the enqueue-time check.

use url::Url;

/// Returns true when the URL is a public HTTP/HTTPS target.
///
/// A pure function: identical input always yields identical output. Rejects
/// unparsable URLs, non-HTTP(S) schemes, localhost variants, and private or
/// link-local address patterns.
pub fn is_url_safe(raw: &str) -> bool {
    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return false,
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    let host = match parsed.host_str() {
        Some(host) => host.to_lowercase(),
        None => return false,
    };
    // IPv6 hosts parse with surrounding brackets
    let host = host.trim_start_matches('[').trim_end_matches(']');

    if matches!(host, "localhost" | "127.0.0.1" | "::1" | "0.0.0.0") {
        return false;
    }

    !matches_private_range(host)
}

/// Private, link-local, and this-network IPv4 patterns:
/// 10/8, 192.168/16, 172.16/12, 169.254/16, 0/8.
fn matches_private_range(host: &str) -> bool {
    if host.starts_with("10.")
        || host.starts_with("192.168.")
        || host.starts_with("169.254.")
        || host.starts_with("0.")
    {
        return true;
    }

    if let Some(rest) = host.strip_prefix("172.") {
        if let Some((second_octet, _)) = rest.split_once('.') {
            if let Ok(n) = second_octet.parse::<u8>() {
                return (16..=31).contains(&n);
            }
        }
    }

    false
}
