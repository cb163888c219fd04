//! Client IP heuristics
//!
//! These headers are client-controlled and can be forged; the result is a hint,
//! not an address the caller can be held to. No IP syntax validation is done.

use hyper::header::HeaderMap;
use std::borrow::Cow;

pub const UNKNOWN_CLIENT_IP: &str = "Unknown";

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Consulted in order after `X-Forwarded-For`
const FALLBACK_HEADERS: [&str; 3] = ["x-real-ip", "x-client-ip", "remote-addr"];

/// Resolve the client IP from proxy headers.
///
/// Precedence: first `X-Forwarded-For` segment, `X-Real-IP`, `X-Client-IP`,
/// `Remote-Addr`, then `"Unknown"`. Empty header values are skipped.
pub fn resolve_client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = non_empty_header(headers, X_FORWARDED_FOR) {
        // Leftmost entry is the originating client
        return forwarded.split(',').next().map_or("", str::trim).to_string();
    }

    FALLBACK_HEADERS
        .iter()
        .find_map(|name| non_empty_header(headers, name))
        .map_or_else(|| UNKNOWN_CLIENT_IP.to_string(), Cow::into_owned)
}

fn non_empty_header<'a>(headers: &'a HeaderMap, name: &str) -> Option<Cow<'a, str>> {
    headers
        .get(name)
        .filter(|value| !value.is_empty())
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
}
