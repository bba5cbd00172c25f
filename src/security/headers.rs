//! Header manipulation for forwarded requests.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions
//! - Apply `changeOrigin`: drop the caller's Host, rewrite Origin
//! - Add X-Forwarded-For, X-Forwarded-Proto, X-Forwarded-Host
//!
//! # Design Decisions
//! - X-Forwarded-For is appended to, like a chain of proxies would
//! - Headers listed in `Connection` are treated as hop-by-hop too

use std::net::IpAddr;

use axum::http::header::{CONNECTION, HOST, ORIGIN};
use axum::http::{HeaderMap, HeaderValue};

use crate::routing::Rule;

const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
pub const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Remove headers that only apply to a single connection.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<String> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    for name in &named {
        headers.remove(name.as_str());
    }
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}

/// Turn inbound request headers into upstream request headers for `rule`.
pub fn prepare_upstream_headers(headers: &mut HeaderMap, rule: &Rule, peer: Option<IpAddr>) {
    strip_hop_by_hop(headers);

    let inbound_host = headers.get(HOST).cloned();
    if !rule.preserve_host() {
        // The HTTP client fills Host from the upstream URL.
        headers.remove(HOST);
        if headers.contains_key(ORIGIN) {
            if let Ok(origin) = HeaderValue::from_str(&rule.origin()) {
                headers.insert(ORIGIN, origin);
            }
        }
    }

    if let Some(ip) = peer {
        let chain = match headers.get(X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
            Some(existing) => format!("{}, {}", existing, ip),
            None => ip.to_string(),
        };
        if let Ok(value) = HeaderValue::from_str(&chain) {
            headers.insert(X_FORWARDED_FOR, value);
        }
    }
    headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));
    if let Some(host) = inbound_host {
        headers.insert(X_FORWARDED_HOST, host);
    }
}
