//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::defaults;

/// Root configuration for the dashboard proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, concurrency).
    pub listener: ListenerConfig,

    /// Upstream timeouts.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Static SPA bundle used for history-API fallback.
    pub spa: SpaConfig,

    /// Local key-value storage (session token, local posts).
    pub storage: StorageConfig,

    /// Community post backend selection.
    pub posts: PostStoreConfig,

    /// Proxy rules, in precedence order.
    pub rules: Vec<RuleConfig>,

    /// Client-side navigation routes, in precedence order.
    pub routes: Vec<RouteConfig>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            spa: SpaConfig::default(),
            storage: StorageConfig::default(),
            posts: PostStoreConfig::default(),
            rules: defaults::dashboard_rules(),
            routes: defaults::dashboard_routes(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Maximum requests handled concurrently (backpressure).
    pub max_concurrent_requests: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            max_concurrent_requests: 1_024,
        }
    }
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// History-API fallback for the single-page app.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpaConfig {
    /// Directory holding the built SPA. Fallback is disabled when unset.
    pub root: Option<PathBuf>,

    /// Document served for client-side navigations, relative to `root`.
    pub index: String,
}

impl Default for SpaConfig {
    fn default() -> Self {
        Self {
            root: None,
            index: "index.html".to_string(),
        }
    }
}

/// Local key-value storage.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one file per slot.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".dashboard"),
        }
    }
}

/// Where community posts live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStoreMode {
    /// Single local slot, last write wins.
    #[default]
    Local,
    /// Trading API over REST.
    Remote,
}

/// Community post backend configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PostStoreConfig {
    pub mode: PostStoreMode,

    /// Base URL of the trading API (remote mode only).
    pub base_url: Option<String>,
}

/// A proxy rule binding a path prefix to an upstream origin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Path prefix to match. Must start with '/'.
    pub prefix: String,

    /// Upstream origin, e.g. "https://api.coingecko.com".
    pub target: String,

    /// Present the upstream's host instead of the caller's.
    #[serde(default = "default_change_origin")]
    pub change_origin: bool,

    /// Anchored prefix substitution, e.g. `{ "^/cg" = "" }`. At most one entry.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub path_rewrite: BTreeMap<String, String>,

    /// Response headers overwritten on every response of this rule.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub response_headers: BTreeMap<String, String>,
}

impl RuleConfig {
    /// A rule forwarding `prefix` to `target` unchanged, with `change_origin`.
    pub fn new(prefix: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            target: target.into(),
            change_origin: true,
            path_rewrite: BTreeMap::new(),
            response_headers: BTreeMap::new(),
        }
    }

    pub fn rewrite(mut self, pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.path_rewrite.insert(pattern.into(), replacement.into());
        self
    }

    pub fn response_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.response_headers.insert(name.into(), value.into());
        self
    }

    pub fn preserve_host(mut self) -> Self {
        self.change_origin = false;
        self
    }
}

fn default_change_origin() -> bool {
    true
}

/// A client-side navigation route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path pattern: literal, with `:param` segments, or the wildcard `/:pathMatch(.*)*`.
    pub path: String,

    /// Unique route name.
    pub name: String,

    /// Redirect to `Login` when no session token is present.
    #[serde(default)]
    pub requires_auth: bool,
}

impl RouteConfig {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            requires_auth: false,
        }
    }

    pub fn protected(mut self) -> Self {
        self.requires_auth = true;
        self
    }
}
