//! Per-request proxy errors.
//!
//! Configuration problems never get here: they are reported by
//! `config::validate_config` and abort startup.

use axum::http::StatusCode;
use thiserror::Error;

use crate::routing::NoRouteError;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// No rule matched and no catch-all is configured.
    #[error(transparent)]
    NoRoute(#[from] NoRouteError),

    /// Connection failure or timeout talking to the upstream. Never retried.
    #[error("upstream {origin} unavailable for {path}: {reason}")]
    UpstreamUnavailable {
        origin: String,
        path: String,
        timed_out: bool,
        reason: String,
    },

    /// The upstream request could not be built from the inbound one.
    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),
}

impl ProxyError {
    /// Classify a failed upstream call for `path` on `origin`.
    pub fn from_upstream(origin: impl Into<String>, path: impl Into<String>, err: reqwest::Error) -> Self {
        if err.is_builder() {
            return ProxyError::InvalidRequest(err.to_string());
        }
        ProxyError::UpstreamUnavailable {
            origin: origin.into(),
            path: path.into(),
            timed_out: err.is_timeout(),
            reason: err.to_string(),
        }
    }

    /// HTTP status reported to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::NoRoute(_) => StatusCode::NOT_FOUND,
            ProxyError::UpstreamUnavailable { timed_out: true, .. } => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}
