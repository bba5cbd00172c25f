//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every rule once so bad targets, rewrites and headers fail at load
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the navigation table (unique names, one wildcard, a Login route)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{PostStoreMode, ProxyConfig};
use crate::routing::{Rule, RuleTableError};
use crate::spa::route::{check_routes, RouteError};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("listener.max_concurrent_requests must be greater than zero")]
    ZeroConcurrency,

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("spa.index must not be empty")]
    EmptySpaIndex,

    #[error(transparent)]
    Rule(#[from] RuleTableError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("posts.base_url is required when posts.mode = \"remote\"")]
    MissingPostsBaseUrl,

    #[error("posts.base_url {0:?} is not a valid URL")]
    InvalidPostsBaseUrl(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.max_concurrent_requests == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }
    if config.spa.root.is_some() && config.spa.index.is_empty() {
        errors.push(ValidationError::EmptySpaIndex);
    }

    for (index, rule) in config.rules.iter().enumerate() {
        if let Err(source) = Rule::from_config(rule) {
            errors.push(ValidationError::Rule(RuleTableError {
                index,
                prefix: rule.prefix.clone(),
                source,
            }));
        }
    }

    errors.extend(check_routes(&config.routes).into_iter().map(ValidationError::Route));

    if config.posts.mode == PostStoreMode::Remote {
        match config.posts.base_url.as_deref() {
            None => errors.push(ValidationError::MissingPostsBaseUrl),
            Some(raw) if Url::parse(raw).is_err() => {
                errors.push(ValidationError::InvalidPostsBaseUrl(raw.to_string()))
            }
            Some(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
