//! Compiled proxy rules.

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::config::RuleConfig;
use crate::routing::matcher::PathPrefixMatcher;
use crate::routing::rewrite::{PathRewrite, RewriteError};

/// A rule that cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("prefix must not be empty")]
    EmptyPrefix,

    #[error("prefix {0:?} must start with '/'")]
    PrefixNotAbsolute(String),

    #[error("invalid target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("at most one path rewrite per rule, found {0}")]
    MultipleRewrites(usize),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error("invalid response header {name:?}: {value:?}")]
    InvalidHeader { name: String, value: String },
}

/// A routing entry binding a path prefix to an upstream origin.
#[derive(Debug, Clone)]
pub struct Rule {
    matcher: PathPrefixMatcher,
    target: Url,
    rewrite: Option<PathRewrite>,
    preserve_host: bool,
    response_headers: Vec<(HeaderName, HeaderValue)>,
}

impl Rule {
    /// Compile a rule from its configuration.
    pub fn from_config(config: &RuleConfig) -> Result<Self, RuleError> {
        if config.prefix.is_empty() {
            return Err(RuleError::EmptyPrefix);
        }
        if !config.prefix.starts_with('/') {
            return Err(RuleError::PrefixNotAbsolute(config.prefix.clone()));
        }

        let target = parse_target(&config.target)?;

        if config.path_rewrite.len() > 1 {
            return Err(RuleError::MultipleRewrites(config.path_rewrite.len()));
        }
        let rewrite = config
            .path_rewrite
            .iter()
            .next()
            .map(|(pattern, replacement)| PathRewrite::parse(pattern, replacement))
            .transpose()?;

        let response_headers = config
            .response_headers
            .iter()
            .map(|(name, value)| {
                let invalid = || RuleError::InvalidHeader {
                    name: name.clone(),
                    value: value.clone(),
                };
                let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
                let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
                Ok((name, value))
            })
            .collect::<Result<Vec<_>, RuleError>>()?;

        Ok(Self {
            matcher: PathPrefixMatcher::new(config.prefix.clone()),
            target,
            rewrite,
            preserve_host: !config.change_origin,
            response_headers,
        })
    }

    pub fn prefix(&self) -> &str {
        self.matcher.prefix()
    }

    pub fn matcher(&self) -> &PathPrefixMatcher {
        &self.matcher
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    /// `scheme://host[:port]` of the upstream, as sent in a rewritten `Origin` header.
    pub fn origin(&self) -> String {
        self.target.origin().ascii_serialization()
    }

    /// Forward the caller's `Host` header instead of the upstream's.
    pub fn preserve_host(&self) -> bool {
        self.preserve_host
    }

    pub fn path_rewrite(&self) -> Option<&PathRewrite> {
        self.rewrite.as_ref()
    }

    pub fn response_headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.response_headers
    }

    /// Compute the upstream path-and-query for an inbound one.
    pub fn upstream_path(&self, path_and_query: &str) -> String {
        match &self.rewrite {
            Some(rewrite) => rewrite.apply_with_query(path_and_query),
            None => path_and_query.to_string(),
        }
    }

    /// Absolute upstream URL for an already rewritten path-and-query.
    pub fn upstream_url(&self, upstream_path: &str) -> String {
        join_upstream(&self.target, upstream_path)
    }
}

/// Append a path-and-query to a target, which may carry a base path.
pub fn join_upstream(target: &Url, upstream_path: &str) -> String {
    format!("{}{}", target.as_str().trim_end_matches('/'), upstream_path)
}

fn parse_target(raw: &str) -> Result<Url, RuleError> {
    let invalid = |reason: &str| RuleError::InvalidTarget {
        target: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed"));
    }
    Ok(url)
}
