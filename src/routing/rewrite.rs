//! Outbound path rewriting.
//!
//! # Responsibilities
//! - Parse `pathRewrite`-style patterns (`^/goldprice` → `/GoldPrice`)
//! - Apply a single anchored prefix substitution per request
//! - Keep the rewritten path valid (always starts with '/')
//!
//! # Design Decisions
//! - Patterns are plain anchored prefixes; regex syntax is rejected at load
//! - A leading `^` is optional and means the same as no `^`
//! - `.` is taken literally, file names like `/ff_calendar_thisweek.json` rely on it

use thiserror::Error;

/// Characters that would make a pattern a real regex.
const REGEX_METACHARS: &[char] = &['$', '*', '+', '?', '(', ')', '[', ']', '{', '}', '|', '\\', '^'];

/// Malformed rewrite configuration, detected at load time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("rewrite pattern must not be empty")]
    EmptyPattern,

    #[error("rewrite pattern {0:?} must start with '/' (optionally anchored with '^')")]
    NotAbsolute(String),

    #[error("rewrite pattern {0:?} is not a plain anchored prefix")]
    UnsupportedPattern(String),
}

/// A single anchored prefix substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRewrite {
    prefix: String,
    replacement: String,
}

impl PathRewrite {
    /// Parse a pattern/replacement pair.
    pub fn parse(pattern: &str, replacement: &str) -> Result<Self, RewriteError> {
        let prefix = pattern.strip_prefix('^').unwrap_or(pattern);
        if prefix.is_empty() {
            return Err(RewriteError::EmptyPattern);
        }
        if !prefix.starts_with('/') {
            return Err(RewriteError::NotAbsolute(pattern.to_string()));
        }
        if prefix.contains(REGEX_METACHARS) {
            return Err(RewriteError::UnsupportedPattern(pattern.to_string()));
        }
        Ok(Self {
            prefix: prefix.to_string(),
            replacement: replacement.to_string(),
        })
    }

    /// The literal prefix this rewrite replaces.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Rewrite a path (without query). Paths not starting with the pattern pass through.
    pub fn apply(&self, path: &str) -> String {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => {
                let rewritten = format!("{}{}", self.replacement, rest);
                if rewritten.starts_with('/') {
                    rewritten
                } else {
                    format!("/{}", rewritten)
                }
            }
            None => path.to_string(),
        }
    }

    /// Rewrite a path-and-query, carrying the query string over untouched.
    pub fn apply_with_query(&self, path_and_query: &str) -> String {
        match path_and_query.split_once('?') {
            Some((path, query)) => format!("{}?{}", self.apply(path), query),
            None => self.apply(path_and_query),
        }
    }
}
