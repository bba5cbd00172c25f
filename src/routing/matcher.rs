//! Path prefix matching.
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Plain string prefix, not segment-aware: `/api` matches `/apix`
//! - No regex to guarantee O(n) matching

/// Matches the request path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if `path` starts with this prefix.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// The catch-all prefix `/` matches every origin-form path.
    pub fn is_catch_all(&self) -> bool {
        self.prefix == "/"
    }

    /// True if every path matched by `later` is already matched by `self`.
    pub fn shadows(&self, later: &PathPrefixMatcher) -> bool {
        later.prefix.starts_with(&self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/api");
        assert!(matcher.matches("/api/v1"));
        assert!(matcher.matches("/api"));
        assert!(!matcher.matches("/images"));
        assert!(!matcher.matches("/API"));
    }

    #[test]
    fn test_shadowing() {
        let api = PathPrefixMatcher::new("/api");
        let news = PathPrefixMatcher::new("/api/news");
        let root = PathPrefixMatcher::new("/");

        assert!(api.shadows(&news));
        assert!(!news.shadows(&api));
        assert!(root.shadows(&api));
        assert!(root.is_catch_all());
        assert!(!api.is_catch_all());
    }
}
