//! Client-side navigation routes.
//!
//! Patterns come in three shapes: literal (`/crypto`), parameterised
//! (`/post/:id`), and the single wildcard (`/:pathMatch(.*)*`), which
//! matches anything.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::config::RouteConfig;

/// Name of the route unauthenticated navigations are redirected to.
pub const LOGIN_ROUTE: &str = "Login";

/// Route parameters captured from `:name` segments.
pub type Params = BTreeMap<String, String>;

/// An invalid navigation table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route {name:?}: path {path:?} must start with '/'")]
    PathNotAbsolute { name: String, path: String },

    #[error("route name {0:?} is used more than once")]
    DuplicateName(String),

    #[error("at most one wildcard route is allowed, found {0}")]
    MultipleWildcards(usize),

    #[error("routes require authentication but no route is named \"Login\"")]
    MissingLoginRoute,
}

/// One `/`-separated piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
    Segments(Vec<Segment>),
    Wildcard,
}

impl RoutePattern {
    /// Compile a route path. Any `(.*)` catch-all segment makes it the wildcard.
    pub fn parse(path: &str) -> Self {
        if is_wildcard(path) {
            return RoutePattern::Wildcard;
        }
        let segments = split(path)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(segment.to_string()),
            })
            .collect();
        RoutePattern::Segments(segments)
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, RoutePattern::Wildcard)
    }

    /// Match a navigation path, returning captured params on success.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let segments = match self {
            RoutePattern::Wildcard => {
                let mut params = Params::new();
                let rest = strip_location(path).trim_start_matches('/');
                params.insert("pathMatch".to_string(), rest.to_string());
                return Some(params);
            }
            RoutePattern::Segments(segments) => segments,
        };

        let parts: Vec<&str> = split(strip_location(path)).collect();
        if parts.len() != segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, part) in segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

fn is_wildcard(path: &str) -> bool {
    path == "*" || path.contains("(.*)")
}

/// Drop query and hash so `/crypto?tab=1#top` navigates to `/crypto`.
fn strip_location(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Non-empty path segments; one trailing slash is insignificant.
fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// A navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: String,
    pub path: String,
    pub pattern: RoutePattern,
    pub requires_auth: bool,
}

impl Route {
    pub fn from_config(config: &RouteConfig) -> Self {
        Self {
            name: config.name.clone(),
            path: config.path.clone(),
            pattern: RoutePattern::parse(&config.path),
            requires_auth: config.requires_auth,
        }
    }
}

/// Check a navigation table, returning every problem found.
pub fn check_routes(routes: &[RouteConfig]) -> Vec<RouteError> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();
    let mut wildcards = 0;

    for route in routes {
        if !route.path.starts_with('/') && route.path != "*" {
            errors.push(RouteError::PathNotAbsolute {
                name: route.name.clone(),
                path: route.path.clone(),
            });
        }
        if !names.insert(route.name.as_str()) {
            errors.push(RouteError::DuplicateName(route.name.clone()));
        }
        if is_wildcard(&route.path) {
            wildcards += 1;
        }
    }

    if wildcards > 1 {
        errors.push(RouteError::MultipleWildcards(wildcards));
    }
    if routes.iter().any(|r| r.requires_auth) && !names.contains(LOGIN_ROUTE) {
        errors.push(RouteError::MissingLoginRoute);
    }
    errors
}

/// Ordered, immutable navigation table.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn from_config(configs: &[RouteConfig]) -> Result<Self, RouteError> {
        if let Some(err) = check_routes(configs).into_iter().next() {
            return Err(err);
        }
        Ok(Self {
            routes: configs.iter().map(Route::from_config).collect(),
        })
    }

    /// First route (in declaration order) matching `path`.
    pub fn lookup(&self, path: &str) -> Option<(&Route, Params)> {
        self.routes
            .iter()
            .find_map(|route| route.pattern.matches(path).map(|params| (route, params)))
    }

    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
