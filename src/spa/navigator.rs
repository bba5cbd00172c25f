//! Navigation resolution with the auth guard.
//!
//! ```text
//! target path
//!     → RouteTable::lookup (declaration order, first match)
//!     → guard: requires_auth && !session.is_authenticated() → Redirect(Login)
//!     → wildcard matched → NotFound, otherwise Resolved
//! ```

use std::sync::Arc;

use crate::config::RouteConfig;
use crate::spa::route::{Params, Route, RouteError, RouteTable, LOGIN_ROUTE};
use crate::spa::session::AuthSession;

/// Outcome of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation<'a> {
    /// A configured route matched.
    Resolved { route: &'a Route, params: Params },
    /// Only the wildcard route matched.
    NotFound { route: &'a Route },
    /// The guard redirected an unauthenticated navigation.
    Redirect { route: &'a Route, from: String },
    /// Nothing matched and no wildcard is registered.
    Unmatched,
}

impl Navigation<'_> {
    /// Name of the route that will render, if any.
    pub fn route_name(&self) -> Option<&str> {
        match self {
            Navigation::Resolved { route, .. }
            | Navigation::NotFound { route }
            | Navigation::Redirect { route, .. } => Some(route.name.as_str()),
            Navigation::Unmatched => None,
        }
    }
}

/// Resolves navigations against an immutable route table.
#[derive(Debug, Clone)]
pub struct Navigator {
    table: Arc<RouteTable>,
}

impl Navigator {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self { table }
    }

    pub fn from_config(routes: &[RouteConfig]) -> Result<Self, RouteError> {
        Ok(Self::new(Arc::new(RouteTable::from_config(routes)?)))
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn resolve(&self, path: &str, session: &AuthSession) -> Navigation<'_> {
        let Some((route, params)) = self.table.lookup(path) else {
            tracing::debug!(path, "Navigation matched no route");
            return Navigation::Unmatched;
        };

        if route.requires_auth && !session.is_authenticated() {
            // The table is checked for a Login route whenever one is protected.
            if let Some(login) = self.table.by_name(LOGIN_ROUTE) {
                tracing::debug!(path, route = %route.name, "Unauthenticated, redirecting to login");
                return Navigation::Redirect {
                    route: login,
                    from: path.to_string(),
                };
            }
        }

        if route.pattern.is_wildcard() {
            Navigation::NotFound { route }
        } else {
            Navigation::Resolved { route, params }
        }
    }
}
