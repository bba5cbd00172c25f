//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (rule lookup, first declared match wins)
//!     → matcher.rs (prefix test)
//!     → rewrite.rs (upstream path)
//!     → Return: matched Rule or NoRouteError
//!
//! Rule Compilation (at startup):
//!     RuleConfig[]
//!     → rule.rs (validate target, rewrite, headers)
//!     → Freeze as immutable RuleTable
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same rule

pub mod matcher;
pub mod rewrite;
pub mod router;
pub mod rule;

pub use rewrite::{PathRewrite, RewriteError};
pub use router::{NoRouteError, RuleTable, RuleTableError};
pub use rule::{Rule, RuleError};

/// Upstream path-and-query for `request_path` under `rule`.
pub fn rewrite(request_path: &str, rule: &Rule) -> String {
    rule.upstream_path(request_path)
}
