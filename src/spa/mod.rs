//! Single-page app navigation.
//!
//! # Data Flow
//! ```text
//! RouteConfig[] (startup)
//!     → route.rs (compile patterns, check names / wildcard / Login)
//!     → RouteTable (immutable)
//!
//! navigation(path)
//!     → session.rs (AuthSession from the token slot)
//!     → navigator.rs (first match + auth guard)
//!     → Resolved | NotFound | Redirect(Login) | Unmatched
//! ```
//!
//! # Design Decisions
//! - Declaration order decides, as with proxy rules
//! - Exactly one wildcard route at most; it renders the not-found view
//! - The session is an explicit value, never ambient global state

pub mod navigator;
pub mod route;
pub mod session;

pub use navigator::{Navigation, Navigator};
pub use route::{Route, RouteError, RoutePattern, RouteTable};
pub use session::AuthSession;
