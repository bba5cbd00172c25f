//! Dashboard reverse proxy library.
//!
//! Path-prefix proxying for a market-dashboard SPA, plus the SPA's
//! client-side navigation guard and community-post storage.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod spa;
pub mod store;

pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
