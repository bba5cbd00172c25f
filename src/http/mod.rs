//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, rule dispatch)
//!     → request.rs (request ID)
//!     → [routing layer picks a rule]
//!     → forwarder.rs (streamed upstream call)
//!     → response.rs (header overwrite, error mapping)
//!     → Send to client
//!
//! No rule matched:
//!     → fallback.rs (SPA index.html or static file)
//! ```

pub mod fallback;
pub mod forwarder;
pub mod request;
pub mod response;
pub mod server;

pub use fallback::HistoryFallback;
pub use forwarder::Forwarder;
pub use request::X_REQUEST_ID;
pub use response::post_process;
pub use server::{AppState, HttpServer, ServerError};
