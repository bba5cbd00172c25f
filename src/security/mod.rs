//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Matched request:
//!     → headers.rs (strip hop-by-hop, changeOrigin, add X-Forwarded-*)
//!     → Pass to forwarder
//! Upstream response:
//!     → headers.rs (strip hop-by-hop)
//! ```

pub mod headers;
