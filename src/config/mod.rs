//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → compiled into RuleTable / RouteTable, shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{
    ListenerConfig, ObservabilityConfig, PostStoreConfig, PostStoreMode, ProxyConfig, RouteConfig,
    RuleConfig, SpaConfig, StorageConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
