//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file)
//!     → overrides.rs (environment variables / CLI flags)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc with the server and core handler
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never mutated afterwards
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod overrides;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use overrides::ConfigOverrides;
pub use schema::{
    BackendConfig, CompressionConfig, GatewayConfig, ListenerConfig, ObservabilityConfig,
    TransformConfig,
};
pub use validation::ValidationError;
