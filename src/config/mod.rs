//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides (bind address, routes dir)
//!     → validation.rs (semantic checks)
//!     → RegistryConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks
//! - Config is read once at startup; there is no hot reload

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    LimitsConfig, ListenerConfig, ObservabilityConfig, RegistryConfig, StorageConfig,
    UploadConfig,
};
pub use validation::{validate_config, ValidationError};
