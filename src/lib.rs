//! Dynamic route registry.
//!
//! Serves HTTP endpoints defined at runtime. Each route is persisted as a
//! JSON record, bound once into the live server, and described in a
//! generated OpenAPI document.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod openapi;
pub mod registry;

pub use config::RegistryConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
