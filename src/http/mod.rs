//! HTTP surface of the registry.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → fixed routes:
//!         POST /api/create   → api.rs (JSON or multipart via upload.rs)
//!         PUT  /api/update   → api.rs
//!         GET  /openapi.json → docs.rs (rebuilt from the store)
//!         GET  /docs, GET /  → docs.rs
//!     → fallback → bound dynamic route or 404
//! ```

pub mod api;
pub mod docs;
pub mod error;
pub mod server;
pub mod upload;

pub use error::ApiError;
pub use server::{build_router, AppState, HttpServer, StartupError};
