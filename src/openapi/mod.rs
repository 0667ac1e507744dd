//! API documentation subsystem.
//!
//! # Data Flow
//! ```text
//! GET /openapi.json
//!     → registry store list (current disk state)
//!     → spec.rs (management scaffold + one operation per valid record)
//!     → schema.rs (schema inferred from each stored response)
//!     → JSON document
//! ```

pub mod schema;
pub mod spec;

pub use schema::{infer, SchemaNode};
pub use spec::assemble;
