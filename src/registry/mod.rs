//! Dynamic route registry.
//!
//! # Data Flow
//! ```text
//! Create request (path, method, response)
//!     → filename.rs (path → record id)
//!     → store.rs (persist {path, method, response} as <id>.json)
//!     → binder.rs (bind (method, path) once, refresh table)
//!     → table.rs (current response for (method, path))
//!
//! Incoming request on a dynamic path:
//!     → binder.rs (is (method, path) bound?)
//!     → table.rs (read current response)
//!     → JSON response
//! ```
//!
//! # Design Decisions
//! - The store is the source of truth; the table is a cache rebuilt from it
//! - Record ids derive from the path alone, so two methods on one path
//!   share a single record (last write wins)
//! - Bindings are never removed for the life of the process
//! - Handlers read the table at request time, so updates need no rebind

pub mod binder;
pub mod filename;
pub mod record;
pub mod store;
pub mod table;

pub use binder::{BoundHandler, Registration, RegistryError, RouteBinder};
pub use filename::derive_record_id;
pub use record::{HttpMethod, MissingField, RouteDocument, RouteKey, RouteRecord};
pub use store::{RouteStore, StoreError};
pub use table::RouteTable;
