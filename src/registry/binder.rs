//! Idempotent route binding.
//!
//! # Responsibilities
//! - Validate the method against the allowed set
//! - Refresh the route table on every registration
//! - Bind each `(method, path)` pair at most once per process
//! - Resolve incoming requests to their bound handler
//!
//! # Design Decisions
//! - The binder owns the set of bound pairs; it never inspects the HTTP
//!   router to decide whether a pair is already live
//! - Bindings are never removed
//! - A bound handler reads the table for the request's own key at request
//!   time, so updates take effect without rebinding

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value;
use thiserror::Error;

use crate::observability::metrics;
use crate::registry::record::{HttpMethod, RouteKey};
use crate::registry::table::RouteTable;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),
}

/// Outcome of a successful `register` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A new binding was created.
    Bound,
    /// The pair was already bound; only the table entry changed.
    Refreshed,
}

/// A live binding for one `(method, path)` pair.
#[derive(Debug, Clone)]
pub struct BoundHandler {
    table: Arc<RouteTable>,
}

impl BoundHandler {
    /// Current response for the request's `(method, path)`.
    pub fn serve(&self, method: HttpMethod, path: &str) -> Value {
        self.table.get(method, path)
    }
}

/// Owns the bound set and the route table it refreshes.
#[derive(Debug)]
pub struct RouteBinder {
    table: Arc<RouteTable>,
    bound: DashMap<RouteKey, BoundHandler>,
}

impl RouteBinder {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self {
            table,
            bound: DashMap::new(),
        }
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    /// Make `initial_response` the live value for `(method, path)` and bind
    /// the pair if it is not bound yet.
    ///
    /// Fails with `MethodNotAllowed`, and changes nothing, if `method` is not
    /// one of the allowed methods.
    pub fn register(
        &self,
        path: &str,
        method: &str,
        initial_response: Value,
    ) -> Result<Registration, RegistryError> {
        let method: HttpMethod = method
            .parse()
            .map_err(|_| RegistryError::MethodNotAllowed(method.to_string()))?;

        self.table.set(method, path, initial_response);

        let key = RouteKey::new(method, path);
        match self.bound.entry(key.clone()) {
            Entry::Occupied(_) => {
                tracing::debug!(route = %key, "Route already bound, refreshed response");
                Ok(Registration::Refreshed)
            }
            Entry::Vacant(slot) => {
                slot.insert(BoundHandler {
                    table: self.table.clone(),
                });
                let total = self.bound.len();
                tracing::info!(route = %key, bound_routes = total, "Bound dynamic route");
                metrics::record_binding(total);
                Ok(Registration::Bound)
            }
        }
    }

    /// Handler bound for exactly `(method, path)`, if any.
    pub fn handler(&self, method: HttpMethod, path: &str) -> Option<BoundHandler> {
        self.bound
            .get(&RouteKey::new(method, path))
            .map(|entry| entry.value().clone())
    }

    pub fn is_bound(&self, method: HttpMethod, path: &str) -> bool {
        self.bound.contains_key(&RouteKey::new(method, path))
    }

    pub fn bound_count(&self) -> usize {
        self.bound.len()
    }

    /// All bound keys, sorted by path then method.
    pub fn bound_routes(&self) -> Vec<RouteKey> {
        let mut keys: Vec<RouteKey> = self.bound.iter().map(|e| e.key().clone()).collect();
        keys.sort_by(|a, b| a.path.cmp(&b.path).then(a.method.as_str().cmp(b.method.as_str())));
        keys
    }
}
