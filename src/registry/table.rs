//! In-memory route table.
//!
//! Maps `(method, path)` to the response currently served for it. Consulted
//! on every dynamic request; written on create, update and startup.
//!
//! # Design Decisions
//! - Exact-match lookup, no patterns or path parameters
//! - A missing entry reads as `{}` rather than an error, so a request racing
//!   a registration never fails
//! - Sharded locking via `DashMap`; each `set` replaces the whole value

use dashmap::DashMap;
use serde_json::Value;

use crate::registry::record::{HttpMethod, RouteKey};

#[derive(Debug, Default)]
pub struct RouteTable {
    entries: DashMap<RouteKey, Value>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current response for `(method, path)`, or an empty object.
    pub fn get(&self, method: HttpMethod, path: &str) -> Value {
        self.entries
            .get(&RouteKey::new(method, path))
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| Value::Object(Default::default()))
    }

    pub fn set(&self, method: HttpMethod, path: &str, value: Value) {
        self.entries.insert(RouteKey::new(method, path), value);
    }

    pub fn contains(&self, method: HttpMethod, path: &str) -> bool {
        self.entries.contains_key(&RouteKey::new(method, path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_entry_defaults_to_empty_object() {
        let table = RouteTable::new();
        assert_eq!(table.get(HttpMethod::Get, "/none"), json!({}));
        assert!(!table.contains(HttpMethod::Get, "/none"));
    }

    #[test]
    fn test_set_replaces_value() {
        let table = RouteTable::new();
        table.set(HttpMethod::Get, "/a", json!({"v": 1}));
        table.set(HttpMethod::Get, "/a", json!({"v": 2}));
        assert_eq!(table.get(HttpMethod::Get, "/a"), json!({"v": 2}));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_keyed_by_method_and_path() {
        let table = RouteTable::new();
        table.set(HttpMethod::Get, "/a", json!("get"));
        table.set(HttpMethod::Post, "/a", json!("post"));

        assert_eq!(table.get(HttpMethod::Get, "/a"), json!("get"));
        assert_eq!(table.get(HttpMethod::Post, "/a"), json!("post"));
        assert_eq!(table.get(HttpMethod::Get, "/a/"), json!({}));
    }

    #[test]
    fn test_stores_any_json_value() {
        let table = RouteTable::new();
        table.set(HttpMethod::Get, "/null", Value::Null);
        table.set(HttpMethod::Get, "/false", json!(false));
        assert_eq!(table.get(HttpMethod::Get, "/null"), Value::Null);
        assert_eq!(table.get(HttpMethod::Get, "/false"), json!(false));
    }
}
