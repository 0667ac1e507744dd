//! OpenAPI document assembly.
//!
//! The document is rebuilt from the route store on every call. There is no
//! cache: whatever is persisted at call time is what gets described, even if
//! the in-memory table has drifted from disk.

use serde_json::{json, Map, Value};

use crate::observability::metrics;
use crate::openapi::schema::infer;
use crate::registry::record::{HttpMethod, RouteDocument};
use crate::registry::store::{RouteStore, StoreError};

pub const OPENAPI_VERSION: &str = "3.1.0";

/// `(method, path)` pairs answered by fixed handlers. GET handlers also
/// answer HEAD. Every other method on these paths is dispatched dynamically.
pub const FIXED_ROUTES: &[(HttpMethod, &str)] = &[
    (HttpMethod::Get, "/"),
    (HttpMethod::Head, "/"),
    (HttpMethod::Post, "/api/create"),
    (HttpMethod::Put, "/api/update"),
    (HttpMethod::Get, "/openapi.json"),
    (HttpMethod::Head, "/openapi.json"),
    (HttpMethod::Get, "/docs"),
    (HttpMethod::Head, "/docs"),
];

pub fn is_fixed_route(method: HttpMethod, path: &str) -> bool {
    FIXED_ROUTES.iter().any(|&(m, p)| m == method && p == path)
}

/// Build the OpenAPI document for the management API plus every valid
/// stored route.
pub async fn assemble(store: &RouteStore) -> Result<Value, StoreError> {
    let records = store.list().await?;
    Ok(build_document(&records))
}

/// Pure part of [`assemble`]: scaffold plus one operation per valid record.
pub fn build_document(records: &[RouteDocument]) -> Value {
    let mut paths = management_paths();

    let mut described = 0usize;
    for doc in records {
        let Some((path, method, response)) = describable(doc) else {
            continue;
        };

        if is_fixed_route(method, path) {
            tracing::debug!(
                path = %path,
                method = %method,
                "Dynamic route shadowed by a fixed route"
            );
            continue;
        }
        let entry = paths
            .entry(path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(operations) = entry.as_object_mut() else {
            continue;
        };
        operations.insert(
            method.as_lower().to_string(),
            dynamic_operation(path, method, response),
        );
        described += 1;
    }

    tracing::debug!(routes = described, "Assembled OpenAPI document");

    json!({
        "openapi": OPENAPI_VERSION,
        "info": {
            "title": "Dynamic Route Registry",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Endpoints defined at runtime through the management API."
        },
        "paths": Value::Object(paths),
    })
}

fn describable(doc: &RouteDocument) -> Option<(&str, HttpMethod, &Value)> {
    if let Some(field) = doc.missing_field() {
        tracing::warn!(
            path = ?doc.path,
            missing = %field,
            "Skipping incomplete route record in OpenAPI document"
        );
        metrics::record_skipped("incomplete");
        return None;
    }
    let (Some(path), Some(method), Some(response)) = (&doc.path, &doc.method, &doc.response) else {
        return None;
    };
    match method.parse::<HttpMethod>() {
        Ok(method) => Some((path.as_str(), method, response)),
        Err(e) => {
            tracing::warn!(
                path = %path,
                error = %e,
                "Skipping route record with unsupported method"
            );
            metrics::record_skipped("method");
            None
        }
    }
}

fn dynamic_operation(path: &str, method: HttpMethod, response: &Value) -> Value {
    json!({
        "summary": format!("Dynamic route {} {}", method, path),
        "tags": ["dynamic"],
        "responses": {
            "200": {
                "description": "Stored response payload",
                "content": {
                    "application/json": {
                        "schema": infer(response),
                        "example": response,
                    }
                }
            }
        }
    })
}

fn management_paths() -> Map<String, Value> {
    let methods: Vec<&str> = HttpMethod::ALL.iter().map(HttpMethod::as_str).collect();
    let error = json!({
        "type": "object",
        "properties": {
            "ok": {"type": "boolean"},
            "error": {"type": "string"}
        }
    });
    let payload = json!({
        "description": "Response payload, as JSON or as a JSON-encoded string",
        "oneOf": [{"type": "object"}, {"type": "array"}, {"type": "string"}]
    });

    let mut paths = Map::new();
    paths.insert(
        "/api/create".to_string(),
        json!({
            "post": {
                "summary": "Create or replace a dynamic route",
                "tags": ["management"],
                "requestBody": {
                    "required": true,
                    "content": {
                        "application/json": {
                            "schema": {
                                "type": "object",
                                "required": ["path", "response"],
                                "properties": {
                                    "path": {"type": "string", "example": "/test"},
                                    "method": {"type": "string", "enum": methods, "default": "GET"},
                                    "response": payload
                                }
                            }
                        },
                        "multipart/form-data": {
                            "schema": {
                                "type": "object",
                                "required": ["path", "file"],
                                "properties": {
                                    "path": {"type": "string"},
                                    "method": {"type": "string", "enum": methods, "default": "GET"},
                                    "file": {"type": "string", "format": "binary", "description": "JSON document"}
                                }
                            }
                        }
                    }
                },
                "responses": {
                    "200": {
                        "description": "Route stored and bound",
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": {
                                        "ok": {"type": "boolean"},
                                        "path": {"type": "string"},
                                        "method": {"type": "string"},
                                        "savedTo": {"type": "string"}
                                    }
                                }
                            }
                        }
                    },
                    "400": {"description": "Invalid request", "content": {"application/json": {"schema": error}}},
                    "500": {"description": "Storage failure", "content": {"application/json": {"schema": error}}}
                }
            }
        }),
    );
    paths.insert(
        "/api/update".to_string(),
        json!({
            "put": {
                "summary": "Replace the response of an existing route",
                "tags": ["management"],
                "requestBody": {
                    "required": true,
                    "content": {
                        "application/json": {
                            "schema": {
                                "type": "object",
                                "required": ["path", "newResponse"],
                                "properties": {
                                    "path": {"type": "string", "example": "/test"},
                                    "newResponse": payload
                                }
                            }
                        }
                    }
                },
                "responses": {
                    "200": {
                        "description": "Route updated",
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": {
                                        "ok": {"type": "boolean"},
                                        "updated": {"type": "object"}
                                    }
                                }
                            }
                        }
                    },
                    "400": {"description": "Invalid request", "content": {"application/json": {"schema": error}}},
                    "404": {"description": "No route stored for path", "content": {"application/json": {"schema": error}}}
                }
            }
        }),
    );
    paths
}
