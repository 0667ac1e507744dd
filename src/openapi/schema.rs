//! Schema inference from example JSON values.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Structural description of an example value, serialized in JSON Schema
/// form.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// No constraint (`{}`); produced for the items of an empty array.
    Any,
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array(Box<SchemaNode>),
    Object(BTreeMap<String, SchemaNode>),
}

impl SchemaNode {
    fn type_name(&self) -> Option<&'static str> {
        match self {
            SchemaNode::Any => None,
            SchemaNode::Null => Some("null"),
            SchemaNode::Boolean => Some("boolean"),
            SchemaNode::Integer => Some("integer"),
            SchemaNode::Number => Some("number"),
            SchemaNode::String => Some("string"),
            SchemaNode::Array(_) => Some("array"),
            SchemaNode::Object(_) => Some("object"),
        }
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(ty) = self.type_name() {
            map.serialize_entry("type", ty)?;
        }
        match self {
            SchemaNode::Array(items) => map.serialize_entry("items", items)?,
            SchemaNode::Object(properties) => map.serialize_entry("properties", properties)?,
            _ => {}
        }
        map.end()
    }
}

/// Infer a schema from an example value.
///
/// Arrays are described by their first element only; an empty array gets
/// an unconstrained item schema. Numbers with no fractional part are
/// integers.
pub fn infer(value: &Value) -> SchemaNode {
    match value {
        Value::Null => SchemaNode::Null,
        Value::Bool(_) => SchemaNode::Boolean,
        Value::Number(n) => {
            let integral = n.is_i64()
                || n.is_u64()
                || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0);
            if integral {
                SchemaNode::Integer
            } else {
                SchemaNode::Number
            }
        }
        Value::String(_) => SchemaNode::String,
        Value::Array(items) => {
            let item = items.first().map(infer).unwrap_or(SchemaNode::Any);
            SchemaNode::Array(Box::new(item))
        }
        Value::Object(fields) => SchemaNode::Object(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), infer(value)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitives() {
        assert_eq!(infer(&json!(null)), SchemaNode::Null);
        assert_eq!(infer(&json!(true)), SchemaNode::Boolean);
        assert_eq!(infer(&json!("x")), SchemaNode::String);
        assert_eq!(infer(&json!(3)), SchemaNode::Integer);
        assert_eq!(infer(&json!(-3)), SchemaNode::Integer);
        assert_eq!(infer(&json!(2.0)), SchemaNode::Integer);
        assert_eq!(infer(&json!(2.5)), SchemaNode::Number);
    }

    #[test]
    fn test_array_uses_first_element_only() {
        let schema = infer(&json!({"a": 1, "b": [true, "x"]}));
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "type": "object",
                "properties": {
                    "a": {"type": "integer"},
                    "b": {"type": "array", "items": {"type": "boolean"}}
                }
            })
        );
    }

    #[test]
    fn test_empty_array_items_unconstrained() {
        assert_eq!(
            serde_json::to_value(infer(&json!([]))).unwrap(),
            json!({"type": "array", "items": {}})
        );
    }

    #[test]
    fn test_nested_objects() {
        let schema = infer(&json!({"user": {"name": "ann", "tags": [{"id": 1.5}]}}));
        assert_eq!(
            serde_json::to_value(schema).unwrap(),
            json!({
                "type": "object",
                "properties": {
                    "user": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "tags": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {"id": {"type": "number"}}
                                }
                            }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(
            serde_json::to_value(infer(&json!({}))).unwrap(),
            json!({"type": "object", "properties": {}})
        );
    }
}
