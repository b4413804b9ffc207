//! JSON value helpers and conversion to and from the SDK's `Document`
//!
//! Integers keep their integer representation in both directions so that
//! tool arguments round-trip without turning `3` into `3.0`.

use std::collections::HashMap;

use aws_smithy_types::{Document, Number};
use serde_json::{Map, Value};

/// Convert a `serde_json::Value` to an AWS `Document`
pub fn value_to_document(value: &Value) -> Document {
    match value {
        Value::Null => Document::Null,
        Value::Bool(b) => Document::Bool(*b),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Document::Number(Number::PosInt(u))
            } else if let Some(i) = n.as_i64() {
                Document::Number(Number::NegInt(i))
            } else {
                n.as_f64()
                    .map_or(Document::Null, |f| Document::Number(Number::Float(f)))
            }
        }
        Value::String(s) => Document::String(s.clone()),
        Value::Array(arr) => Document::Array(arr.iter().map(value_to_document).collect()),
        Value::Object(map) => {
            let obj: HashMap<String, Document> = map.iter().map(|(k, v)| (k.clone(), value_to_document(v))).collect();
            Document::Object(obj)
        }
    }
}

/// Convert an AWS `Document` to a `serde_json::Value`
///
/// Non-finite floats have no JSON representation and become `null`.
pub fn document_to_value(doc: &Document) -> Value {
    match doc {
        Document::Object(map) => {
            let obj: Map<String, Value> = map.iter().map(|(k, v)| (k.clone(), document_to_value(v))).collect();
            Value::Object(obj)
        }
        Document::Array(arr) => Value::Array(arr.iter().map(document_to_value).collect()),
        Document::Number(Number::PosInt(u)) => Value::from(*u),
        Document::Number(Number::NegInt(i)) => Value::from(*i),
        Document::Number(Number::Float(f)) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Document::String(s) => Value::String(s.clone()),
        Document::Bool(b) => Value::Bool(*b),
        Document::Null => Value::Null,
    }
}

/// Decode a document that must be a JSON object
///
/// `Null` decodes to an empty map.
///
/// # Errors
///
/// Returns a description of the offending shape when the document is not an
/// object
pub fn document_to_object(doc: &Document) -> Result<Map<String, Value>, String> {
    match doc {
        Document::Null => Ok(Map::new()),
        Document::Object(_) => match document_to_value(doc) {
            Value::Object(map) => Ok(map),
            _ => Err("object decoded to non-object".to_owned()),
        },
        other => Err(format!("expected object, found {}", document_kind(other))),
    }
}

/// Copy every key of an `overrides` object over `target`
///
/// Non-object overrides are ignored.
pub fn merge_shallow(target: &mut Map<String, Value>, overrides: &Value) {
    if let Value::Object(overrides) = overrides {
        for (key, value) in overrides {
            target.insert(key.clone(), value.clone());
        }
    }
}

const fn document_kind(doc: &Document) -> &'static str {
    match doc {
        Document::Object(_) => "object",
        Document::Array(_) => "array",
        Document::Number(_) => "number",
        Document::String(_) => "string",
        Document::Bool(_) => "boolean",
        Document::Null => "null",
    }
}
