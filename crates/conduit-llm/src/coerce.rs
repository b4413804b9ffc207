//! Re-typing of decoded tool-call arguments against a tool's schema
//!
//! Arguments come back from the service with loose types: numbers as
//! strings, floats where integers were declared, booleans as text. The
//! coercion only ever changes the type of a value that is already present;
//! it never adds keys and never fails.

use serde_json::{Map, Value};

/// Coerce `value` to the primitive types declared by `schema`
///
/// Values that cannot be converted, and values whose shape does not match
/// the declared type, are returned unchanged.
pub fn coerce(value: Value, schema: &Map<String, Value>) -> Value {
    let Some(declared) = schema.get("type").and_then(Value::as_str) else {
        return value;
    };

    match (declared, value) {
        ("number", value) => to_number(value),
        ("integer", value) => to_integer(value),
        ("boolean", Value::String(text)) => parse_bool(&text).map_or(Value::String(text), Value::Bool),
        ("array", Value::Array(items)) => match schema.get("items") {
            Some(Value::Object(item_schema)) => {
                Value::Array(items.into_iter().map(|item| coerce(item, item_schema)).collect())
            }
            _ => Value::Array(items),
        },
        ("object", Value::Object(fields)) => match schema.get("properties") {
            Some(Value::Object(properties)) => Value::Object(coerce_fields(fields, properties)),
            _ => Value::Object(fields),
        },
        (_, value) => value,
    }
}

fn coerce_fields(fields: Map<String, Value>, properties: &Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| {
            let value = match properties.get(&key) {
                Some(Value::Object(property)) => coerce(value, property),
                _ => value,
            };
            (key, value)
        })
        .collect()
}

fn to_number(value: Value) -> Value {
    let parsed = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .and_then(serde_json::Number::from_f64)
        .map_or(value, Value::Number)
}

fn to_integer(value: Value) -> Value {
    match &value {
        Value::Number(n) if n.is_i64() || n.is_u64() => value,
        Value::Number(n) => n.as_f64().and_then(truncate).map_or(value, Value::from),
        Value::String(text) => text.parse::<f64>().ok().and_then(truncate).map_or(value, Value::from),
        _ => value,
    }
}

/// Truncate toward zero, rejecting values with no `i64` equivalent
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn truncate(f: f64) -> Option<i64> {
    let t = f.trunc();
    (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then_some(t as i64)
}

/// Boolean spellings accepted by the service's SDK tooling
fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
