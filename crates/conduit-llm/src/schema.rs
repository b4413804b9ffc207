//! Tool input schema normalization and the wire tool configuration

use std::collections::HashMap;

use aws_sdk_bedrockruntime::types::{Tool, ToolConfiguration, ToolInputSchema, ToolSpecification};
use aws_smithy_types::Document;
use conduit_core::document::value_to_document;
use conduit_core::{Error, SchemaError, SchemaSource, ToolDefinition};
use serde_json::{Map, Value, json};

use crate::coerce;

/// JSON Schema dialect stamped on schemas that do not declare one
pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Normalized JSON-Schema-shaped object
///
/// Always has a `type`; an object schema always has `properties`.
pub type CanonicalSchema = Map<String, Value>;

/// Normalize any supported schema representation
///
/// The input is never mutated. Normalizing an already canonical schema
/// returns it unchanged.
///
/// # Errors
///
/// Returns a `SchemaError` if the source is null, is not valid JSON, or
/// does not describe a JSON object
pub fn normalize(source: &SchemaSource) -> Result<CanonicalSchema, SchemaError> {
    let decoded;
    let value = match source {
        SchemaSource::Value(Value::String(text)) | SchemaSource::Json(text) => {
            decoded = serde_json::from_str::<Value>(text).map_err(SchemaError::Parse)?;
            &decoded
        }
        SchemaSource::Bytes(bytes) => {
            decoded = serde_json::from_slice::<Value>(bytes).map_err(SchemaError::Parse)?;
            &decoded
        }
        SchemaSource::Value(value) => value,
    };

    let mut schema = match value {
        Value::Object(map) => map.clone(),
        Value::Null => return Err(SchemaError::Missing),
        other => {
            return Err(SchemaError::NotAnObject {
                found: value_kind(other),
            });
        }
    };

    schema.entry("type").or_insert_with(|| Value::from("object"));
    if schema.get("type").and_then(Value::as_str) == Some("object") {
        schema.entry("properties").or_insert_with(|| Value::Object(Map::new()));
    }
    schema.entry("$schema").or_insert_with(|| Value::from(DRAFT_07));

    Ok(schema)
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convert a raw tool schema into the wire tool input schema
///
/// # Errors
///
/// Returns a `SchemaError` if the schema is absent or cannot be normalized
pub fn to_wire_tool(source: Option<&SchemaSource>) -> Result<ToolInputSchema, SchemaError> {
    let schema = normalize(source.ok_or(SchemaError::Missing)?)?;
    Ok(wire_schema(&schema))
}

fn wire_schema(schema: &CanonicalSchema) -> ToolInputSchema {
    ToolInputSchema::Json(value_to_document(&Value::Object(schema.clone())))
}

/// Canonical schemas of one request's tools, keyed by exact tool name
#[derive(Debug, Clone, Default)]
pub struct ToolSchemas {
    schemas: HashMap<String, CanonicalSchema>,
}

impl ToolSchemas {
    pub fn get(&self, tool_name: &str) -> Option<&CanonicalSchema> {
        self.schemas.get(tool_name)
    }

    /// Re-type decoded tool-call arguments against the named tool's schema
    ///
    /// Input for a tool that is unknown, or whose schema could not be
    /// normalized, is returned as decoded.
    pub fn coerce_input(&self, tool_name: &str, input: Map<String, Value>) -> Value {
        match self.get(tool_name) {
            Some(schema) => coerce::coerce(Value::Object(input), schema),
            None => Value::Object(input),
        }
    }
}

/// Build the wire tool configuration for a request
///
/// A tool whose schema fails to convert is still offered to the model, with
/// an empty input schema in place of its own.
///
/// # Errors
///
/// Returns `Error::InvalidRequest` if the wire tool specification cannot be
/// assembled
pub fn build_tool_config(tools: &[ToolDefinition]) -> Result<(Option<ToolConfiguration>, ToolSchemas), Error> {
    let mut schemas = ToolSchemas::default();
    if tools.is_empty() {
        return Ok((None, schemas));
    }

    let mut wire_tools = Vec::with_capacity(tools.len());
    for tool in tools {
        let input_schema = match tool.input_schema.as_ref().ok_or(SchemaError::Missing).and_then(normalize) {
            Ok(schema) => {
                let wire = wire_schema(&schema);
                // First definition of a repeated name drives coercion
                schemas.schemas.entry(tool.name.clone()).or_insert(schema);
                wire
            }
            Err(e) => {
                tracing::warn!(tool = %tool.name, error = %e, "tool schema conversion failed, registering without input hints");
                ToolInputSchema::Json(Document::Object(HashMap::new()))
            }
        };

        let spec = ToolSpecification::builder()
            .name(&tool.name)
            .set_description((!tool.description.is_empty()).then(|| tool.description.clone()))
            .input_schema(input_schema)
            .build()
            .map_err(|e| Error::InvalidRequest(format!("invalid tool specification for '{}': {e}", tool.name)))?;

        wire_tools.push(Tool::ToolSpec(spec));
    }

    let config = ToolConfiguration::builder()
        .set_tools(Some(wire_tools))
        .build()
        .map_err(|e| Error::InvalidRequest(format!("invalid tool configuration: {e}")))?;

    Ok((Some(config), schemas))
}

/// Schema for an object with the given properties
pub fn object_schema(properties: Map<String, Value>, required: &[&str]) -> Value {
    let mut schema = json!({
        "type": "object",
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

/// Schema for a string, optionally restricted to `allowed` values
pub fn string_schema(description: &str, allowed: &[&str]) -> Value {
    let mut schema = json!({ "type": "string" });
    if !description.is_empty() {
        schema["description"] = json!(description);
    }
    if !allowed.is_empty() {
        schema["enum"] = json!(allowed);
    }
    schema
}

/// Schema for a number with optional bounds
pub fn number_schema(description: &str, minimum: Option<f64>, maximum: Option<f64>) -> Value {
    let mut schema = json!({ "type": "number" });
    if !description.is_empty() {
        schema["description"] = json!(description);
    }
    if let Some(minimum) = minimum {
        schema["minimum"] = json!(minimum);
    }
    if let Some(maximum) = maximum {
        schema["maximum"] = json!(maximum);
    }
    schema
}

/// Schema for an array of `items`
pub fn array_schema(items: Value, description: &str) -> Value {
    let mut schema = json!({
        "type": "array",
        "items": items,
    });
    if !description.is_empty() {
        schema["description"] = json!(description);
    }
    schema
}
