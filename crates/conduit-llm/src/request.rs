//! Assembly of a Converse request from a generic model request

use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message as WireMessage, SystemContentBlock,
};
use conduit_core::{ConverseRequest, Error, Message, ModelRequest, Part, Role};
use serde_json::{Map, Value};

use crate::content::{cache_point, to_wire_block};
use crate::schema::{ToolSchemas, build_tool_config};

/// A wire request plus the canonical schemas needed to read its reply
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub converse: ConverseRequest,
    pub tools: ToolSchemas,
}

/// Build the Converse request for `model_id`
///
/// System messages become the system prompt list. Other messages are mapped
/// part by part; a message left with no blocks is dropped, and consecutive
/// user-side turns (user and tool messages) are merged into one wire turn.
/// When tools are offered, a trailing assistant turn is removed because the
/// service rejects tool-enabled conversations ending on one.
///
/// # Errors
///
/// Returns `Error::InvalidRequest` if a wire block cannot be assembled
pub fn build_request(model_id: &str, request: &ModelRequest) -> Result<PreparedRequest, Error> {
    let mut system = Vec::new();
    let mut messages: Vec<WireMessage> = Vec::new();

    for message in &request.messages {
        if message.role == Role::System {
            system.extend(system_blocks(message)?);
            continue;
        }

        let mut blocks = Vec::with_capacity(message.content.len());
        for part in &message.content {
            if let Some(block) = to_wire_block(part)? {
                blocks.push(block);
            }
        }

        if blocks.is_empty() {
            tracing::debug!(role = %message.role, "dropping message with no content blocks");
            continue;
        }

        let role = match message.role {
            Role::Model => ConversationRole::Assistant,
            _ => ConversationRole::User,
        };

        // Tool results answer the preceding assistant turn; fold them into an
        // already open user turn rather than emitting two user turns in a row
        if message.role == Role::Tool
            && let Some(last) = messages.last_mut()
            && last.role() == &ConversationRole::User
        {
            let mut merged = last.content().to_vec();
            merged.extend(blocks);
            *last = wire_message(ConversationRole::User, merged)?;
            continue;
        }

        messages.push(wire_message(role, blocks)?);
    }

    let (tool_config, tools) = build_tool_config(&request.tools)?;

    if tool_config.is_some() && messages.last().is_some_and(|m| m.role() == &ConversationRole::Assistant) {
        tracing::debug!("removing trailing assistant turn from tool-enabled conversation");
        messages.pop();
    }

    let inference_config = match &request.config {
        Some(Value::Object(config)) => Some(inference_config(config)),
        _ => None,
    };

    Ok(PreparedRequest {
        converse: ConverseRequest {
            model_id: model_id.to_owned(),
            messages,
            system,
            inference_config,
            tool_config,
        },
        tools,
    })
}

fn system_blocks(message: &Message) -> Result<Vec<SystemContentBlock>, Error> {
    let mut blocks = Vec::new();
    for part in &message.content {
        match part {
            Part::Text(text) => blocks.push(SystemContentBlock::Text(text.clone())),
            Part::CachePoint => blocks.push(SystemContentBlock::CachePoint(cache_point()?)),
            _ => tracing::debug!("ignoring non-text part in system message"),
        }
    }
    Ok(blocks)
}

fn wire_message(role: ConversationRole, content: Vec<ContentBlock>) -> Result<WireMessage, Error> {
    WireMessage::builder()
        .role(role)
        .set_content(Some(content))
        .build()
        .map_err(|e| Error::InvalidRequest(format!("invalid message: {e}")))
}

/// Read inference parameters from a loosely typed config object
///
/// Absent or mistyped keys are left for the service to default.
pub fn inference_config(config: &Map<String, Value>) -> InferenceConfiguration {
    let lookup = |camel: &str, snake: &str| config.get(camel).or_else(|| config.get(snake));

    let max_tokens = lookup("maxOutputTokens", "max_tokens")
        .and_then(Value::as_i64)
        .and_then(|n| i32::try_from(n).ok());

    #[allow(clippy::cast_possible_truncation)]
    let temperature = config.get("temperature").and_then(Value::as_f64).map(|t| t as f32);

    #[allow(clippy::cast_possible_truncation)]
    let top_p = lookup("topP", "top_p").and_then(Value::as_f64).map(|p| p as f32);

    let stop_sequences = lookup("stopSequences", "stop_sequences")
        .and_then(Value::as_array)
        .map(|seqs| seqs.iter().filter_map(Value::as_str).map(str::to_owned).collect::<Vec<_>>());

    InferenceConfiguration::builder()
        .set_max_tokens(max_tokens)
        .set_temperature(temperature)
        .set_top_p(top_p)
        .set_stop_sequences(stop_sequences)
        .build()
}
