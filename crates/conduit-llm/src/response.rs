//! Conversion of Converse replies into generic responses

use aws_sdk_bedrockruntime::types::StopReason;
use conduit_core::{ConverseReply, FinishReason, ModelResponse, Part, TokenCounts, Usage};

use crate::content::to_part;
use crate::schema::ToolSchemas;

/// Map a wire stop reason onto a finish reason
pub fn finish_reason(stop_reason: &StopReason) -> FinishReason {
    match stop_reason {
        StopReason::EndTurn | StopReason::StopSequence | StopReason::ToolUse => FinishReason::Stop,
        StopReason::MaxTokens => FinishReason::Length,
        StopReason::ContentFiltered => FinishReason::Blocked,
        _ => FinishReason::Other,
    }
}

pub fn usage(counts: TokenCounts) -> Usage {
    let clamp = |n: i32| u32::try_from(n).unwrap_or_default();
    Usage {
        input_tokens: clamp(counts.input),
        output_tokens: clamp(counts.output),
        total_tokens: clamp(counts.total),
        cached_content_tokens: clamp(counts.cache_read),
    }
}

/// Convert a non-streaming reply
///
/// A reply with no usable content carries a single empty text part.
pub fn from_reply(reply: &ConverseReply, tools: &ToolSchemas) -> ModelResponse {
    let mut content: Vec<Part> = reply
        .message
        .iter()
        .flat_map(|message| message.content())
        .filter_map(|block| to_part(block, tools))
        .collect();

    if content.is_empty() {
        content.push(Part::text(""));
    }

    ModelResponse::new(content, finish_reason(&reply.stop_reason), reply.usage.map(usage))
}
