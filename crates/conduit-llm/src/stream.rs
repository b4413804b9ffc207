//! Aggregation of a ConverseStream event sequence
//!
//! Text deltas are forwarded to the caller's callback one by one, in arrival
//! order, while the full response is accumulated. The aggregator owns the
//! event stream, so the stream is released on every exit path: completion,
//! callback failure, transport failure or cancellation.

use std::collections::BTreeMap;

use aws_sdk_bedrockruntime::types::StopReason;
use conduit_core::{
    ConverseEventStream, Error, FinishReason, ModelResponse, ModelResponseChunk, Part, RequestContext, StreamCallback,
    StreamEvent, TokenCounts,
};
use serde_json::{Map, Value};

use crate::content::decode_placeholder;
use crate::response::{finish_reason, usage};
use crate::schema::ToolSchemas;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Streaming,
    Done,
}

#[derive(Debug)]
struct PendingToolUse {
    tool_use_id: String,
    name: String,
    input: String,
}

/// Per-call accumulator for one streaming generation
pub struct StreamAggregator<'a> {
    tools: &'a ToolSchemas,
    state: State,
    text: String,
    stop_reason: Option<StopReason>,
    usage: Option<TokenCounts>,
    tool_uses: BTreeMap<i32, PendingToolUse>,
}

impl<'a> StreamAggregator<'a> {
    pub const fn new(tools: &'a ToolSchemas) -> Self {
        Self {
            tools,
            state: State::Streaming,
            text: String::new(),
            stop_reason: None,
            usage: None,
            tool_uses: BTreeMap::new(),
        }
    }

    /// Drain `stream`, invoking `callback` once per text delta
    ///
    /// The stream is read to exhaustion so trailing usage metadata is kept.
    ///
    /// # Errors
    ///
    /// Returns `Error::Callback` if the callback fails, `Error::Transport` if
    /// the stream fails, and `Error::Cancelled` if the context is cancelled.
    /// No partial response is returned in any of these cases.
    pub async fn run(
        mut self,
        mut stream: Box<dyn ConverseEventStream>,
        context: &RequestContext,
        callback: &mut StreamCallback<'_>,
    ) -> Result<ModelResponse, Error> {
        while let Some(event) = context.run(stream.recv()).await?? {
            self.apply(event, context, callback)?;
        }

        Ok(self.finish())
    }

    fn apply(
        &mut self,
        event: StreamEvent,
        context: &RequestContext,
        callback: &mut StreamCallback<'_>,
    ) -> Result<(), Error> {
        match event {
            StreamEvent::TextDelta { text, .. } if self.state == State::Streaming => {
                self.text.push_str(&text);
                let chunk = ModelResponseChunk {
                    index: 0,
                    content: vec![Part::Text(text)],
                };
                callback(context, chunk).map_err(Error::Callback)?;
            }
            StreamEvent::ToolUseStart {
                index,
                tool_use_id,
                name,
            } => {
                self.tool_uses.insert(
                    index,
                    PendingToolUse {
                        tool_use_id,
                        name,
                        input: String::new(),
                    },
                );
            }
            StreamEvent::ToolUseDelta { index, input } => match self.tool_uses.get_mut(&index) {
                Some(pending) => pending.input.push_str(&input),
                None => tracing::debug!(index, "tool input fragment for unknown content block"),
            },
            StreamEvent::MessageStop(stop_reason) => {
                self.stop_reason = Some(stop_reason);
                self.state = State::Done;
            }
            StreamEvent::Metadata(counts) => self.usage = Some(counts),
            StreamEvent::TextDelta { .. } => tracing::debug!("ignoring text delta after message stop"),
            StreamEvent::BlockStop { .. } | StreamEvent::Other => {}
        }

        Ok(())
    }

    fn finish(self) -> ModelResponse {
        let finish = self.stop_reason.as_ref().map_or(FinishReason::Stop, finish_reason);

        let mut content = Vec::with_capacity(1 + self.tool_uses.len());
        content.push(Part::Text(self.text));

        for pending in self.tool_uses.into_values() {
            let input = match decode_tool_input(&pending.input) {
                Ok(fields) => self.tools.coerce_input(&pending.name, fields),
                Err(e) => {
                    tracing::warn!(tool = %pending.name, tool_use_id = %pending.tool_use_id, error = %e, "failed to decode streamed tool input");
                    decode_placeholder(&e, &pending.tool_use_id)
                }
            };
            content.push(Part::tool_request(pending.name, input, pending.tool_use_id));
        }

        ModelResponse::new(content, finish, self.usage.map(usage))
    }
}

fn decode_tool_input(raw: &str) -> Result<Map<String, Value>, String> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err("tool input is not a JSON object".to_owned()),
        Err(e) => Err(e.to_string()),
    }
}
