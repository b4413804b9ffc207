//! Shared builders for plugin-level tests

use std::sync::Arc;

use aws_sdk_bedrockruntime::types::{ContentBlock, ConversationRole, Message as WireMessage, StopReason};
use conduit_core::{ConverseReply, Registry, RuntimeClient, StreamEvent, TokenCounts};
use conduit_plugin::{BedrockPlugin, PluginOptions};

use super::mock_runtime::MockRuntime;

/// An initialized plugin wired to `mock`
pub fn plugin(mock: &Arc<MockRuntime>) -> (BedrockPlugin, Registry) {
    let plugin = BedrockPlugin::new(PluginOptions::default());
    let registry = Registry::new();
    let client: Arc<dyn RuntimeClient> = Arc::clone(mock) as Arc<dyn RuntimeClient>;
    plugin.init_with_client(&registry, client).unwrap();
    (plugin, registry)
}

/// Assistant reply made of `blocks`
pub fn reply(blocks: Vec<ContentBlock>, stop_reason: StopReason) -> ConverseReply {
    ConverseReply {
        message: Some(
            WireMessage::builder()
                .role(ConversationRole::Assistant)
                .set_content(Some(blocks))
                .build()
                .unwrap(),
        ),
        stop_reason,
        usage: Some(usage()),
    }
}

pub fn text_reply(text: &str) -> ConverseReply {
    reply(vec![ContentBlock::Text(text.to_owned())], StopReason::EndTurn)
}

pub fn usage() -> TokenCounts {
    TokenCounts {
        input: 10,
        output: 5,
        total: 15,
        cache_read: 0,
    }
}

pub fn text_delta(text: &str) -> Result<StreamEvent, String> {
    Ok(StreamEvent::TextDelta {
        index: 0,
        text: text.to_owned(),
    })
}
