mod harness;

use std::sync::{Arc, Mutex};

use aws_sdk_bedrockruntime::types::StopReason;
use conduit_core::{
    Error, FinishReason, Message, Model, ModelRequest, ModelResponseChunk, RequestContext, StreamCallback, StreamEvent,
    ToolDefinition,
};
use conduit_plugin::{ModelDefinition, ModelType};
use harness::fixtures::{plugin, text_delta, usage};
use harness::mock_runtime::MockRuntime;
use serde_json::json;

const CLAUDE: &str = "anthropic.claude-3-haiku-20240307-v1:0";

fn chat_model(mock: &Arc<MockRuntime>) -> Arc<dyn Model> {
    let (plugin, registry) = plugin(mock);
    plugin
        .define_model(&registry, &ModelDefinition::new(CLAUDE, ModelType::Chat), None)
        .unwrap()
}

fn request() -> ModelRequest {
    ModelRequest::new(vec![Message::user("Count to three")])
}

#[tokio::test]
async fn deltas_reach_callback_in_order() {
    let mock = MockRuntime::new();
    mock.stream(vec![
        text_delta("one"),
        text_delta(", two"),
        text_delta(", three"),
        Ok(StreamEvent::BlockStop { index: 0 }),
        Ok(StreamEvent::MessageStop(StopReason::EndTurn)),
        Ok(StreamEvent::Metadata(usage())),
    ]);
    let model = chat_model(&mock);

    let mut chunks = Vec::new();
    let callback: &mut StreamCallback<'_> = &mut |_: &RequestContext, chunk: ModelResponseChunk| {
        chunks.push(chunk.text());
        Ok(())
    };
    let response = model
        .generate(&request(), &RequestContext::new(), Some(callback))
        .await
        .unwrap();

    assert_eq!(chunks, ["one", ", two", ", three"]);
    assert_eq!(response.text(), "one, two, three");
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(15));
    assert!(mock.stream_dropped());
}

#[tokio::test]
async fn callback_failure_aborts_and_releases_stream() {
    let mock = MockRuntime::new();
    mock.hanging_stream(vec![text_delta("a"), text_delta("b"), text_delta("c")]);
    let model = chat_model(&mock);

    let mut calls = 0;
    let callback: &mut StreamCallback<'_> = &mut |_: &RequestContext, _chunk: ModelResponseChunk| {
        calls += 1;
        if calls == 2 {
            anyhow::bail!("client went away");
        }
        Ok(())
    };
    let err = model
        .generate(&request(), &RequestContext::new(), Some(callback))
        .await
        .unwrap_err();

    assert!(matches!(&err, Error::Callback(source) if source.to_string() == "client went away"));
    assert_eq!(calls, 2);
    assert!(mock.stream_dropped());
}

#[tokio::test]
async fn transport_error_mid_stream() {
    let mock = MockRuntime::new();
    mock.stream(vec![text_delta("partial"), Err("connection reset".to_owned())]);
    let model = chat_model(&mock);

    let received = Arc::new(Mutex::new(String::new()));
    let sink = Arc::clone(&received);
    let callback: &mut StreamCallback<'_> = &mut move |_: &RequestContext, chunk: ModelResponseChunk| {
        sink.lock().unwrap().push_str(&chunk.text());
        Ok(())
    };
    let err = model
        .generate(&request(), &RequestContext::new(), Some(callback))
        .await
        .unwrap_err();

    assert!(err.is_transient());
    assert_eq!(*received.lock().unwrap(), "partial");
    assert!(mock.stream_dropped());
}

#[tokio::test]
async fn cancellation_stops_a_hanging_stream() {
    let mock = MockRuntime::new();
    mock.hanging_stream(vec![text_delta("first")]);
    let model = chat_model(&mock);

    // Cancel from inside the callback; the next read must not block
    let callback: &mut StreamCallback<'_> = &mut |context: &RequestContext, _chunk: ModelResponseChunk| {
        context.cancellation().cancel();
        Ok(())
    };
    let result = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        model.generate(&request(), &RequestContext::new(), Some(callback)),
    )
    .await
    .expect("generation should stop promptly");

    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(mock.stream_dropped());
}

#[tokio::test]
async fn streamed_tool_use_matches_non_streaming_shape() {
    let mock = MockRuntime::new();
    mock.stream(vec![
        text_delta("Checking."),
        Ok(StreamEvent::BlockStop { index: 0 }),
        Ok(StreamEvent::ToolUseStart {
            index: 1,
            tool_use_id: "tooluse_1".to_owned(),
            name: "weather".to_owned(),
        }),
        Ok(StreamEvent::ToolUseDelta {
            index: 1,
            input: r#"{"city": "Oslo", "#.to_owned(),
        }),
        Ok(StreamEvent::ToolUseDelta {
            index: 1,
            input: r#""days": "3"}"#.to_owned(),
        }),
        Ok(StreamEvent::BlockStop { index: 1 }),
        Ok(StreamEvent::MessageStop(StopReason::ToolUse)),
    ]);
    let model = chat_model(&mock);

    let tool = ToolDefinition::new(
        "weather",
        "Forecast",
        json!({"properties": {"city": {"type": "string"}, "days": {"type": "integer"}}}),
    );
    let mut chunks = 0;
    let callback: &mut StreamCallback<'_> = &mut |_: &RequestContext, _chunk: ModelResponseChunk| {
        chunks += 1;
        Ok(())
    };
    let response = model
        .generate(&request().with_tools(vec![tool]), &RequestContext::new(), Some(callback))
        .await
        .unwrap();

    assert_eq!(chunks, 1);
    assert_eq!(response.text(), "Checking.");
    let calls: Vec<_> = response.tool_requests().collect();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].ref_id, "tooluse_1");
    assert_eq!(calls[0].input, json!({"city": "Oslo", "days": 3}));
    assert_eq!(response.finish_reason, FinishReason::Stop);
}
