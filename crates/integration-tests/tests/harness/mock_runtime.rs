//! Scripted Bedrock runtime for integration tests
//!
//! Records every request and answers from queues filled by the test

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use conduit_core::{ConverseEventStream, ConverseReply, ConverseRequest, RuntimeClient, StreamEvent, TransportError};
use serde_json::Value;

/// One scripted stream: events in order, then either close or hang
struct StreamScript {
    events: Vec<Result<StreamEvent, String>>,
    hang_when_empty: bool,
}

/// Mock runtime client returning canned replies
#[derive(Default)]
pub struct MockRuntime {
    replies: Mutex<VecDeque<Result<ConverseReply, String>>>,
    streams: Mutex<VecDeque<StreamScript>>,
    bodies: Mutex<VecDeque<Result<Vec<u8>, String>>>,
    converse_requests: Mutex<Vec<ConverseRequest>>,
    invocations: Mutex<Vec<(String, Value)>>,
    stream_dropped: Arc<AtomicBool>,
}

impl MockRuntime {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a Converse reply
    pub fn reply(&self, reply: ConverseReply) -> &Self {
        self.replies.lock().unwrap().push_back(Ok(reply));
        self
    }

    /// Queue a Converse failure
    pub fn fail_converse(&self, message: &str) -> &Self {
        self.replies.lock().unwrap().push_back(Err(message.to_owned()));
        self
    }

    /// Queue a stream that closes after `events`
    pub fn stream(&self, events: Vec<Result<StreamEvent, String>>) -> &Self {
        self.push_stream(events, false)
    }

    /// Queue a stream that never closes after `events`
    pub fn hanging_stream(&self, events: Vec<Result<StreamEvent, String>>) -> &Self {
        self.push_stream(events, true)
    }

    fn push_stream(&self, events: Vec<Result<StreamEvent, String>>, hang_when_empty: bool) -> &Self {
        self.streams.lock().unwrap().push_back(StreamScript { events, hang_when_empty });
        self
    }

    /// Queue an InvokeModel response body
    pub fn body(&self, body: &Value) -> &Self {
        self.bodies.lock().unwrap().push_back(Ok(serde_json::to_vec(body).unwrap()));
        self
    }

    /// Queue raw InvokeModel response bytes
    pub fn raw_body(&self, body: &[u8]) -> &Self {
        self.bodies.lock().unwrap().push_back(Ok(body.to_vec()));
        self
    }

    /// Converse and ConverseStream requests received so far
    pub fn converse_requests(&self) -> Vec<ConverseRequest> {
        self.converse_requests.lock().unwrap().clone()
    }

    /// InvokeModel calls received so far, as model id and decoded JSON body
    pub fn invocations(&self) -> Vec<(String, Value)> {
        self.invocations.lock().unwrap().clone()
    }

    /// Whether the last handed-out stream has been released
    pub fn stream_dropped(&self) -> bool {
        self.stream_dropped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RuntimeClient for MockRuntime {
    async fn converse(&self, request: ConverseRequest) -> Result<ConverseReply, TransportError> {
        let model_id = request.model_id.clone();
        self.converse_requests.lock().unwrap().push(request);

        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(TransportError::new("converse", model_id, message)),
            None => Err(TransportError::new("converse", model_id, "no scripted reply")),
        }
    }

    async fn converse_stream(&self, request: ConverseRequest) -> Result<Box<dyn ConverseEventStream>, TransportError> {
        let model_id = request.model_id.clone();
        self.converse_requests.lock().unwrap().push(request);

        let Some(script) = self.streams.lock().unwrap().pop_front() else {
            return Err(TransportError::new("converse_stream", model_id, "no scripted stream"));
        };

        self.stream_dropped.store(false, Ordering::SeqCst);

        Ok(Box::new(MockStream {
            model_id,
            events: script.events.into(),
            hang_when_empty: script.hang_when_empty,
            dropped: Arc::clone(&self.stream_dropped),
        }))
    }

    async fn invoke_model(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let decoded: Value = serde_json::from_slice(&body).unwrap();
        self.invocations.lock().unwrap().push((model_id.to_owned(), decoded));

        match self.bodies.lock().unwrap().pop_front() {
            Some(Ok(body)) => Ok(body),
            Some(Err(message)) => Err(TransportError::new("invoke_model", model_id, message)),
            None => Err(TransportError::new("invoke_model", model_id, "no scripted body")),
        }
    }
}

struct MockStream {
    model_id: String,
    events: VecDeque<Result<StreamEvent, String>>,
    hang_when_empty: bool,
    dropped: Arc<AtomicBool>,
}

#[async_trait]
impl ConverseEventStream for MockStream {
    async fn recv(&mut self) -> Result<Option<StreamEvent>, TransportError> {
        match self.events.pop_front() {
            Some(Ok(event)) => Ok(Some(event)),
            Some(Err(message)) => Err(TransportError::new("converse_stream", &self.model_id, message)),
            None if self.hang_when_empty => std::future::pending().await,
            None => Ok(None),
        }
    }
}

impl Drop for MockStream {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}
