//! Scripted chat backend for deterministic testing.
//!
//! Replies are queued up front and consumed in order, one per call. An
//! exhausted chat script answers `Text(None)`; an exhausted structured script
//! answers `Ok(None)`. Every call is recorded for assertions.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scentvault_inference::mock::MockChatBackend;
//! use scentvault_core::{ChatBackend, ChatRequest, ModelReply};
//!
//! # async fn demo() {
//! let backend = MockChatBackend::new()
//!     .then_tool_call("searchCatalog", serde_json::json!({"query": "oud"}))
//!     .then_text("Ini pilihan oud kami.");
//!
//! let first = backend.chat(ChatRequest::default()).await.unwrap();
//! assert!(matches!(first, ModelReply::ToolCall(_)));
//! assert_eq!(backend.chat_call_count(), 1);
//! # }
//! ```

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use scentvault_core::{ChatBackend, ChatRequest, Error, ModelReply, Result, ToolCall};

/// One scripted outcome of [`ChatBackend::chat`].
#[derive(Debug, Clone)]
enum ChatStep {
    Reply(ModelReply),
    Fail(String),
}

/// One scripted outcome of [`ChatBackend::generate_structured`].
#[derive(Debug, Clone)]
enum StructuredStep {
    Value(Option<JsonValue>),
    Fail(String),
}

/// A recorded backend call.
#[derive(Debug, Clone)]
pub enum MockCall {
    Chat(ChatRequest),
    Structured {
        system: String,
        prompt: String,
        schema: JsonValue,
    },
}

#[derive(Default)]
struct Script {
    chat: VecDeque<ChatStep>,
    structured: VecDeque<StructuredStep>,
    calls: Vec<MockCall>,
    tool_calls_issued: usize,
}

/// Scripted chat backend.
#[derive(Clone, Default)]
pub struct MockChatBackend {
    script: Arc<Mutex<Script>>,
    latency: Option<Duration>,
}

impl MockChatBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push_chat(self, step: ChatStep) -> Self {
        self.lock().chat.push_back(step);
        self
    }

    fn push_structured(self, step: StructuredStep) -> Self {
        self.lock().structured.push_back(step);
        self
    }

    /// Next chat call answers with text.
    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.push_chat(ChatStep::Reply(ModelReply::Text(Some(text.into()))))
    }

    /// Next chat call answers with no usable text.
    pub fn then_no_text(self) -> Self {
        self.push_chat(ChatStep::Reply(ModelReply::Text(None)))
    }

    /// Next chat call invokes `name` with `arguments`.
    pub fn then_tool_call(self, name: &str, arguments: JsonValue) -> Self {
        let id = {
            let mut script = self.lock();
            script.tool_calls_issued += 1;
            format!("call_{}", script.tool_calls_issued)
        };
        self.push_chat(ChatStep::Reply(ModelReply::ToolCall(ToolCall {
            id,
            name: name.to_string(),
            arguments,
        })))
    }

    /// Next chat call fails with an inference error.
    pub fn then_chat_error(self, message: impl Into<String>) -> Self {
        self.push_chat(ChatStep::Fail(message.into()))
    }

    /// Next structured call returns `value`.
    pub fn then_structured(self, value: JsonValue) -> Self {
        self.push_structured(StructuredStep::Value(Some(value)))
    }

    /// Next structured call produces nothing.
    pub fn then_no_structured(self) -> Self {
        self.push_structured(StructuredStep::Value(None))
    }

    /// Next structured call fails with an inference error.
    pub fn then_structured_error(self, message: impl Into<String>) -> Self {
        self.push_structured(StructuredStep::Fail(message.into()))
    }

    /// Delay every call, for timeout tests.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// All recorded calls, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Recorded chat requests, oldest first.
    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                MockCall::Chat(req) => Some(req.clone()),
                MockCall::Structured { .. } => None,
            })
            .collect()
    }

    pub fn chat_call_count(&self) -> usize {
        self.chat_requests().len()
    }

    pub fn structured_call_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, MockCall::Structured { .. }))
            .count()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn chat(&self, request: ChatRequest) -> Result<ModelReply> {
        let step = {
            let mut script = self.lock();
            script.calls.push(MockCall::Chat(request));
            script.chat.pop_front()
        };
        self.simulate_latency().await;

        match step {
            Some(ChatStep::Reply(reply)) => Ok(reply),
            Some(ChatStep::Fail(msg)) => Err(Error::Inference(msg)),
            None => Ok(ModelReply::Text(None)),
        }
    }

    async fn generate_structured(
        &self,
        system: &str,
        prompt: &str,
        schema: &JsonValue,
    ) -> Result<Option<JsonValue>> {
        let step = {
            let mut script = self.lock();
            script.calls.push(MockCall::Structured {
                system: system.to_string(),
                prompt: prompt.to_string(),
                schema: schema.clone(),
            });
            script.structured.pop_front()
        };
        self.simulate_latency().await;

        match step {
            Some(StructuredStep::Value(value)) => Ok(value),
            Some(StructuredStep::Fail(msg)) => Err(Error::Inference(msg)),
            None => Ok(None),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
