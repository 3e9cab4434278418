//! Ollama chat backend.
//!
//! Uses the `/api/chat` endpoint for both tool calling (`tools`) and
//! schema-constrained output (`format` set to a JSON schema).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use scentvault_core::{
    ChatBackend, ChatRequest, Error, Message, MessageRole, ModelReply, Result, ToolCall, ToolSpec,
};

use crate::json::{non_empty_text, parse_model_json};

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = scentvault_core::defaults::OLLAMA_URL;

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = scentvault_core::defaults::GEN_MODEL;

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = scentvault_core::defaults::GEN_TIMEOUT_SECS;

/// Ollama chat backend.
pub struct OllamaBackend {
    client: Client,
    base_url: String,
    gen_model: String,
    gen_timeout_secs: u64,
}

impl OllamaBackend {
    /// Create a backend with custom configuration.
    pub fn with_config(base_url: String, gen_model: String, gen_timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(gen_timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing Ollama backend: url={}, gen={}",
            base_url, gen_model
        );

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            gen_model,
            gen_timeout_secs,
        })
    }

    /// Create a backend with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(
            DEFAULT_OLLAMA_URL.to_string(),
            DEFAULT_GEN_MODEL.to_string(),
            GEN_TIMEOUT_SECS,
        )
    }

    /// Create from `OLLAMA_BASE`, `OLLAMA_GEN_MODEL` and `OLLAMA_GEN_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("OLLAMA_BASE").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());
        let gen_model =
            std::env::var("OLLAMA_GEN_MODEL").unwrap_or_else(|_| DEFAULT_GEN_MODEL.to_string());
        let timeout = std::env::var("OLLAMA_GEN_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(GEN_TIMEOUT_SECS);

        Self::with_config(base_url, gen_model, timeout)
    }

    fn to_wire_message(msg: &Message) -> OllamaMessage {
        OllamaMessage {
            role: match msg.role {
                MessageRole::System => "system",
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
                MessageRole::Tool => "tool",
            }
            .to_string(),
            content: msg.content.clone().unwrap_or_default(),
            tool_calls: msg.tool_call.as_ref().map(|call| {
                vec![OllamaToolCall {
                    function: OllamaFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    },
                }]
            }),
            tool_name: msg.name.clone(),
        }
    }

    fn to_wire_tool(spec: &ToolSpec) -> OllamaTool {
        OllamaTool {
            kind: "function".to_string(),
            function: OllamaFunction {
                name: spec.name.clone(),
                description: spec.description.clone(),
                parameters: spec.parameters.clone(),
            },
        }
    }

    /// POST to `/api/chat` and return the assistant message.
    async fn send_chat(&self, request: &OllamaChatRequest) -> Result<OllamaMessage> {
        let start = Instant::now();

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .timeout(Duration::from_secs(self.gen_timeout_secs))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(format!("Ollama chat: {}", e))
                } else {
                    Error::Inference(format!("Request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let result: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = result.message.content.len(),
            tool_calls = result.message.tool_calls.as_ref().map_or(0, |c| c.len()),
            duration_ms = elapsed,
            "Chat complete"
        );
        if elapsed > scentvault_core::defaults::SLOW_GENERATION_MS {
            warn!(duration_ms = elapsed, slow = true, "Slow generation operation");
        }
        Ok(result.message)
    }
}

/// Message in Ollama's chat format.
#[derive(Debug, Serialize, Deserialize, Clone)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OllamaToolCall>>,
    /// Name of the tool whose result this message carries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct OllamaToolCall {
    function: OllamaFunctionCall,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct OllamaFunctionCall {
    name: String,
    /// Ollama sends arguments as an object, not a string.
    #[serde(default)]
    arguments: JsonValue,
}

#[derive(Debug, Serialize)]
struct OllamaTool {
    #[serde(rename = "type")]
    kind: String,
    function: OllamaFunction,
}

#[derive(Debug, Serialize)]
struct OllamaFunction {
    name: String,
    description: String,
    parameters: JsonValue,
}

/// Request payload for `/api/chat`.
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<OllamaTool>,
    /// JSON schema the reply must follow.
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<JsonValue>,
    /// Disable chain-of-thought for thinking models when structure is required.
    #[serde(skip_serializing_if = "Option::is_none")]
    think: Option<bool>,
}

/// Response from `/api/chat`.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[async_trait]
impl ChatBackend for OllamaBackend {
    #[instrument(skip(self, request), fields(subsystem = "inference", component = "ollama", op = "chat", model = %self.gen_model, tool_count = request.tools.len()))]
    async fn chat(&self, request: ChatRequest) -> Result<ModelReply> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if !request.system.is_empty() {
            messages.push(OllamaMessage {
                role: "system".to_string(),
                content: request.system.clone(),
                tool_calls: None,
                tool_name: None,
            });
        }
        messages.extend(request.messages.iter().map(Self::to_wire_message));

        let wire = OllamaChatRequest {
            model: self.gen_model.clone(),
            messages,
            stream: false,
            tools: request.tools.iter().map(Self::to_wire_tool).collect(),
            format: None,
            think: None,
        };

        let message = self.send_chat(&wire).await?;

        let mut calls = message.tool_calls.unwrap_or_default();
        if !calls.is_empty() {
            if calls.len() > 1 {
                debug!(ignored = calls.len() - 1, "Model requested several tools, using the first");
            }
            let first = calls.swap_remove(0);
            return Ok(ModelReply::ToolCall(ToolCall {
                id: "call_0".to_string(),
                name: first.function.name,
                arguments: first.function.arguments,
            }));
        }

        Ok(ModelReply::Text(non_empty_text(Some(message.content))))
    }

    #[instrument(skip(self, system, prompt, schema), fields(subsystem = "inference", component = "ollama", op = "generate_structured", model = %self.gen_model, prompt_len = prompt.len()))]
    async fn generate_structured(
        &self,
        system: &str,
        prompt: &str,
        schema: &JsonValue,
    ) -> Result<Option<JsonValue>> {
        let mut messages = Vec::new();
        if !system.is_empty() {
            messages.push(Self::to_wire_message(&Message {
                role: MessageRole::System,
                content: Some(system.to_string()),
                tool_call: None,
                tool_call_id: None,
                name: None,
            }));
        }
        messages.push(Self::to_wire_message(&Message::user(prompt)));

        let wire = OllamaChatRequest {
            model: self.gen_model.clone(),
            messages,
            stream: false,
            tools: Vec::new(),
            format: Some(schema.clone()),
            think: Some(false),
        };

        let message = self.send_chat(&wire).await?;
        let parsed = parse_model_json(&message.content);
        if parsed.is_none() {
            warn!(
                response_len = message.content.len(),
                "Structured generation returned no parseable JSON"
            );
        }
        Ok(parsed)
    }

    fn model_name(&self) -> &str {
        &self.gen_model
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("Ollama health check passed");
                Ok(true)
            }
            Ok(resp) => {
                warn!("Ollama health check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Ollama health check error: {}", e);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_OLLAMA_URL, "http://127.0.0.1:11434");
        assert_eq!(GEN_TIMEOUT_SECS, 120);
    }

    #[test]
    fn test_custom_config_trims_trailing_slash() {
        let backend =
            OllamaBackend::with_config("http://custom:1234/".to_string(), "m".to_string(), 5)
                .unwrap();
        assert_eq!(backend.base_url, "http://custom:1234");
        assert_eq!(backend.model_name(), "m");
    }

    #[test]
    fn test_tool_result_message_carries_tool_name() {
        let call = ToolCall {
            id: "call_0".to_string(),
            name: "searchCatalog".to_string(),
            arguments: serde_json::json!({"query": "oud"}),
        };
        let wire = OllamaBackend::to_wire_message(&Message::tool_result(&call, "[]"));
        assert_eq!(wire.role, "tool");
        assert_eq!(wire.tool_name.as_deref(), Some("searchCatalog"));

        let wire = OllamaBackend::to_wire_message(&Message::assistant_tool_call(call));
        assert_eq!(wire.role, "assistant");
        let calls = wire.tool_calls.unwrap();
        assert_eq!(calls[0].function.arguments["query"], "oud");
    }

    #[test]
    fn test_request_omits_empty_tools_and_format() {
        let wire = OllamaChatRequest {
            model: "m".to_string(),
            messages: vec![],
            stream: false,
            tools: vec![],
            format: None,
            think: None,
        };
        let json = serde_json::to_value(&wire).unwrap();
        assert!(json.get("tools").is_none());
        assert!(json.get("format").is_none());
        assert!(json.get("think").is_none());
    }
}
