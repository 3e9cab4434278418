//! OpenAI-compatible chat backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use scentvault_core::{
    ChatBackend, ChatRequest, Error, Message, MessageRole, ModelReply, Result, ToolCall,
};

use super::error::{to_scentvault_error, OpenAIErrorCode};
use super::types::*;
use crate::json::{non_empty_text, parse_model_json};

/// Default OpenAI API endpoint.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = "gpt-4o-mini";

/// Default timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication (optional for local endpoints).
    pub api_key: Option<String>,
    /// Model to use for generation.
    pub gen_model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// HTTP-Referer header for OpenRouter.ai rankings (optional).
    pub http_referer: Option<String>,
    /// X-Title header for app name on OpenRouter.ai (optional).
    pub x_title: Option<String>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key: None,
            gen_model: DEFAULT_GEN_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            http_referer: None,
            x_title: None,
        }
    }
}

/// OpenAI-compatible chat backend.
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    /// Create a new OpenAI backend with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing OpenAI backend: url={}, gen={}",
            config.base_url, config.gen_model
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        let config = OpenAIConfig {
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_URL.to_string()),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            gen_model: std::env::var("OPENAI_GEN_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEN_MODEL.to_string()),
            timeout_seconds: std::env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            http_referer: std::env::var("OPENAI_HTTP_REFERER").ok(),
            x_title: std::env::var("OPENAI_X_TITLE").ok(),
        };

        Self::new(config)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// Build a POST request with authentication and OpenRouter headers.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.post(self.url(endpoint));

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }
        if let Some(ref referer) = self.config.http_referer {
            req = req.header("HTTP-Referer", referer);
        }
        if let Some(ref title) = self.config.x_title {
            req = req.header("X-Title", title);
        }

        req.header("Content-Type", "application/json")
    }

    fn to_wire_message(msg: &Message) -> ChatMessage {
        let role = match msg.role {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Tool => "tool",
        };
        ChatMessage {
            role: role.to_string(),
            content: msg.content.clone(),
            tool_calls: msg.tool_call.as_ref().map(|call| {
                vec![WireToolCall {
                    id: call.id.clone(),
                    kind: "function".to_string(),
                    function: WireFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.to_string(),
                    },
                }]
            }),
            tool_call_id: msg.tool_call_id.clone(),
        }
    }

    /// POST `/chat/completions` and return the first choice's message.
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatMessage> {
        let start = Instant::now();

        let response = self
            .build_request("/chat/completions")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(format!("OpenAI chat: {}", e))
                } else {
                    Error::Inference(format!("Request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body: OpenAIErrorResponse = response.json().await.unwrap_or(OpenAIErrorResponse {
                error: OpenAIError {
                    message: "Unknown error".to_string(),
                    error_type: "unknown".to_string(),
                    code: None,
                },
            });
            let code = OpenAIErrorCode::from_response(status.as_u16(), &body.error.error_type);
            return Err(to_scentvault_error(
                code,
                &format!("OpenAI returned {}: {}", status, body.error.message),
            ));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let elapsed = start.elapsed().as_millis() as u64;
        if elapsed > scentvault_core::defaults::SLOW_GENERATION_MS {
            warn!(duration_ms = elapsed, slow = true, "Slow generation operation");
        }

        result
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| Error::Inference("Response contained no choices".to_string()))
    }
}

#[async_trait]
impl ChatBackend for OpenAIBackend {
    #[instrument(skip(self, request), fields(subsystem = "inference", component = "openai", op = "chat", model = %self.config.gen_model, tool_count = request.tools.len()))]
    async fn chat(&self, request: ChatRequest) -> Result<ModelReply> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if !request.system.is_empty() {
            messages.push(ChatMessage::text("system", request.system.clone()));
        }
        messages.extend(request.messages.iter().map(Self::to_wire_message));

        let wire = ChatCompletionRequest {
            model: self.config.gen_model.clone(),
            messages,
            tools: request
                .tools
                .iter()
                .map(|spec| ToolDefinition {
                    kind: "function".to_string(),
                    function: FunctionDefinition {
                        name: spec.name.clone(),
                        description: spec.description.clone(),
                        parameters: spec.parameters.clone(),
                    },
                })
                .collect(),
            response_format: None,
            temperature: None,
            stream: false,
        };

        let message = self.complete(&wire).await?;

        let mut calls = message.tool_calls.unwrap_or_default();
        if !calls.is_empty() {
            if calls.len() > 1 {
                debug!(ignored = calls.len() - 1, "Model requested several tools, using the first");
            }
            let first = calls.swap_remove(0);
            let arguments = serde_json::from_str::<JsonValue>(&first.function.arguments)
                .unwrap_or_else(|e| {
                    warn!(tool = %first.function.name, error = %e, "Tool arguments are not valid JSON");
                    JsonValue::Object(Default::default())
                });
            return Ok(ModelReply::ToolCall(ToolCall {
                id: first.id,
                name: first.function.name,
                arguments,
            }));
        }

        debug!(
            response_len = message.content.as_deref().map_or(0, str::len),
            "Chat complete"
        );
        Ok(ModelReply::Text(non_empty_text(message.content)))
    }

    #[instrument(skip(self, system, prompt, schema), fields(subsystem = "inference", component = "openai", op = "generate_structured", model = %self.config.gen_model, prompt_len = prompt.len()))]
    async fn generate_structured(
        &self,
        system: &str,
        prompt: &str,
        schema: &JsonValue,
    ) -> Result<Option<JsonValue>> {
        let mut messages = Vec::new();
        if !system.is_empty() {
            messages.push(ChatMessage::text("system", system));
        }
        messages.push(ChatMessage::text("user", prompt));

        let name = schema
            .get("title")
            .and_then(JsonValue::as_str)
            .unwrap_or("response");

        let wire = ChatCompletionRequest {
            model: self.config.gen_model.clone(),
            messages,
            tools: Vec::new(),
            response_format: Some(ResponseFormat::json_schema(name, schema.clone())),
            temperature: None,
            stream: false,
        };

        let message = self.complete(&wire).await?;
        let parsed = message.content.as_deref().and_then(parse_model_json);
        if parsed.is_none() {
            warn!("Structured generation returned no parseable JSON");
        }
        Ok(parsed)
    }

    fn model_name(&self) -> &str {
        &self.config.gen_model
    }

    async fn health_check(&self) -> Result<bool> {
        let mut req = self
            .client
            .get(self.url("/models"))
            .timeout(Duration::from_secs(5));
        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        match req.send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("OpenAI health check passed");
                Ok(true)
            }
            Ok(resp) => {
                warn!("OpenAI health check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("OpenAI health check error: {}", e);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenAIConfig::default();
        assert_eq!(config.base_url, DEFAULT_OPENAI_URL);
        assert_eq!(config.gen_model, DEFAULT_GEN_MODEL);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECS);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let backend = OpenAIBackend::new(OpenAIConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            backend.url("/chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_tool_messages_round_trip_ids() {
        let call = ToolCall {
            id: "call_7".to_string(),
            name: "findMixIngredients".to_string(),
            arguments: serde_json::json!({"query": "vanilla"}),
        };

        let assistant = OpenAIBackend::to_wire_message(&Message::assistant_tool_call(call.clone()));
        assert!(assistant.content.is_none());
        let wire_call = &assistant.tool_calls.unwrap()[0];
        assert_eq!(wire_call.id, "call_7");
        assert_eq!(wire_call.function.arguments, r#"{"query":"vanilla"}"#);

        let result = OpenAIBackend::to_wire_message(&Message::tool_result(&call, "[]"));
        assert_eq!(result.role, "tool");
        assert_eq!(result.tool_call_id.as_deref(), Some("call_7"));
    }
}
