//! Request/response shape tests for the OpenAI-compatible backend.

#![cfg(feature = "openai")]

use scentvault_core::{ChatBackend, ChatRequest, Message, ModelReply, ToolCall, ToolSpec};
use scentvault_inference::openai::{OpenAIBackend, OpenAIConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer, referer: Option<&str>) -> OpenAIBackend {
    OpenAIBackend::new(OpenAIConfig {
        base_url: server.uri(),
        api_key: Some("test-key".to_string()),
        gen_model: "test-gen".to_string(),
        timeout_seconds: 10,
        http_referer: referer.map(str::to_string),
        x_title: referer.map(|_| "M Katalog Parfum".to_string()),
    })
    .expect("Failed to create backend")
}

#[tokio::test]
async fn test_tool_call_arguments_are_decoded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "test-gen",
            "messages": [{"role": "system"}, {"role": "user", "content": "campur vanila"}],
            "tools": [{"type": "function", "function": {"name": "findMixIngredients"}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_xyz",
                        "type": "function",
                        "function": {"name": "findMixIngredients", "arguments": "{\"query\":\"vanila\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = backend(&server, None)
        .chat(ChatRequest {
            system: "sys".to_string(),
            messages: vec![Message::user("campur vanila")],
            tools: vec![ToolSpec {
                name: "findMixIngredients".to_string(),
                description: "Find blend ingredients".to_string(),
                parameters: json!({"type": "object", "properties": {"query": {"type": "string"}}}),
            }],
        })
        .await
        .unwrap();

    match reply {
        ModelReply::ToolCall(call) => {
            assert_eq!(call.id, "call_xyz");
            assert_eq!(call.str_arg("query"), Some("vanila"));
        }
        other => panic!("expected tool call, got {:?}", other),
    }
}

#[tokio::test]
async fn test_tool_result_follow_up_carries_call_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "user"},
                {"role": "assistant", "tool_calls": [{"id": "call_1"}]},
                {"role": "tool", "tool_call_id": "call_1", "content": "[]"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-2",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Tidak ada hasil."},
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let call = ToolCall {
        id: "call_1".to_string(),
        name: "searchCatalog".to_string(),
        arguments: json!({"query": "xyz"}),
    };
    let reply = backend(&server, None)
        .chat(ChatRequest {
            system: String::new(),
            messages: vec![
                Message::user("cari xyz"),
                Message::assistant_tool_call(call.clone()),
                Message::tool_result(&call, "[]"),
            ],
            tools: vec![],
        })
        .await
        .unwrap();

    assert_eq!(reply, ModelReply::Text(Some("Tidak ada hasil.".to_string())));
}

#[tokio::test]
async fn test_structured_output_uses_json_schema_response_format() {
    let server = MockServer::start().await;
    let schema = json!({"title": "MixRecipe", "type": "object"});

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("HTTP-Referer", "https://katalog.example"))
        .and(header("X-Title", "M Katalog Parfum"))
        .and(body_partial_json(json!({
            "response_format": {"type": "json_schema", "json_schema": {"name": "MixRecipe"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-3",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "{\"mixName\": \"Fajar\"}"},
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let value = backend(&server, Some("https://katalog.example"))
        .generate_structured("", "prompt", &schema)
        .await
        .unwrap()
        .expect("structured value");
    assert_eq!(value["mixName"], "Fajar");
}

#[tokio::test]
async fn test_auth_failure_maps_to_config_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Invalid API key", "type": "invalid_request_error", "code": "invalid_api_key"}
        })))
        .mount(&server)
        .await;

    let err = backend(&server, None)
        .chat(ChatRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, scentvault_core::Error::Config(_)));
}
