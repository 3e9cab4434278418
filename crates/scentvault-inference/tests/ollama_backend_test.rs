//! Request/response shape tests for the Ollama backend against a mock server.

#![cfg(feature = "ollama")]

use scentvault_core::{ChatBackend, ChatRequest, Message, ModelReply, ToolSpec};
use scentvault_inference::OllamaBackend;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn search_tool() -> ToolSpec {
    ToolSpec {
        name: "searchCatalog".to_string(),
        description: "Search the perfume catalog".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {"query": {"type": "string"}},
            "required": ["query"]
        }),
    }
}

fn backend(server: &MockServer) -> OllamaBackend {
    OllamaBackend::with_config(server.uri(), "qwen3:8b".to_string(), 10)
        .expect("Failed to create backend")
}

#[tokio::test]
async fn test_tool_call_reply_is_parsed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "qwen3:8b",
            "stream": false,
            "tools": [{"type": "function", "function": {"name": "searchCatalog"}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "qwen3:8b",
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [
                    {"function": {"name": "searchCatalog", "arguments": {"query": "oud"}}},
                    {"function": {"name": "findMixIngredients", "arguments": {"query": "oud"}}}
                ]
            },
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = backend(&server)
        .chat(ChatRequest {
            system: "You are a perfume assistant.".to_string(),
            messages: vec![Message::user("ada parfum oud?")],
            tools: vec![search_tool()],
        })
        .await
        .unwrap();

    match reply {
        ModelReply::ToolCall(call) => {
            assert_eq!(call.name, "searchCatalog");
            assert_eq!(call.str_arg("query"), Some("oud"));
        }
        other => panic!("expected tool call, got {:?}", other),
    }
}

#[tokio::test]
async fn test_text_reply_and_blank_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": "   "},
            "done": true
        })))
        .mount(&server)
        .await;

    let reply = backend(&server)
        .chat(ChatRequest {
            messages: vec![Message::user("halo")],
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(reply, ModelReply::Text(None));
}

#[tokio::test]
async fn test_structured_output_sends_schema_as_format() {
    let server = MockServer::start().await;
    let schema = json!({"type": "object", "properties": {"mixName": {"type": "string"}}});

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"format": schema.clone(), "think": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {
                "role": "assistant",
                "content": "{\"mixName\": \"Senja\", \"recipe\": [], \"description\": \"d\"}"
            },
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let value = backend(&server)
        .generate_structured("system", "prompt", &schema)
        .await
        .unwrap()
        .expect("structured value");
    assert_eq!(value["mixName"], "Senja");
}

#[tokio::test]
async fn test_server_error_maps_to_inference_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .chat(ChatRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, scentvault_core::Error::Inference(_)));
    assert!(err.to_string().contains("model not loaded"));
}

#[tokio::test]
async fn test_health_check_uses_tags_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"models": []})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(backend(&server).health_check().await.unwrap());
}
