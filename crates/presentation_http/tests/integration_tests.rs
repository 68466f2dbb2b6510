//! Integration tests for HTTP handlers
#![allow(clippy::expect_used)]

use std::time::Duration;

use ai_core::{EngineSelector, MockEngine, RemoteEngineConfig};
use application::ChatService;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use presentation_http::{
    AppState, TRACE_ID_HEADER, create_router,
    sse::{SseFrame, parse_frames},
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Server whose remote provider points at `remote_base_url`
fn server_with_remote(remote_base_url: &str) -> TestServer {
    let selector = EngineSelector::new(
        RemoteEngineConfig::default()
            .with_base_url(remote_base_url)
            .with_model("test-model")
            .with_timeout_ms(2000),
    )
    .with_mock(MockEngine::with_pacing(Duration::ZERO));

    let router = create_router(AppState::new(ChatService::new(selector)));
    TestServer::new(router).expect("Failed to create test server")
}

/// Server with an unreachable remote backend
fn test_server() -> TestServer {
    server_with_remote("http://127.0.0.1:1")
}

fn hi_request(provider: &str) -> Value {
    json!({
        "provider": provider,
        "messages": [{"role": "user", "content": "hi"}],
        "max_tokens": 16
    })
}

fn kinds(frames: &[SseFrame]) -> Vec<&str> {
    frames.iter().map(|f| f.event.as_str()).collect()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_returns_ok() {
    let server = test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

// =============================================================================
// /chat
// =============================================================================

#[tokio::test]
async fn chat_with_mock_echoes_message() {
    let server = test_server();

    let response = server.post("/chat").json(&hi_request("mock")).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["answer"].as_str().expect("answer").contains("hi"));
    assert!(body["trace_id"].is_string());
    assert_eq!(
        body["trace_id"].as_str(),
        response.header(TRACE_ID_HEADER).to_str().ok()
    );
}

#[tokio::test]
async fn chat_echoes_session_id() {
    let server = test_server();

    let mut request = hi_request("MOCK");
    request["session_id"] = json!("session-9");
    let response = server.post("/chat").json(&request).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["session_id"], "session-9");
}

#[tokio::test]
async fn chat_with_unreachable_remote_is_bad_gateway() {
    let server = test_server();

    let response = server
        .post("/chat")
        .add_header(
            HeaderName::from_static(TRACE_ID_HEADER),
            HeaderValue::from_static("upstream-check-1"),
        )
        .json(&hi_request("remote"))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["trace_id"], "upstream-check-1");
    assert_eq!(body["code"], "upstream_failure");
    assert!(body["error"].as_str().expect("error").contains("ollama"));
}

#[tokio::test]
async fn chat_with_remote_uses_backend_answer() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "remote says hello",
            "done": true
        })))
        .mount(&backend)
        .await;

    let server = server_with_remote(&backend.uri());
    let response = server.post("/chat").json(&hi_request("ollama")).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["answer"], "remote says hello");
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn empty_messages_are_rejected() {
    let server = test_server();

    let response = server
        .post("/chat")
        .json(&json!({"messages": []}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn zero_max_tokens_is_rejected_before_streaming() {
    let server = test_server();

    let mut request = hi_request("mock");
    request["max_tokens"] = json!(0);
    let response = server.post("/chat/stream").json(&request).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_provider_is_rejected() {
    let server = test_server();

    let response = server.post("/chat").json(&hi_request("gpt-9")).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_role_is_rejected() {
    let server = test_server();

    let response = server
        .post("/chat")
        .json(&json!({"messages": [{"role": "robot", "content": "hi"}]}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// =============================================================================
// /chat/stream
// =============================================================================

#[tokio::test]
async fn mock_stream_is_ordered_and_complete() {
    let server = test_server();

    let response = server.post("/chat/stream").json(&hi_request("mock")).await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-type").to_str().expect("ascii"),
        "text/event-stream"
    );
    assert_eq!(
        response.header("cache-control").to_str().expect("ascii"),
        "no-cache"
    );

    let text = response.text();
    assert!(text.contains("event: token"));
    assert!(text.ends_with("event: done\ndata: [DONE]\n\n"));

    let frames = parse_frames(&text);
    let kinds = kinds(&frames);
    assert_eq!(kinds.first(), Some(&"meta"));
    assert_eq!(&kinds[kinds.len() - 2..], &["usage", "done"]);
    assert_eq!(kinds.iter().filter(|k| **k == "meta").count(), 1);
    assert!(kinds.iter().filter(|k| **k == "token").count() >= 1);
    assert!(!kinds.contains(&"error"));

    let tokens: String = frames
        .iter()
        .filter(|f| f.event == "token")
        .map(|f| f.data.as_str())
        .collect();
    assert_eq!(tokens, "[mock-stream] [mock] you said: hi");

    let usage: Value = serde_json::from_str(&frames[frames.len() - 2].data).expect("usage json");
    assert_eq!(usage["provider"], "mock");
    assert!(usage["model"].is_null());
    assert_eq!(usage["token_events"], tokens.chars().count());
}

#[tokio::test]
async fn unreachable_remote_stream_ends_with_error_event() {
    let server = test_server();

    let response = server
        .post("/chat/stream")
        .json(&hi_request("remote"))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-type").to_str().expect("ascii"),
        "text/event-stream"
    );

    let frames = parse_frames(&response.text());
    assert_eq!(kinds(&frames), vec!["meta", "error"]);

    let failure: Value = serde_json::from_str(&frames[1].data).expect("error json");
    assert_eq!(failure["provider"], "ollama");
    assert_eq!(failure["model"], "test-model");
    assert!(failure["error"].as_str().expect("error").contains("ollama"));
}

#[tokio::test]
async fn remote_stream_relays_backend_chunks() {
    let backend = MockServer::start().await;
    let body = [
        r#"{"response":"Hel","done":false}"#,
        "garbage",
        r#"{"response":"lo","done":false}"#,
        r#"{"response":"","done":true}"#,
    ]
    .join("\n");
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .mount(&backend)
        .await;

    let server = server_with_remote(&backend.uri());
    let response = server
        .post("/chat/stream")
        .json(&hi_request("remote"))
        .await;

    let frames = parse_frames(&response.text());
    assert_eq!(kinds(&frames), vec!["meta", "token", "token", "usage", "done"]);
    assert_eq!(frames[1].data, "Hel");
    assert_eq!(frames[2].data, "lo");

    let usage: Value = serde_json::from_str(&frames[3].data).expect("usage json");
    assert_eq!(usage["token_events"], 2);
    assert_eq!(usage["model"], "test-model");
}

#[tokio::test]
async fn remote_stream_error_mid_way_keeps_partial_tokens() {
    let backend = MockServer::start().await;
    let body = [
        r#"{"response":"partial","done":false}"#,
        r#"{"error":"model runner stopped"}"#,
    ]
    .join("\n");
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .mount(&backend)
        .await;

    let server = server_with_remote(&backend.uri());
    let response = server
        .post("/chat/stream")
        .json(&hi_request("remote"))
        .await;

    let frames = parse_frames(&response.text());
    assert_eq!(kinds(&frames), vec!["meta", "token", "error"]);
    assert!(frames[2].data.contains("model runner stopped"));
}

// =============================================================================
// Trace propagation
// =============================================================================

#[tokio::test]
async fn inbound_trace_id_is_reused_everywhere() {
    let server = test_server();

    let response = server
        .post("/chat/stream")
        .add_header(
            HeaderName::from_static(TRACE_ID_HEADER),
            HeaderValue::from_static("client-trace-abc"),
        )
        .json(&hi_request("mock"))
        .await;

    assert_eq!(
        response.header(TRACE_ID_HEADER).to_str().expect("ascii"),
        "client-trace-abc"
    );

    let frames = parse_frames(&response.text());
    let meta: Value = serde_json::from_str(&frames[0].data).expect("meta json");
    assert_eq!(meta["trace_id"], "client-trace-abc");
    let usage: Value = serde_json::from_str(&frames[frames.len() - 2].data).expect("usage json");
    assert_eq!(usage["trace_id"], "client-trace-abc");
}

#[tokio::test]
async fn trace_id_is_generated_when_absent() {
    let server = test_server();

    let first = server.get("/health").await;
    let second = server.get("/health").await;

    let a = first.header(TRACE_ID_HEADER);
    let b = second.header(TRACE_ID_HEADER);
    assert!(!a.is_empty());
    assert_ne!(a, b);
}
