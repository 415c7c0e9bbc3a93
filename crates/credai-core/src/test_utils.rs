//! Test utilities for credai-core
//!
//! This module provides a mock LLM server speaking both the OpenAI chat
//! completions API and the Ollama chat API, for integration tests and
//! offline development.
//!
//! Responses are derived from the prompt: a user message containing
//! "Overall Status: over" gets an over-budget summary, "trigger error"
//! gets an HTTP 500.

use axum::{
    extract::Json,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// Mock LLM server for testing and development
pub struct MockLlmServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockLlmServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat_completions))
            .route("/api/tags", get(handle_tags))
            .route("/api/chat", post(handle_ollama_chat));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockLlmServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Canned report text for a prompt
fn mock_report(model: &str, messages: &[MockMessage]) -> Option<String> {
    let user = messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.as_str())
        .unwrap_or_default();

    if user.contains("trigger error") {
        return None;
    }

    let verdict = if user.contains("Overall Status: over") {
        "you are over budget"
    } else {
        "you are within budget"
    };
    Some(format!("Mock report from {}: {}.", model, verdict))
}

async fn handle_models() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "object": "list",
        "data": [{"id": "mock-model", "object": "model"}]
    }))
}

async fn handle_chat_completions(Json(request): Json<ChatRequest>) -> Response {
    match mock_report(&request.model, &request.messages) {
        Some(content) => Json(serde_json::json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": request.model,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "simulated failure").into_response(),
    }
}

async fn handle_tags() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "models": [{"name": "llama3.2:latest", "size": 4_000_000_000u64}]
    }))
}

async fn handle_ollama_chat(Json(request): Json<ChatRequest>) -> Response {
    match mock_report(&request.model, &request.messages) {
        Some(content) => Json(OllamaChatResponse {
            model: request.model,
            message: MockMessage {
                role: "assistant".to_string(),
                content,
            },
            done: true,
        })
        .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "simulated failure").into_response(),
    }
}

/// Chat request body shared by both APIs
#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<MockMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MockMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaChatResponse {
    model: String,
    message: MockMessage,
    done: bool,
}
