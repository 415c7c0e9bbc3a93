//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API:
//! - Groq (https://api.groq.com/openai)
//! - OpenAI (https://api.openai.com)
//! - vLLM (http://localhost:8000)
//! - LocalAI / llama-server (http://localhost:8080)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::settings::AiSettings;

use super::types::CompletionRequest;
use super::AIBackend;

/// OpenAI-compatible backend
///
/// Sends requests to `{base_url}/v1/chat/completions`. For Groq the base URL
/// is `https://api.groq.com/openai`.
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            ..Self::new(base_url, model)
        }
    }

    /// Create from explicit settings, applying the request timeout
    pub fn from_settings(settings: &AiSettings) -> Result<Self> {
        let http_client = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            http_client,
            base_url: settings.host.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    fn build_request(&self, request: &CompletionRequest) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(ref system) = request.system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.user.clone(),
        });

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(request.temperature),
            max_tokens: Some(request.max_tokens),
            stream: false,
        }
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = self.build_request(request);

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&body);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.bearer_auth(api_key);
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Ai(format!("API error {}: {}", status, body)));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Ai("No response from OpenAI-compatible API".into()))?;

        debug!(
            model = %self.model,
            chars = content.len(),
            "OpenAI-compatible completion received"
        );
        Ok(content)
    }

    async fn health_check(&self) -> bool {
        // Try /v1/models first (standard OpenAI endpoint), then /health, then root
        for path in ["/v1/models", "/health", ""] {
            let mut req = self.http_client.get(format!("{}{}", self.base_url, path));
            if let Some(ref api_key) = self.api_key {
                req = req.bearer_auth(api_key);
            }
            if let Ok(resp) = req.send().await {
                if resp.status().is_success() {
                    return true;
                }
            }
        }

        false
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }

    fn provider(&self) -> &'static str {
        "openai_compatible"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockLlmServer;

    #[test]
    fn test_backend_new_trims_trailing_slash() {
        let backend = OpenAICompatibleBackend::new("http://localhost:12434/", "llama3.2");
        assert_eq!(backend.host(), "http://localhost:12434");
        assert_eq!(backend.model(), "llama3.2");
    }

    #[test]
    fn test_backend_with_api_key() {
        let backend = OpenAICompatibleBackend::with_api_key(
            "https://api.groq.com/openai",
            "llama3-70b-8192",
            "gsk_test",
        );
        assert_eq!(backend.api_key.as_deref(), Some("gsk_test"));
        let other = backend.with_model("mixtral-8x7b-32768");
        assert_eq!(other.model(), "mixtral-8x7b-32768");
        assert_eq!(other.api_key.as_deref(), Some("gsk_test"));
    }

    #[test]
    fn test_request_serialization() {
        let backend = OpenAICompatibleBackend::new("http://localhost", "llama3-70b-8192");
        let request = CompletionRequest {
            system: Some("You are a financial advisor AI.".to_string()),
            user: "Hello".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
        };

        let json = serde_json::to_value(backend.build_request(&request)).unwrap();
        assert_eq!(json["model"], "llama3-70b-8192");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Hello");
        let temp = json["temperature"].as_f64().unwrap();
        assert!((temp - 0.7).abs() < 0.001);
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_request_without_system_message() {
        let backend = OpenAICompatibleBackend::new("http://localhost", "m");
        let json =
            serde_json::to_value(backend.build_request(&CompletionRequest::user("Hi"))).unwrap();
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "llama3-70b-8192",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Your spending looks healthy."},
                "finish_reason": "stop"
            }]
        }"#;

        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("Your spending looks healthy.")
        );
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let backend = OpenAICompatibleBackend::new("http://127.0.0.1:1", "llama3.2");
        assert!(!backend.health_check().await);
    }

    #[tokio::test]
    async fn test_complete_against_mock_server() {
        let server = MockLlmServer::start().await;
        let backend = OpenAICompatibleBackend::with_api_key(&server.url(), "test-model", "key");

        let request = CompletionRequest {
            system: Some("system".to_string()),
            user: "Overall Status: over".to_string(),
            temperature: 0.7,
            max_tokens: 100,
        };
        let text = backend.complete(&request).await.unwrap();

        assert!(text.contains("test-model"));
        assert!(text.contains("over budget"));
        assert!(backend.health_check().await);
    }

    #[tokio::test]
    async fn test_complete_reports_api_error() {
        let server = MockLlmServer::start().await;
        let backend = OpenAICompatibleBackend::new(&server.url(), "test-model");

        let result = backend
            .complete(&CompletionRequest::user("trigger error please"))
            .await;

        match result {
            Err(Error::Ai(msg)) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("simulated failure"));
            }
            other => panic!("Expected Ai error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_complete_connection_refused() {
        let backend = OpenAICompatibleBackend::new("http://127.0.0.1:1", "m");
        let result = backend.complete(&CompletionRequest::user("x")).await;
        assert!(matches!(result, Err(Error::Http(_))));
    }
}
