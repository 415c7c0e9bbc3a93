//! Pluggable LLM backend abstraction
//!
//! This module provides a backend-agnostic interface for text generation.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all backends
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `OllamaBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut settings = Settings::load(None)?;
//! settings.apply_process_env()?;
//! let client = AIClient::from_settings(&settings.ai)?;
//! let text = client.complete(&CompletionRequest::user("Hello")).await?;
//! ```
//!
//! Clients are always built from explicit [`AiSettings`]; nothing here reads
//! the environment.

mod mock;
mod ollama;
mod openai_compatible;
pub mod types;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::settings::{AiSettings, BackendKind};

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Generate text for a chat-style request
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for report metadata)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;

    /// Short provider name (for report metadata)
    fn provider(&self) -> &'static str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// OpenAI-compatible backend (Groq, OpenAI, vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from explicit settings
    pub fn from_settings(settings: &AiSettings) -> Result<Self> {
        let client = match settings.backend {
            BackendKind::OpenaiCompatible => {
                AIClient::OpenAICompatible(OpenAICompatibleBackend::from_settings(settings)?)
            }
            BackendKind::Ollama => AIClient::Ollama(OllamaBackend::from_settings(settings)?),
            BackendKind::Mock => AIClient::Mock(MockBackend::new()),
        };
        info!(
            backend = %settings.backend,
            host = %client.host(),
            model = %client.model(),
            "AI client configured"
        );
        Ok(client)
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    ///
    /// Used for runtime model override (e.g. `--model` on the command line)
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Ollama(b) => AIClient::Ollama(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        match self {
            AIClient::OpenAICompatible(b) => b.complete(request).await,
            AIClient::Ollama(b) => b.complete(request).await,
            AIClient::Mock(b) => b.complete(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Ollama(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Ollama(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }

    fn provider(&self) -> &'static str {
        match self {
            AIClient::OpenAICompatible(b) => b.provider(),
            AIClient::Ollama(b) => b.provider(),
            AIClient::Mock(b) => b.provider(),
        }
    }
}
