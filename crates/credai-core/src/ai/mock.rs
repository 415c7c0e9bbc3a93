//! Mock backend for testing
//!
//! Returns predictable text without a running LLM server. Can be configured
//! with a fixed response or a failure, and records every request it sees.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::CompletionRequest;
use super::AIBackend;

/// Mock AI backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    model: Option<String>,
    response: Option<String>,
    failure: Option<String>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self::default()
    }

    /// Always answer with `text`
    pub fn with_response(text: &str) -> Self {
        Self {
            response: Some(text.to_string()),
            ..Self::new()
        }
    }

    /// Always fail with an `Error::Ai` carrying `message`
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Create a new instance reporting a different model name
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: Some(model.to_string()),
            ..self.clone()
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests
            .lock()
            .map_err(|_| Error::Ai("mock request log lock poisoned".into()))?
            .push(request.clone());

        if let Some(ref message) = self.failure {
            return Err(Error::Ai(message.clone()));
        }
        if let Some(ref text) = self.response {
            return Ok(text.clone());
        }

        let verdict = if request.user.contains("Overall Status: over") {
            "You spent more than you budgeted this month."
        } else {
            "You stayed within your budget this month."
        };
        Ok(format!(
            "Summary: {}\nAdvice: review your largest categories and set aside savings first.",
            verdict
        ))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        self.model.as_deref().unwrap_or("mock")
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }

    fn provider(&self) -> &'static str {
        "mock"
    }
}
