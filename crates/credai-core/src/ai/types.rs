//! AI backend request/response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde::{Deserialize, Serialize};

/// A single chat-style generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Instructions sent as the system message, if any
    pub system: Option<String>,
    /// The user message
    pub user: String,
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Request with only a user message and default generation parameters
    pub fn user(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            user: prompt.into(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}
