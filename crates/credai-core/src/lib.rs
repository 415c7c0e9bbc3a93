//! credai Core Library
//!
//! Shared functionality for the credai budget report tool:
//! - Financial data model (income, expenses, budgets)
//! - Budget variance analysis
//! - Input collection (interactive console, JSON files)
//! - Settings with embedded defaults and explicit environment overrides
//! - Prompt library for customizable report prompts
//! - Pluggable LLM backends (OpenAI-compatible/Groq, Ollama, mock)
//! - Report generator turning an analysis into natural-language advice

pub mod ai;
pub mod analyzer;
pub mod error;
pub mod input;
pub mod models;
pub mod prompts;
pub mod report;
pub mod settings;

/// Test utilities including a mock LLM server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    AIBackend, AIClient, CompletionRequest, MockBackend, OllamaBackend, OpenAICompatibleBackend,
};
pub use analyzer::analyze;
pub use error::{Error, Result};
pub use input::{collect_interactive, load_input_file, parse_input_json};
pub use models::{
    BudgetUtilization, CategoryAmounts, CategoryUtilization, CategoryVariance, FinancialInput,
    UtilizationBand, VarianceReport, VarianceStatus,
};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use report::{fallback_message, GeneratedReport, RenderedPrompt, ReportGenerator};
pub use settings::{AiSettings, BackendKind, ReportSettings, Settings};
