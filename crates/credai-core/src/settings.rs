//! Settings for AI backends and report generation
//!
//! ## Configuration Resolution
//!
//! Settings are loaded with a two-layer resolution:
//! 1. Explicit path, or the override in the data dir (~/.local/share/credai/config.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Environment variables are never read implicitly. Callers apply them once
//! at startup with [`Settings::apply_env`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/credai.toml");

/// Which LLM provider implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Any server with the OpenAI `/v1/chat/completions` API (Groq, OpenAI, vLLM, LocalAI)
    OpenaiCompatible,
    /// Ollama `/api/chat`
    Ollama,
    /// Canned responses, no network
    Mock,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenaiCompatible => "openai_compatible",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai_compatible" | "openai" | "groq" | "vllm" | "localai" => {
                Ok(Self::OpenaiCompatible)
            }
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(Error::Config(format!("Unknown AI backend: {}", s))),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// LLM connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub backend: BackendKind,
    /// Base URL of the API server
    pub host: String,
    pub model: String,
    /// API key, usually filled from `api_key_env` at startup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl AiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key with all but the last four characters hidden
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            let visible: String = key
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            if key.chars().count() <= 4 {
                "****".to_string()
            } else {
                format!("****{}", visible)
            }
        })
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::OpenaiCompatible,
            host: "https://api.groq.com/openai".to_string(),
            model: "llama3-70b-8192".to_string(),
            api_key: None,
            api_key_env: "GROQ_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Generation parameters and presentation options for the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Symbol prefixed to every amount in the prompt
    pub currency_symbol: String,
    /// How the model is told to present money, e.g. "British Pounds (£)"
    pub currency_name: String,
    /// Market to tailor advice to; omitted from the prompt when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
            currency_symbol: "£".to_string(),
            currency_name: "British Pounds (£)".to_string(),
            region: Some("UK".to_string()),
        }
    }
}

/// All credai settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ai: AiSettings,
    pub report: ReportSettings,
}

impl Settings {
    /// Load settings (explicit path or data dir override first, then default)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?,
            None => match default_config_path() {
                Some(default_path) if default_path.exists() => fs::read_to_string(&default_path)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?,
                _ => DEFAULT_CONFIG.to_string(),
            },
        };

        Self::parse(&content)
    }

    /// Embedded defaults only
    pub fn embedded() -> Result<Self> {
        Self::parse(DEFAULT_CONFIG)
    }

    /// Parse settings from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))
    }

    /// Apply environment overrides through `lookup`
    ///
    /// Recognised: `CREDAI_BACKEND`, `CREDAI_HOST`, `CREDAI_MODEL`, and the
    /// variable named by `ai.api_key_env`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("CREDAI_BACKEND") {
            self.ai.backend = backend.parse()?;
        }
        if let Some(host) = lookup("CREDAI_HOST") {
            self.ai.host = host;
        }
        if let Some(model) = lookup("CREDAI_MODEL") {
            self.ai.model = model;
        }
        if let Some(key) = lookup(&self.ai.api_key_env).filter(|k| !k.is_empty()) {
            self.ai.api_key = Some(key);
        }
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_process_env(&mut self) -> Result<()> {
        self.apply_env(|name| std::env::var(name).ok())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("credai").join("config.toml"))
}
