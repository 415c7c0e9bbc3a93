//! AI report generation
//!
//! Turns a [`VarianceReport`] into a prompt, sends it to an injected
//! [`AIBackend`] and returns the generated text with metadata. Failures are
//! returned as errors; callers that must not abort use [`fallback_message`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::ai::{AIBackend, CompletionRequest};
use crate::error::{Error, Result};
use crate::models::VarianceReport;
use crate::prompts::{PromptId, PromptLibrary};
use crate::settings::ReportSettings;

/// Name used in the prompt when the user gave none
pub const DEFAULT_NAME: &str = "there";

/// Prompt text ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPrompt {
    pub system: Option<String>,
    pub user: String,
}

/// Generated report text plus metadata about how it was produced
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReport {
    pub text: String,
    pub provider: String,
    pub model: String,
    pub elapsed_ms: u64,
    pub generated_at: DateTime<Utc>,
}

/// Builds prompts from analyses and asks the backend for a report
pub struct ReportGenerator<B: AIBackend> {
    backend: B,
    settings: ReportSettings,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl<B: AIBackend> ReportGenerator<B> {
    /// Create a generator using the default prompt library
    pub fn new(backend: B, settings: ReportSettings) -> Self {
        Self::with_prompts(backend, settings, PromptLibrary::new())
    }

    /// Create a generator with an explicit prompt library
    pub fn with_prompts(backend: B, settings: ReportSettings, prompts: PromptLibrary) -> Self {
        Self {
            backend,
            settings,
            prompts: Arc::new(RwLock::new(prompts)),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Render the report prompt for an analysis
    pub fn build_prompt(&self, report: &VarianceReport, name: Option<&str>) -> Result<RenderedPrompt> {
        let symbol = self.settings.currency_symbol.as_str();
        let income = format_amount(symbol, report.income);
        let total_budget = format_amount(symbol, report.total_budget);
        let total_spent = format_amount(symbol, report.total_spent);
        let categories = format_category_lines(report, symbol);
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_NAME);
        let region = self.settings.region.as_deref().unwrap_or_default();

        let mut vars = HashMap::new();
        vars.insert("name", name);
        vars.insert("income", income.as_str());
        vars.insert("total_budget", total_budget.as_str());
        vars.insert("total_spent", total_spent.as_str());
        vars.insert("status", report.status.as_str());
        vars.insert("categories", categories.as_str());
        vars.insert("currency", self.settings.currency_name.as_str());
        vars.insert("region", region);

        let mut prompts = self
            .prompts
            .write()
            .map_err(|_| Error::Prompt("Failed to acquire prompt library lock".into()))?;
        let template = prompts.get(PromptId::FinancialReport)?;

        Ok(RenderedPrompt {
            system: template.render_system(&vars),
            user: template.render_user(&vars),
        })
    }

    /// Generate a natural-language report for an analysis
    pub async fn generate(
        &self,
        report: &VarianceReport,
        name: Option<&str>,
    ) -> Result<GeneratedReport> {
        let prompt = self.build_prompt(report, name)?;
        debug!(
            chars = prompt.user.len(),
            categories = report.details.len(),
            "Rendered report prompt"
        );

        let request = CompletionRequest {
            system: prompt.system,
            user: prompt.user,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let started = Instant::now();
        let result = self.backend.complete(&request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let text = match result {
            Ok(text) if text.trim().is_empty() => {
                warn!(model = %self.backend.model(), "Backend returned an empty report");
                return Err(Error::Ai("empty completion".into()));
            }
            Ok(text) => text,
            Err(e) => {
                warn!(
                    model = %self.backend.model(),
                    host = %self.backend.host(),
                    error = %e,
                    "Report generation failed"
                );
                return Err(e);
            }
        };

        debug!(elapsed_ms, "Report generated");
        Ok(GeneratedReport {
            text: text.trim().to_string(),
            provider: self.backend.provider().to_string(),
            model: self.backend.model().to_string(),
            elapsed_ms,
            generated_at: Utc::now(),
        })
    }
}

/// Message shown in place of the report when generation fails
pub fn fallback_message(error: &Error) -> String {
    format!("Failed to generate report: {}", error)
}

/// Format an amount with two decimals, sign before the symbol
pub fn format_amount(symbol: &str, value: f64) -> String {
    if value < 0.0 {
        format!("-{}{:.2}", symbol, value.abs())
    } else {
        format!("{}{:.2}", symbol, value)
    }
}

/// One line per category: spent, budget and how far over or under
pub fn format_category_lines(report: &VarianceReport, symbol: &str) -> String {
    report
        .details
        .iter()
        .map(|d| {
            format!(
                "- {}: Spent {}, Budget {} → {} by {}",
                d.category,
                format_amount(symbol, d.spent),
                format_amount(symbol, d.budget),
                d.status,
                format_amount(symbol, d.difference.abs())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
