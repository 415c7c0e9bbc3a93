//! Analysis and AI report command implementations

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use credai_core::report::format_amount;
use credai_core::{
    analyze, fallback_message, AIBackend, AIClient, BackendKind, BudgetUtilization,
    FinancialInput, GeneratedReport, ReportGenerator, Settings, VarianceReport,
};
use serde::Serialize;
use tracing::warn;

use super::core::read_input;

/// JSON output of `credai report --json`
#[derive(Debug, Serialize)]
pub struct ReportOutput<'a> {
    pub analysis: &'a VarianceReport,
    /// Report text, or the failure message if generation failed
    pub report: String,
    pub success: bool,
    pub meta: ReportMeta,
}

/// JSON output of `credai analyze --json`: the analysis plus budget usage
#[derive(Debug, Serialize)]
pub struct AnalyzeOutput<'a> {
    #[serde(flatten)]
    pub analysis: &'a VarianceReport,
    pub utilization: BudgetUtilization,
}

impl<'a> AnalyzeOutput<'a> {
    pub fn new(analysis: &'a VarianceReport) -> Self {
        Self {
            analysis,
            utilization: analysis.utilization(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportMeta {
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

/// Print the variance analysis without calling the AI backend
pub fn cmd_analyze(settings: &Settings, input: Option<&Path>, json: bool) -> Result<()> {
    let data = read_input(input)?;
    let analysis = analyze(&data);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&AnalyzeOutput::new(&analysis))?
        );
    } else {
        print!(
            "{}",
            render_analysis(&analysis, &settings.report.currency_symbol)
        );
    }

    Ok(())
}

/// Collect data, analyze it and print an AI-generated report
///
/// A failed LLM call never fails the command: the failure message is printed
/// in place of the report.
pub async fn cmd_report(
    settings: &Settings,
    input: Option<&Path>,
    name: Option<&str>,
    model: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut data = read_input(input)?;
    if let Some(name) = name {
        data.name = Some(name.to_string());
    }

    let mut client =
        AIClient::from_settings(&settings.ai).context("Failed to configure AI backend")?;
    if let Some(model) = model {
        client = client.with_model(model);
    }

    if settings.ai.backend == BackendKind::OpenaiCompatible && settings.ai.api_key.is_none() {
        warn!(
            variable = %settings.ai.api_key_env,
            "No API key set; the request will likely be rejected"
        );
    }

    let generator = ReportGenerator::new(client, settings.report.clone());
    if !json {
        println!("\nGenerating report with {}...", generator.backend().model());
    }

    let output = run_report(&generator, &data, json).await?;
    println!("{}", output);

    Ok(())
}

/// Analyze `data`, generate the report and render command output
pub async fn run_report<B: AIBackend>(
    generator: &ReportGenerator<B>,
    data: &FinancialInput,
    json: bool,
) -> Result<String> {
    let analysis = analyze(data);
    let outcome = generator.generate(&analysis, data.name.as_deref()).await;

    let (text, success) = match &outcome {
        Ok(generated) => (generated.text.clone(), true),
        Err(e) => (fallback_message(e), false),
    };

    if json {
        let output = ReportOutput {
            analysis: &analysis,
            report: text,
            success,
            meta: report_meta(generator.backend(), outcome.as_ref().ok()),
        };
        Ok(serde_json::to_string_pretty(&output)?)
    } else {
        Ok(format!("\n🧾 AI-Powered Financial Report:\n\n{}", text))
    }
}

fn report_meta<B: AIBackend>(backend: &B, generated: Option<&GeneratedReport>) -> ReportMeta {
    match generated {
        Some(g) => ReportMeta {
            provider: g.provider.clone(),
            model: g.model.clone(),
            response_time_ms: Some(g.elapsed_ms),
            generated_at: Some(g.generated_at),
        },
        None => ReportMeta {
            provider: backend.provider().to_string(),
            model: backend.model().to_string(),
            response_time_ms: None,
            generated_at: None,
        },
    }
}

/// Render the analysis as a summary block and category table
pub fn render_analysis(analysis: &VarianceReport, symbol: &str) -> String {
    let mut out = String::new();

    out.push_str("Budget Analysis\n\n");
    out.push_str(&format!(
        "  Income:        {}\n",
        format_amount(symbol, analysis.income)
    ));
    out.push_str(&format!(
        "  Total budget:  {}\n",
        format_amount(symbol, analysis.total_budget)
    ));
    out.push_str(&format!(
        "  Total spent:   {}\n",
        format_amount(symbol, analysis.total_spent)
    ));
    out.push_str(&format!(
        "  Remaining:     {}\n",
        format_amount(symbol, analysis.remaining_income())
    ));
    out.push_str(&format!(
        "  Status:        {} ({})\n",
        analysis.status.as_str().to_uppercase(),
        format_amount(symbol, analysis.net_variance())
    ));

    let utilization = analysis.utilization();
    out.push_str(&format!(
        "  Budget left:   {}\n",
        format_amount(symbol, utilization.remaining)
    ));

    if analysis.details.is_empty() {
        out.push_str("\nNo expense categories entered.\n");
        return out;
    }

    out.push('\n');
    out.push_str(&format!(
        "{:<20} {:>12} {:>12} {:>12}  {:<6} {:>6}  {}\n",
        "CATEGORY", "SPENT", "BUDGET", "DIFFERENCE", "STATUS", "USED", "BAND"
    ));
    out.push_str(&format!("{}\n", "-".repeat(86)));

    for (detail, usage) in analysis.details.iter().zip(&utilization.categories) {
        out.push_str(&format!(
            "{:<20} {:>12} {:>12} {:>12}  {:<6} {:>5.0}%  {}\n",
            super::truncate(&detail.category, 20),
            format_amount(symbol, detail.spent),
            format_amount(symbol, detail.budget),
            format_amount(symbol, detail.difference),
            detail.status.as_str(),
            usage.percentage_used,
            usage.band
        ));
    }

    let over: Vec<&str> = analysis
        .over_budget_categories()
        .map(|d| d.category.as_str())
        .collect();
    if !over.is_empty() {
        out.push_str(&format!("\nOver budget: {}\n", over.join(", ")));
    }

    out
}
