//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::collections::HashMap;
use std::io::Write;

use clap::Parser;
use credai_core::test_utils::MockLlmServer;
use credai_core::{
    analyze, AIBackend, BackendKind, CategoryAmounts, FinancialInput, MockBackend,
    OpenAICompatibleBackend, PromptLibrary, ReportGenerator, ReportSettings, Settings,
};
use tempfile::NamedTempFile;

use crate::cli::{Cli, Commands, PromptsAction};
use crate::commands::{self, truncate};

const MOCK_CONFIG: &str = r#"
[ai]
backend = "mock"
model = "mock"

[report]
currency_symbol = "£"
"#;

fn amounts(pairs: &[(&str, f64)]) -> CategoryAmounts {
    pairs.iter().map(|&(k, v)| (k, v)).collect()
}

/// Rent over budget, food under
fn over_budget_input() -> FinancialInput {
    FinancialInput {
        income: 3000.0,
        expenses: amounts(&[("rent", 1000.0), ("food", 400.0)]),
        budget: amounts(&[("rent", 900.0), ("food", 500.0)]),
        name: Some("Alex".to_string()),
    }
}

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn mock_settings() -> Settings {
    Settings::parse(MOCK_CONFIG).unwrap()
}

const INPUT_JSON: &str = r#"{
    "income": 3000,
    "expenses": {"rent": 1000, "food": 400},
    "budget": {"rent": 900, "food": 500}
}"#;

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a very long category name", 10), "a very ...");
    assert_eq!(truncate("épicerie fine du marché", 8), "épice...");
}

#[test]
fn test_cli_parses_report_flags() {
    let cli = Cli::try_parse_from([
        "credai", "report", "--input", "month.json", "--name", "Sam", "--json",
    ])
    .unwrap();

    match cli.command {
        Commands::Report {
            input, name, json, model,
        } => {
            assert_eq!(input.unwrap().to_str(), Some("month.json"));
            assert_eq!(name.as_deref(), Some("Sam"));
            assert!(model.is_none());
            assert!(json);
        }
        _ => panic!("expected report command"),
    }
}

#[test]
fn test_cli_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["credai", "check", "--config", "c.toml", "-v"]).unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.config.unwrap().to_str(), Some("c.toml"));
    assert!(matches!(cli.command, Commands::Check));
}

#[test]
fn test_cli_prompts_show() {
    let cli = Cli::try_parse_from(["credai", "prompts", "show", "financial_report"]).unwrap();
    match cli.command {
        Commands::Prompts {
            action: Some(PromptsAction::Show { prompt_id }),
        } => assert_eq!(prompt_id, "financial_report"),
        _ => panic!("expected prompts show"),
    }
}

// ========== Settings Tests ==========

#[test]
fn test_load_settings_from_file() {
    let file = write_temp(MOCK_CONFIG);
    let mut settings = Settings::load(Some(file.path())).unwrap();
    settings.apply_env(|_| None).unwrap();

    assert_eq!(settings.ai.backend, BackendKind::Mock);
    assert_eq!(settings.ai.model, "mock");
    assert_eq!(settings.report.currency_symbol, "£");
}

#[test]
fn test_load_settings_env_overrides_file() {
    let file = write_temp(MOCK_CONFIG);
    let env: HashMap<&str, &str> = [
        ("CREDAI_BACKEND", "ollama"),
        ("CREDAI_MODEL", "llama3.2"),
    ]
    .into_iter()
    .collect();

    let mut settings = Settings::load(Some(file.path())).unwrap();
    settings
        .apply_env(|name| env.get(name).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(settings.ai.backend, BackendKind::Ollama);
    assert_eq!(settings.ai.model, "llama3.2");
    assert_eq!(settings.report.currency_symbol, "£");
}

#[test]
fn test_load_settings_missing_file() {
    let result = commands::load_settings(Some(std::path::Path::new("/nonexistent/credai.toml")));
    assert!(result.is_err());
}

// ========== Analyze Command Tests ==========

#[test]
fn test_render_analysis_table() {
    let report = analyze(&over_budget_input());
    let table = commands::render_analysis(&report, "£");

    assert!(table.contains("Income:        £3000.00"));
    assert!(table.contains("Total budget:  £1400.00"));
    assert!(table.contains("Total spent:   £1400.00"));
    assert!(table.contains("Status:        UNDER"));
    assert!(table.contains("rent"));
    assert!(table.contains("£100.00"));
    assert!(table.contains("-£100.00"));
    assert!(table.contains("Over budget: rent"));

    // Rows follow expense order
    let rent = table.find("rent ").unwrap();
    let food = table.find("food ").unwrap();
    assert!(rent < food);
}

#[test]
fn test_render_analysis_utilization_columns() {
    let input = FinancialInput {
        income: 3000.0,
        expenses: amounts(&[("rent", 1000.0), ("food", 400.0), ("gifts", 30.0)]),
        budget: amounts(&[("rent", 900.0), ("food", 500.0), ("gym", 40.0)]),
        name: None,
    };
    let table = commands::render_analysis(&analyze(&input), "£");

    assert!(table.contains("Budget left:   £10.00"));
    let row = |name: &str| {
        table
            .lines()
            .find(|l| l.starts_with(name))
            .unwrap()
            .to_string()
    };
    assert!(row("rent").contains("111%  exceeded"));
    assert!(row("food").contains("80%  warning"));
    assert!(row("gifts").contains("0%  good"));
}

#[test]
fn test_analyze_json_includes_utilization() {
    let report = analyze(&over_budget_input());
    let value = serde_json::to_value(commands::AnalyzeOutput::new(&report)).unwrap();

    // Analysis fields stay at the top level
    assert_eq!(value["total_spent"], 1400.0);
    assert_eq!(value["details"][0]["status"], "over");
    assert_eq!(value["utilization"]["remaining"], 0.0);
    assert_eq!(value["utilization"]["categories"][0]["band"], "exceeded");
    assert_eq!(value["utilization"]["categories"][1]["band"], "warning");
    assert_eq!(value["utilization"]["categories"][1]["remaining"], 100.0);
}

#[test]
fn test_render_analysis_no_categories() {
    let report = analyze(&FinancialInput {
        income: 1200.0,
        expenses: CategoryAmounts::new(),
        budget: CategoryAmounts::new(),
        name: None,
    });
    let table = commands::render_analysis(&report, "$");

    assert!(table.contains("Income:        $1200.00"));
    assert!(table.contains("No expense categories entered."));
    assert!(!table.contains("CATEGORY"));
}

#[test]
fn test_cmd_analyze_from_file() {
    let file = write_temp(INPUT_JSON);
    let settings = mock_settings();
    assert!(commands::cmd_analyze(&settings, Some(file.path()), false).is_ok());
    assert!(commands::cmd_analyze(&settings, Some(file.path()), true).is_ok());
}

#[test]
fn test_cmd_analyze_invalid_file() {
    let file = write_temp("{ not json");
    let settings = mock_settings();
    assert!(commands::cmd_analyze(&settings, Some(file.path()), false).is_err());
}

// ========== Report Command Tests ==========

#[tokio::test]
async fn test_run_report_text_output() {
    let backend = MockBackend::with_response("  Summary: Rent ran over.\nAdvice: Trim rent.  ");
    let generator = ReportGenerator::new(backend.clone(), ReportSettings::default());

    let output = commands::run_report(&generator, &over_budget_input(), false)
        .await
        .unwrap();

    assert!(output.contains("🧾 AI-Powered Financial Report:"));
    assert!(output.ends_with("Summary: Rent ran over.\nAdvice: Trim rent."));

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].user.contains("Alex"));
}

#[tokio::test]
async fn test_run_report_json_output() {
    let generator = ReportGenerator::new(MockBackend::new(), ReportSettings::default());

    let output = commands::run_report(&generator, &over_budget_input(), true)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["success"], true);
    assert_eq!(value["analysis"]["income"], 3000.0);
    assert_eq!(value["analysis"]["details"][0]["category"], "rent");
    assert_eq!(value["analysis"]["details"][0]["status"], "over");
    assert_eq!(value["meta"]["provider"], "mock");
    assert_eq!(value["meta"]["model"], "mock");
    assert!(value["meta"]["response_time_ms"].is_u64());
    let generated_at = value["meta"]["generated_at"].as_str().unwrap();
    let generated_at = chrono::DateTime::parse_from_rfc3339(generated_at).unwrap();
    let age = chrono::Utc::now().signed_duration_since(generated_at);
    assert!(age >= chrono::Duration::zero() && age < chrono::Duration::minutes(1));
    assert!(value["report"].as_str().unwrap().contains("Summary:"));
}

#[tokio::test]
async fn test_run_report_failure_is_reported_not_returned() {
    let generator =
        ReportGenerator::new(MockBackend::failing("quota exceeded"), ReportSettings::default());

    let text = commands::run_report(&generator, &over_budget_input(), false)
        .await
        .unwrap();
    assert!(text.contains("Failed to generate report:"));
    assert!(text.contains("quota exceeded"));

    let json = commands::run_report(&generator, &over_budget_input(), true)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["success"], false);
    assert!(value["report"]
        .as_str()
        .unwrap()
        .starts_with("Failed to generate report:"));
    assert!(value["meta"].get("response_time_ms").is_none());
    assert!(value["meta"].get("generated_at").is_none());
    // The analysis is still included
    assert_eq!(value["analysis"]["total_spent"], 1400.0);
}

#[tokio::test]
async fn test_run_report_model_override_in_meta() {
    let backend = MockBackend::new().with_model("llama3-8b-8192");
    let generator = ReportGenerator::new(backend, ReportSettings::default());

    let output = commands::run_report(&generator, &over_budget_input(), true)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["meta"]["provider"], "mock");
    assert_eq!(value["meta"]["model"], "llama3-8b-8192");
}

#[tokio::test]
async fn test_run_report_against_mock_server() {
    let server = MockLlmServer::start().await;
    let backend = OpenAICompatibleBackend::with_api_key(&server.url(), "llama3-70b-8192", "key");
    let generator = ReportGenerator::with_prompts(
        backend,
        ReportSettings::default(),
        PromptLibrary::embedded_only(),
    );

    let mut input = over_budget_input();
    input.expenses.insert("rent", 2500.0);
    let output = commands::run_report(&generator, &input, true).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["success"], true);
    assert_eq!(value["analysis"]["status"], "over");
    assert_eq!(value["meta"]["provider"], "openai_compatible");
    assert_eq!(value["meta"]["model"], "llama3-70b-8192");
    assert_eq!(
        value["report"],
        "Mock report from llama3-70b-8192: you are over budget."
    );
}

#[tokio::test]
async fn test_run_report_server_error() {
    let server = MockLlmServer::start().await;
    let backend = OpenAICompatibleBackend::with_api_key(&server.url(), "llama3-70b-8192", "key");
    let generator = ReportGenerator::with_prompts(
        backend,
        ReportSettings::default(),
        PromptLibrary::embedded_only(),
    );

    let input = FinancialInput {
        income: 100.0,
        expenses: amounts(&[("trigger error", 10.0)]),
        budget: amounts(&[("trigger error", 20.0)]),
        name: None,
    };
    let output = commands::run_report(&generator, &input, false).await.unwrap();

    assert!(output.contains("Failed to generate report:"));
    assert!(output.contains("500"));
}

#[tokio::test]
async fn test_cmd_report_with_mock_backend() {
    let file = write_temp(INPUT_JSON);
    let settings = mock_settings();

    let result =
        commands::cmd_report(&settings, Some(file.path()), Some("Sam"), None, false).await;
    assert!(result.is_ok());

    let result =
        commands::cmd_report(&settings, Some(file.path()), None, Some("other"), true).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_report_missing_input() {
    let settings = mock_settings();
    let result = commands::cmd_report(
        &settings,
        Some(std::path::Path::new("/nonexistent/month.json")),
        None,
        None,
        false,
    )
    .await;
    assert!(result.is_err());
}

// ========== Check Command Tests ==========

#[tokio::test]
async fn test_send_test_prompt_trims_reply() {
    let backend = MockBackend::with_response(" OK \n");
    let reply = commands::send_test_prompt(&backend).await.unwrap();
    assert_eq!(reply, "OK");

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].max_tokens, 20);
}

#[tokio::test]
async fn test_send_test_prompt_error() {
    let err = commands::send_test_prompt(&MockBackend::failing("model not found"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("model not found"));
}

#[tokio::test]
async fn test_send_test_prompt_against_mock_server() {
    let server = MockLlmServer::start().await;
    let backend = OpenAICompatibleBackend::new(&server.url(), "test-model");
    assert!(backend.health_check().await);

    let reply = commands::send_test_prompt(&backend).await.unwrap();
    assert!(reply.starts_with("Mock report from test-model"));
}

#[tokio::test]
async fn test_cmd_check_with_mock_settings() {
    assert!(commands::cmd_check(&mock_settings()).await.is_ok());
}

#[tokio::test]
async fn test_cmd_check_unreachable_backend_is_reported() {
    let settings = Settings::parse(
        r#"
[ai]
backend = "ollama"
host = "http://127.0.0.1:1"
model = "llama3.2"
timeout_secs = 2
"#,
    )
    .unwrap();
    assert!(commands::cmd_check(&settings).await.is_ok());
}

// ========== Prompts Command Tests ==========

#[test]
fn test_render_prompt_list() {
    let mut library = PromptLibrary::embedded_only();
    let listing = commands::render_prompt_list(&mut library);
    assert!(listing.contains("financial_report"));
    assert!(listing.contains("narrative"));
    assert!(listing.contains("Default"));
}

#[test]
fn test_cmd_prompts_show_unknown_id() {
    // Unknown IDs print the available list and succeed
    assert!(commands::cmd_prompts_show("no_such_prompt").is_ok());
}
