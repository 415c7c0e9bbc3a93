//! credai CLI - AI-powered budget reports
//!
//! Usage:
//!   credai report                     Enter income, spending and budgets, get an AI report
//!   credai report --input month.json  Same, reading data from a JSON file
//!   credai analyze --input month.json Variance analysis only
//!   credai check                      Test the AI backend connection

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so report output on stdout stays clean
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    match cli.command {
        Commands::Report {
            input,
            name,
            model,
            json,
        } => {
            let settings = commands::load_settings(cli.config.as_deref())?;
            commands::cmd_report(
                &settings,
                input.as_deref(),
                name.as_deref(),
                model.as_deref(),
                json,
            )
            .await
        }
        Commands::Analyze { input, json } => {
            let settings = commands::load_settings(cli.config.as_deref())?;
            commands::cmd_analyze(&settings, input.as_deref(), json)
        }
        Commands::Check => {
            let settings = commands::load_settings(cli.config.as_deref())?;
            commands::cmd_check(&settings).await
        }
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
    }
}
