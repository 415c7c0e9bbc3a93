//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// credai - AI-powered budget vs. spending reports
#[derive(Parser)]
#[command(name = "credai")]
#[command(about = "Compare monthly spending to budget and get AI financial advice", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (defaults to ~/.local/share/credai/config.toml, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze spending and generate an AI financial report
    Report {
        /// JSON input file (prompts interactively if not given)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Name to address the report to (overrides the input file)
        #[arg(short, long)]
        name: Option<String>,

        /// Model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,

        /// Print analysis, report and metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show budget variance analysis without calling the AI backend
    Analyze {
        /// JSON input file (prompts interactively if not given)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show AI settings and test the backend connection
    Check,

    /// Manage report prompts (list, show, path)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all prompts and their override status
    List,

    /// Show the content of a prompt
    Show {
        /// Prompt ID (e.g., financial_report)
        prompt_id: String,
    },

    /// Show the override directory path
    Path,
}
