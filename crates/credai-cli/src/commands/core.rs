//! Shared command utilities
//!
//! This module contains:
//! - `load_settings` - Resolve settings and apply environment overrides once
//! - `read_input` - Load financial data from a file or prompt for it

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use credai_core::{collect_interactive, load_input_file, FinancialInput, Settings};

/// Load settings from `path` (or the default locations) and apply environment overrides
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::load(path).context("Failed to load settings")?;
    settings
        .apply_process_env()
        .context("Invalid environment override")?;
    Ok(settings)
}

/// Read input from a JSON file, or interactively from the terminal
pub fn read_input(path: Option<&Path>) -> Result<FinancialInput> {
    match path {
        Some(path) => load_input_file(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let stdin = io::stdin();
            collect_interactive(stdin.lock(), io::stdout())
                .context("Failed to collect financial data")
        }
    }
}
