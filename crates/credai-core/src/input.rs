//! Input collection
//!
//! Builds a [`FinancialInput`] either from an interactive console session or
//! from a JSON file. The interactive flow asks for income, then the spending
//! per category, then a budget for each category entered.

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CategoryAmounts, FinancialInput};

/// Collect income, expenses and budgets by prompting on `writer` and reading
/// answers line by line from `reader`
pub fn collect_interactive<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
) -> Result<FinancialInput> {
    let income = ask_amount(
        &mut reader,
        &mut writer,
        "Enter your monthly income: ",
        "income",
    )?;

    let answer = ask(
        &mut reader,
        &mut writer,
        "How many expense categories do you want to enter? ",
    )?;
    let count: usize = answer.parse().map_err(|_| {
        Error::InvalidInput(format!(
            "category count must be a non-negative whole number, got '{}'",
            answer
        ))
    })?;

    let mut expenses = CategoryAmounts::new();
    writeln!(writer, "\n--- Enter Actual Spendings ---")?;
    for _ in 0..count {
        let category = ask(&mut reader, &mut writer, "Category name: ")?;
        if category.is_empty() {
            return Err(Error::InvalidInput("category name cannot be empty".into()));
        }
        let spent = ask_amount(
            &mut reader,
            &mut writer,
            &format!("Amount spent in {}: ", category),
            &category,
        )?;
        expenses.insert(category, spent);
    }

    let mut budget = CategoryAmounts::new();
    writeln!(writer, "\n--- Enter Budgeted Amounts ---")?;
    for category in expenses.categories() {
        let amount = ask_amount(
            &mut reader,
            &mut writer,
            &format!("Budget for {}: ", category),
            category,
        )?;
        budget.insert(category, amount);
    }

    debug!(
        categories = expenses.len(),
        "Collected financial input interactively"
    );

    Ok(FinancialInput {
        income,
        expenses,
        budget,
        name: None,
    })
}

/// Load input from a JSON file
pub fn load_input_file(path: &Path) -> Result<FinancialInput> {
    let content = fs::read_to_string(path)?;
    let input = parse_input_json(&content)?;
    debug!(
        path = %path.display(),
        categories = input.expenses.len(),
        "Loaded financial input"
    );
    Ok(input)
}

/// Parse input from JSON text
///
/// ```json
/// {"income": 3000, "expenses": {"rent": 1000}, "budget": {"rent": 900}}
/// ```
pub fn parse_input_json(content: &str) -> Result<FinancialInput> {
    let input: FinancialInput = serde_json::from_str(content)?;
    if let Some(empty) = input.expenses.categories().find(|c| c.trim().is_empty()) {
        return Err(Error::InvalidInput(format!(
            "category name cannot be empty ('{}')",
            empty
        )));
    }
    Ok(input)
}

/// Write a prompt and read one trimmed line
fn ask<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, prompt: &str) -> Result<String> {
    write!(writer, "{}", prompt)?;
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(Error::InvalidInput(format!(
            "unexpected end of input at '{}'",
            prompt.trim()
        )));
    }
    Ok(line.trim().to_string())
}

fn ask_amount<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    prompt: &str,
    field: &str,
) -> Result<f64> {
    let answer = ask(reader, writer, prompt)?;
    answer.parse::<f64>().map_err(|_| {
        Error::InvalidInput(format!("{}: '{}' is not a valid amount", field, answer))
    })
}
