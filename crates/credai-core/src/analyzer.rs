//! Budget variance analysis
//!
//! Pure transformation from [`FinancialInput`] to [`VarianceReport`]. No input
//! validation is performed: negative amounts, zero income and empty expense
//! sets all pass through unchanged.

use crate::models::{CategoryVariance, FinancialInput, VarianceReport, VarianceStatus};

/// Compare spending against budget, overall and per expense category
///
/// `total_budget` sums every budget entry, including categories that have no
/// spending, while `details` covers only the expense categories.
pub fn analyze(input: &FinancialInput) -> VarianceReport {
    let total_spent = input.expenses.total();
    let total_budget = input.budget.total();

    let details = input
        .expenses
        .iter()
        .map(|(category, spent)| {
            let budget = input.budget.get(category).unwrap_or(0.0);
            let difference = spent - budget;
            CategoryVariance {
                category: category.to_string(),
                spent,
                budget,
                difference,
                status: VarianceStatus::from_difference(difference),
            }
        })
        .collect();

    VarianceReport {
        income: input.income,
        total_spent,
        total_budget,
        status: VarianceStatus::classify(total_spent, total_budget),
        details,
    }
}
