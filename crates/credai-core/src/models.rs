//! Domain models for credai

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered mapping from category name to amount
///
/// Keeps categories in the order they were first entered. Inserting an
/// existing category replaces its amount without moving it. Serializes as a
/// JSON object in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryAmounts {
    entries: Vec<(String, f64)>,
}

impl CategoryAmounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the amount for a category, returning the previous amount
    pub fn insert(&mut self, category: impl Into<String>, amount: f64) -> Option<f64> {
        let category = category.into();
        match self.entries.iter_mut().find(|(name, _)| *name == category) {
            Some((_, existing)) => Some(std::mem::replace(existing, amount)),
            None => {
                self.entries.push((category, amount));
                None
            }
        }
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, amount)| *amount)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.get(category).is_some()
    }

    /// Iterate over (category, amount) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|(name, amount)| (name.as_str(), *amount))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, amount)| *amount)
    }

    /// Sum of all amounts
    pub fn total(&self) -> f64 {
        self.values().sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for CategoryAmounts {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut amounts = Self::new();
        for (category, amount) in iter {
            amounts.insert(category, amount);
        }
        amounts
    }
}

impl Serialize for CategoryAmounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, amount) in &self.entries {
            map.serialize_entry(category, amount)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryAmounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct AmountsVisitor;

        impl<'de> Visitor<'de> for AmountsVisitor {
            type Value = CategoryAmounts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category names to amounts")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut amounts = CategoryAmounts::new();
                while let Some((category, amount)) = access.next_entry::<String, f64>()? {
                    amounts.insert(category, amount);
                }
                Ok(amounts)
            }
        }

        deserializer.deserialize_map(AmountsVisitor)
    }
}

/// Monthly financial data for one analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialInput {
    /// Monthly income
    pub income: f64,
    /// Amount spent per category; these categories drive the report
    pub expenses: CategoryAmounts,
    /// Amount budgeted per category
    #[serde(default)]
    pub budget: CategoryAmounts,
    /// Display name used to personalise the generated report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Whether spending went over or stayed under budget
///
/// Classification is by strict inequality, so a tie is `Under`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceStatus {
    Over,
    Under,
}

impl VarianceStatus {
    /// Classify `spent` against `budget`
    pub fn classify(spent: f64, budget: f64) -> Self {
        if spent > budget {
            Self::Over
        } else {
            Self::Under
        }
    }

    /// Classify a signed difference (spent - budget)
    pub fn from_difference(difference: f64) -> Self {
        Self::classify(difference, 0.0)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Over => "over",
            Self::Under => "under",
        }
    }
}

impl std::fmt::Display for VarianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spent vs budgeted for a single category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVariance {
    pub category: String,
    pub spent: f64,
    /// Budgeted amount (0 when the category had no budget entry)
    pub budget: f64,
    /// spent - budget
    pub difference: f64,
    pub status: VarianceStatus,
}

/// Result of budget variance analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceReport {
    pub income: f64,
    pub total_spent: f64,
    /// Sum over every budget entry, including categories with no spending
    pub total_budget: f64,
    pub status: VarianceStatus,
    /// One entry per expense category, in input order
    pub details: Vec<CategoryVariance>,
}

impl VarianceReport {
    pub fn is_over(&self) -> bool {
        self.status == VarianceStatus::Over
    }

    /// total_spent - total_budget
    pub fn net_variance(&self) -> f64 {
        self.total_spent - self.total_budget
    }

    /// Income left after spending
    pub fn remaining_income(&self) -> f64 {
        self.income - self.total_spent
    }

    /// Categories where spending exceeded budget
    pub fn over_budget_categories(&self) -> impl Iterator<Item = &CategoryVariance> {
        self.details
            .iter()
            .filter(|d| d.status == VarianceStatus::Over)
    }
}

/// How much of a category budget has been used
///
/// Banded on percentage used: `Exceeded` from 100%, `Warning` from 80%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationBand {
    Good,
    Warning,
    Exceeded,
}

impl UtilizationBand {
    /// Percentage used at which a category moves to `Warning`
    pub const WARNING_PERCENT: f64 = 80.0;
    /// Percentage used at which a category moves to `Exceeded`
    pub const EXCEEDED_PERCENT: f64 = 100.0;

    pub fn from_percentage(percentage_used: f64) -> Self {
        if percentage_used >= Self::EXCEEDED_PERCENT {
            Self::Exceeded
        } else if percentage_used >= Self::WARNING_PERCENT {
            Self::Warning
        } else {
            Self::Good
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Exceeded => "exceeded",
        }
    }
}

impl std::fmt::Display for UtilizationBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Budget usage for one expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryUtilization {
    pub category: String,
    pub spent: f64,
    pub budget: f64,
    /// Budget left, never below 0
    pub remaining: f64,
    /// spent * 100 / budget, or 0 when there is no positive budget
    pub percentage_used: f64,
    pub band: UtilizationBand,
}

impl CategoryUtilization {
    fn from_variance(detail: &CategoryVariance) -> Self {
        let percentage_used = if detail.budget > 0.0 {
            detail.spent * 100.0 / detail.budget
        } else {
            0.0
        };
        Self {
            category: detail.category.clone(),
            spent: detail.spent,
            budget: detail.budget,
            remaining: (detail.budget - detail.spent).max(0.0),
            percentage_used,
            band: UtilizationBand::from_percentage(percentage_used),
        }
    }
}

/// Budget usage per category plus what is left overall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetUtilization {
    /// total_budget - total_spent (negative when overspent)
    pub remaining: f64,
    /// One entry per expense category, in input order
    pub categories: Vec<CategoryUtilization>,
}

impl VarianceReport {
    /// Budget usage derived from this analysis
    pub fn utilization(&self) -> BudgetUtilization {
        BudgetUtilization {
            remaining: self.total_budget - self.total_spent,
            categories: self
                .details
                .iter()
                .map(CategoryUtilization::from_variance)
                .collect(),
        }
    }
}
