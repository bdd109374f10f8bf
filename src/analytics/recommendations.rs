//! Budget advice
//!
//! Turns the current month's budget report and the long-run spending
//! patterns into a short list of human-readable recommendations.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::budget::evaluate;
use super::patterns::{analyze_patterns, TrendDirection};
use crate::config::settings::BudgetConfig;
use crate::error::LedgerResult;
use crate::models::{MonthPeriod, Transaction};

/// At most this many recommendations are returned
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Monthly std-dev (major units) above which spending counts as volatile
pub const VOLATILITY_LIMIT: f64 = 100.0;

const NEARLY_EXHAUSTED_PCT: f64 = 90.0;
const WARNING_PCT: f64 = 75.0;
const UNDER_CONTROL_PCT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    NoData,
    BudgetNearlyExhausted,
    BudgetWarning,
    BudgetUnderControl,
    CostliestWeekday,
    SpendingIncreasing,
    SpendingDecreasing,
    HighVolatility,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    pub message: String,
}

impl Recommendation {
    fn general(kind: RecommendationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            category: None,
            percentage: None,
            message: message.into(),
        }
    }

    fn for_budget(kind: RecommendationKind, category: &str, percentage: f64) -> Self {
        let message = match kind {
            RecommendationKind::BudgetNearlyExhausted => {
                format!("{}: budget nearly exhausted ({:.0}%)", category, percentage)
            }
            RecommendationKind::BudgetWarning => {
                format!("{}: keep an eye on the budget ({:.0}%)", category, percentage)
            }
            _ => format!("{}: budget under control ({:.0}%)", category, percentage),
        };

        Self {
            kind,
            category: Some(category.to_string()),
            percentage: Some(percentage),
            message,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Build recommendations for the month containing `today`
pub fn generate(
    today: NaiveDate,
    transactions: &[Transaction],
    config: &BudgetConfig,
) -> LedgerResult<Vec<Recommendation>> {
    if transactions.is_empty() {
        return Ok(vec![Recommendation::general(
            RecommendationKind::NoData,
            "No data available for recommendations yet",
        )]);
    }

    let mut recommendations = Vec::new();

    let budget = evaluate(MonthPeriod::from_date(today), transactions, config)?;
    for row in &budget.categories {
        let kind = if row.percentage > NEARLY_EXHAUSTED_PCT {
            RecommendationKind::BudgetNearlyExhausted
        } else if row.percentage > WARNING_PCT {
            RecommendationKind::BudgetWarning
        } else if row.percentage < UNDER_CONTROL_PCT {
            RecommendationKind::BudgetUnderControl
        } else {
            continue;
        };
        recommendations.push(Recommendation::for_budget(kind, &row.category, row.percentage));
    }

    // Income-only ledgers have no spending patterns to comment on
    if let Ok(patterns) = analyze_patterns(transactions) {
        recommendations.push(Recommendation::general(
            RecommendationKind::CostliestWeekday,
            format!("You tend to spend the most on {}", patterns.costliest_weekday),
        ));

        match patterns.trend_direction {
            Some(TrendDirection::Increasing) => recommendations.push(Recommendation::general(
                RecommendationKind::SpendingIncreasing,
                "Your spending is rising; consider revising the budget",
            )),
            Some(TrendDirection::Decreasing) => recommendations.push(Recommendation::general(
                RecommendationKind::SpendingDecreasing,
                "Good job, your spending is going down",
            )),
            None => {}
        }

        if patterns.volatility > VOLATILITY_LIMIT {
            recommendations.push(Recommendation::general(
                RecommendationKind::HighVolatility,
                "Your spending varies a lot; a more flexible budget may fit better",
            ));
        }
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    Ok(recommendations)
}

/// Format recommendations as a numbered list
pub fn format_recommendations(recommendations: &[Recommendation]) -> String {
    let mut output = String::from("Recommendations\n");
    output.push_str(&"=".repeat(40));
    output.push('\n');
    for (i, rec) in recommendations.iter().enumerate() {
        output.push_str(&format!("{:>2}. {}\n", i + 1, rec));
    }
    output
}
