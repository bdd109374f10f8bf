//! Spending pattern analysis
//!
//! Weekday bias, month-over-month trend, category concentration and
//! volatility of monthly totals, all computed over expenses only.

use std::fmt;

use serde::Serialize;

use super::aggregate::{expenses, mean, mean_by_weekday, monthly_totals, std_dev, sum_by_category};
use crate::display::report::{format_share, rule, scaled_bar};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Transaction};

/// Weekday labels, Monday first
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Lunedì",
    "Martedì",
    "Mercoledì",
    "Giovedì",
    "Venerdì",
    "Sabato",
    "Domenica",
];

/// Direction of the monthly trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

impl TrendDirection {
    /// Strictly positive change is increasing; zero counts as decreasing
    pub fn from_pct(pct: f64) -> Self {
        if pct > 0.0 {
            Self::Increasing
        } else {
            Self::Decreasing
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increasing => write!(f, "increasing"),
            Self::Decreasing => write!(f, "decreasing"),
        }
    }
}

/// Mean spend on one weekday
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdaySpend {
    pub weekday: u32,
    pub name: &'static str,
    pub mean: f64,
}

/// Behavioral summary of the expense history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternReport {
    /// All seven weekdays, Monday first; 0 where nothing was spent
    pub spend_by_weekday: Vec<WeekdaySpend>,
    pub costliest_weekday: &'static str,
    /// Mean month-over-month change in percent; absent with fewer than 2 months
    pub monthly_trend_pct: Option<f64>,
    pub trend_direction: Option<TrendDirection>,
    pub top_category: String,
    /// Share of total expense, in percent
    pub top_category_share: f64,
    pub average_monthly_spend: f64,
    /// Sample std-dev of monthly totals
    pub volatility: f64,
    pub months: usize,
}

/// Analyze spending patterns; `NoData` when there are no expenses
pub fn analyze_patterns(transactions: &[Transaction]) -> LedgerResult<PatternReport> {
    let spent: Vec<&Transaction> = expenses(transactions).collect();
    if spent.is_empty() {
        return Err(LedgerError::NoData);
    }

    let weekday_means = mean_by_weekday(spent.iter().copied());
    let spend_by_weekday: Vec<WeekdaySpend> = (0..7u32)
        .map(|weekday| WeekdaySpend {
            weekday,
            name: WEEKDAY_NAMES[weekday as usize],
            mean: weekday_means.get(&weekday).copied().unwrap_or(0.0),
        })
        .collect();

    // Stable argmax over the weekdays that have spending
    let mut costliest: Option<(u32, f64)> = None;
    for (weekday, value) in &weekday_means {
        if costliest.map_or(true, |(_, best)| *value > best) {
            costliest = Some((*weekday, *value));
        }
    }
    let costliest_weekday = WEEKDAY_NAMES[costliest.map_or(0, |(w, _)| w as usize)];

    let totals: Vec<f64> = monthly_totals(spent.iter().copied())
        .iter()
        .map(|m| m.total.to_major())
        .collect();

    let monthly_trend_pct = mean_pct_change(&totals);
    let trend_direction = monthly_trend_pct.map(TrendDirection::from_pct);

    let by_category = sum_by_category(spent.iter().copied());
    let grand_total: Money = by_category.values().sum();
    let mut top: Option<(&String, Money)> = None;
    for (category, amount) in &by_category {
        if top.map_or(true, |(_, best)| *amount > best) {
            top = Some((category, *amount));
        }
    }
    let (top_category, top_amount) = top
        .map(|(c, a)| (c.clone(), a))
        .unwrap_or_default();

    let top_category_share = if grand_total.is_positive() {
        top_amount.cents() as f64 / grand_total.cents() as f64 * 100.0
    } else {
        0.0
    };

    Ok(PatternReport {
        spend_by_weekday,
        costliest_weekday,
        monthly_trend_pct,
        trend_direction,
        top_category,
        top_category_share,
        average_monthly_spend: mean(&totals),
        volatility: std_dev(&totals),
        months: totals.len(),
    })
}

/// Mean of consecutive percentage changes; `None` with fewer than 2 values
fn mean_pct_change(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let changes: Vec<f64> = values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();

    Some(mean(&changes) * 100.0)
}

impl PatternReport {
    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Spending patterns\n");
        output.push_str(&"=".repeat(50));
        output.push('\n');

        output.push_str("Mean spend by weekday:\n");
        let max = self
            .spend_by_weekday
            .iter()
            .map(|w| w.mean)
            .fold(0.0, f64::max);
        for day in &self.spend_by_weekday {
            output.push_str(&format!(
                "  {:<10} {:>10.2}  {}\n",
                day.name,
                day.mean,
                scaled_bar(day.mean, max, 20)
            ));
        }
        output.push_str(&format!("Costliest day: {}\n", self.costliest_weekday));
        output.push_str(&rule(50));
        output.push('\n');

        match (self.monthly_trend_pct, self.trend_direction) {
            (Some(pct), Some(direction)) => {
                output.push_str(&format!("Monthly trend: {:+.1}% ({})\n", pct, direction));
            }
            _ => output.push_str("Monthly trend: not enough months\n"),
        }
        output.push_str(&format!(
            "Top category: {} ({} of spend)\n",
            self.top_category,
            format_share(self.top_category_share)
        ));
        output.push_str(&format!(
            "Average monthly spend: {:.2} over {} month(s)\n",
            self.average_monthly_spend, self.months
        ));
        output.push_str(&format!("Volatility (std-dev): {:.2}\n", self.volatility));

        output
    }
}
