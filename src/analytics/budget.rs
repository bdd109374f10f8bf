//! Budget evaluation
//!
//! Compares a month's expenses with the configured category limits and
//! summarizes the month's income against its expenses.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::aggregate::{expenses, incomes, sum_by_category, total};
use crate::config::settings::BudgetConfig;
use crate::display::report::{rule, usage_bar};
use crate::error::LedgerResult;
use crate::models::{Money, MonthPeriod, Transaction};

/// Percentage at which a category turns to Warning
pub const WARNING_PCT: f64 = 75.0;

/// Percentage at which a category turns to Critical
pub const CRITICAL_PCT: f64 = 90.0;

/// Traffic-light status of a category budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    Critical,
}

impl BudgetStatus {
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= CRITICAL_PCT {
            Self::Critical
        } else if pct >= WARNING_PCT {
            Self::Warning
        } else {
            Self::OnTrack
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnTrack => write!(f, "OK"),
            Self::Warning => write!(f, "WARN"),
            Self::Critical => write!(f, "CRIT"),
        }
    }
}

/// Budget vs actual for a single category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBudget {
    pub category: String,
    pub limit: Money,
    pub spent: Money,
    /// Negative when overspent
    pub remaining: Money,
    pub percentage: f64,
    pub status: BudgetStatus,
}

impl CategoryBudget {
    pub fn is_overspent(&self) -> bool {
        self.remaining.is_negative()
    }
}

/// A category that crossed the alert threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAlert {
    pub category: String,
    pub percentage: f64,
}

impl fmt::Display for BudgetAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.1}% of budget", self.category, self.percentage)
    }
}

/// Budget vs actual for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetReport {
    pub period: MonthPeriod,
    /// Configured categories, in alphabetical order
    pub categories: Vec<CategoryBudget>,
    /// Spending in categories that have no configured limit
    pub unbudgeted: BTreeMap<String, Money>,
    pub alerts: Vec<BudgetAlert>,
    pub alert_threshold: f64,
    pub total_budget: Money,
    pub total_spent: Money,
    pub net_savings: Money,
    pub savings_target: Money,
}

/// Evaluate a month's expenses against the configured limits
///
/// `transactions` may span any range; only expenses dated in `period` are
/// counted. Fails only when the configuration is malformed.
pub fn evaluate(
    period: MonthPeriod,
    transactions: &[Transaction],
    config: &BudgetConfig,
) -> LedgerResult<BudgetReport> {
    config.validate()?;

    let in_month = transactions.iter().filter(|t| period.contains(t.date));
    let spent_by_category = sum_by_category(expenses(in_month));
    let threshold = config.alert_threshold();

    let mut categories = Vec::with_capacity(config.monthly_budgets.len());
    let mut alerts = Vec::new();

    for (category, limit) in &config.monthly_budgets {
        let spent = spent_by_category.get(category).copied().unwrap_or_default();
        let percentage = percentage_of(spent, *limit);

        if percentage >= threshold {
            alerts.push(BudgetAlert {
                category: category.clone(),
                percentage,
            });
        }

        categories.push(CategoryBudget {
            category: category.clone(),
            limit: *limit,
            spent,
            remaining: *limit - spent,
            percentage,
            status: BudgetStatus::from_percentage(percentage),
        });
    }

    let unbudgeted: BTreeMap<String, Money> = spent_by_category
        .iter()
        .filter(|(category, _)| !config.monthly_budgets.contains_key(*category))
        .map(|(category, spent)| (category.clone(), *spent))
        .collect();

    let total_budget = config.total_budget();
    let total_spent: Money = spent_by_category.values().sum();

    Ok(BudgetReport {
        period,
        categories,
        unbudgeted,
        alerts,
        alert_threshold: threshold,
        total_budget,
        total_spent,
        net_savings: total_budget - total_spent,
        savings_target: config.savings_target(),
    })
}

/// `spent` as a percentage of `limit`; 0 for a zero limit
pub fn percentage_of(spent: Money, limit: Money) -> f64 {
    if limit.is_positive() {
        spent.cents() as f64 / limit.cents() as f64 * 100.0
    } else {
        0.0
    }
}

impl BudgetReport {
    /// Overall share of the total budget already spent
    pub fn overall_percentage(&self) -> f64 {
        percentage_of(self.total_spent, self.total_budget)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Budget - {}\n", self.period));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        output.push_str(&format!(
            "{:<16} {:>10} {:>10} {:>10} {:>7}  {:<12} {}\n",
            "Category", "Budget", "Spent", "Left", "Used", "", "Status"
        ));
        output.push_str(&rule(72));
        output.push('\n');

        for row in &self.categories {
            let remaining = if row.is_overspent() {
                format!("{} *", row.remaining)
            } else {
                row.remaining.to_string()
            };
            output.push_str(&format!(
                "{:<16} {:>10} {:>10} {:>10} {:>6.1}%  {:<12} {}\n",
                row.category,
                row.limit,
                row.spent,
                remaining,
                row.percentage,
                usage_bar(row.percentage, 12),
                row.status
            ));
        }

        for (category, spent) in &self.unbudgeted {
            output.push_str(&format!(
                "{:<16} {:>10} {:>10} {:>10}\n",
                category, "-", spent, "-"
            ));
        }

        output.push_str(&rule(72));
        output.push('\n');
        output.push_str(&format!(
            "{:<16} {:>10} {:>10} {:>10} {:>6.1}%\n",
            "TOTAL",
            self.total_budget,
            self.total_spent,
            self.net_savings,
            self.overall_percentage()
        ));
        output.push_str(&format!("Savings target: {}\n", self.savings_target));

        if !self.alerts.is_empty() {
            output.push_str(&format!(
                "\nAlerts (threshold {:.0}%):\n",
                self.alert_threshold
            ));
            for alert in &self.alerts {
                output.push_str(&format!("  ! {}\n", alert));
            }
        }

        output.push_str("\n* = Overspent\n");
        output
    }
}

/// Income vs expenses for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBalance {
    pub period: MonthPeriod,
    pub total_income: Money,
    pub total_expense: Money,
    pub net: Money,
    pub transaction_count: usize,
    /// Expense spread over a nominal 30-day month
    pub daily_average_spend: Money,
    /// Net as a percentage of income; absent when there is no income
    pub savings_rate: Option<f64>,
}

impl MonthlyBalance {
    /// Compute the balance for `period` from a ledger snapshot
    pub fn compute(period: MonthPeriod, transactions: &[Transaction]) -> Self {
        let in_month: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| period.contains(t.date))
            .collect();

        let total_income = total(incomes(in_month.iter().copied()));
        let total_expense = total(expenses(in_month.iter().copied()));
        let net = total_income - total_expense;

        let savings_rate = if total_income.is_positive() {
            Some(net.cents() as f64 / total_income.cents() as f64 * 100.0)
        } else {
            None
        };

        Self {
            period,
            total_income,
            total_expense,
            net,
            transaction_count: in_month.len(),
            daily_average_spend: Money::from_cents(
                (total_expense.cents() as f64 / 30.0).round() as i64,
            ),
            savings_rate,
        }
    }

    /// Format the balance for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Balance - {}\n", self.period));
        output.push_str(&"=".repeat(40));
        output.push('\n');
        output.push_str(&format!("{:<22} {:>16}\n", "Income", self.total_income));
        output.push_str(&format!("{:<22} {:>16}\n", "Expenses", self.total_expense));
        output.push_str(&rule(40));
        output.push('\n');
        output.push_str(&format!("{:<22} {:>16}\n", "Net", self.net));
        output.push_str(&format!(
            "{:<22} {:>16}\n",
            "Daily average spend", self.daily_average_spend
        ));
        if let Some(rate) = self.savings_rate {
            output.push_str(&format!("{:<22} {:>15.1}%\n", "Savings rate", rate));
        }
        output.push_str(&format!(
            "{:<22} {:>16}\n",
            "Transactions", self.transaction_count
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn jan() -> MonthPeriod {
        MonthPeriod::new(2025, 1).unwrap()
    }

    fn config_with(limits: &[(&str, i64)]) -> BudgetConfig {
        let mut config = BudgetConfig::default();
        config.monthly_budgets.clear();
        for (cat, limit) in limits {
            config.set_limit(*cat, Money::from_units(*limit));
        }
        config
    }

    #[test]
    fn test_ninety_percent_triggers_alert() {
        let config = config_with(&[("Svago", 100)]);
        let txns = vec![Transaction::expense(date(2025, 1, 5), "Cinema", "Svago", Money::from_units(90))];

        let report = evaluate(jan(), &txns, &config).unwrap();
        let row = &report.categories[0];
        assert_eq!(row.spent, Money::from_units(90));
        assert!((row.percentage - 90.0).abs() < 1e-9);
        assert_eq!(row.status, BudgetStatus::Critical);
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].to_string(), "Svago: 90.0% of budget");
    }

    #[test]
    fn test_unspent_category_reports_zero() {
        let config = config_with(&[("Casa", 800), ("Svago", 100)]);
        let report = evaluate(jan(), &[], &config).unwrap();

        assert_eq!(report.categories.len(), 2);
        assert!(report.categories.iter().all(|c| c.spent.is_zero()));
        assert!(report.alerts.is_empty());
        assert_eq!(report.total_budget, Money::from_units(900));
        assert_eq!(report.net_savings, Money::from_units(900));
    }

    #[test]
    fn test_totals_include_unbudgeted_categories() {
        let config = config_with(&[("Casa", 500)]);
        let txns = vec![
            Transaction::expense(date(2025, 1, 3), "Affitto", "Casa", Money::from_units(400)),
            Transaction::expense(date(2025, 1, 4), "Farmacia", "Salute", Money::from_units(30)),
            // Other month and income are ignored
            Transaction::expense(date(2025, 2, 1), "Affitto", "Casa", Money::from_units(400)),
            Transaction::income(date(2025, 1, 27), "Paga", "Stipendio", Money::from_units(2000)),
        ];

        let report = evaluate(jan(), &txns, &config).unwrap();
        assert_eq!(report.total_spent, Money::from_units(430));
        assert_eq!(report.net_savings, Money::from_units(70));
        assert_eq!(report.unbudgeted["Salute"], Money::from_units(30));
        assert_eq!(report.categories[0].status, BudgetStatus::Warning);
    }

    #[test]
    fn test_zero_limit_has_zero_percentage() {
        let config = config_with(&[("Varie", 0)]);
        let txns = vec![Transaction::expense(date(2025, 1, 3), "x", "Varie", Money::from_units(10))];

        let report = evaluate(jan(), &txns, &config).unwrap();
        assert_eq!(report.categories[0].percentage, 0.0);
        assert!(report.categories[0].is_overspent());
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn test_malformed_config_is_error() {
        let mut config = config_with(&[("Casa", 100)]);
        config.goals.alert_threshold_pct = f64::NAN;
        let err = evaluate(jan(), &[], &config).unwrap_err();
        assert!(matches!(err, crate::error::LedgerError::Config(_)));
    }

    #[test]
    fn test_status_bands() {
        assert_eq!(BudgetStatus::from_percentage(74.9), BudgetStatus::OnTrack);
        assert_eq!(BudgetStatus::from_percentage(75.0), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::from_percentage(90.0), BudgetStatus::Critical);
    }

    #[test]
    fn test_monthly_balance() {
        let txns = vec![
            Transaction::income(date(2025, 1, 27), "Paga", "Stipendio", Money::from_units(2000)),
            Transaction::expense(date(2025, 1, 3), "Affitto", "Casa", Money::from_units(600)),
            Transaction::expense(date(2025, 2, 3), "Affitto", "Casa", Money::from_units(600)),
        ];

        let balance = MonthlyBalance::compute(jan(), &txns);
        assert_eq!(balance.net, Money::from_units(1400));
        assert_eq!(balance.transaction_count, 2);
        assert_eq!(balance.daily_average_spend, Money::from_units(20));
        assert!((balance.savings_rate.unwrap() - 70.0).abs() < 1e-9);

        let feb = MonthlyBalance::compute(MonthPeriod::new(2025, 2).unwrap(), &txns);
        assert!(feb.savings_rate.is_none());
        assert!(feb.net.is_negative());
    }

    #[test]
    fn test_format_terminal_marks_overspent() {
        let config = config_with(&[("Svago", 50)]);
        let txns = vec![Transaction::expense(date(2025, 1, 5), "Concerto", "Svago", Money::from_units(80))];

        let output = evaluate(jan(), &txns, &config).unwrap().format_terminal();
        assert!(output.contains("Budget - 2025-01"));
        assert!(output.contains("-30.00 *"));
        assert!(output.contains("Svago: 160.0% of budget"));
        assert!(output.contains('▓'));
    }
}
