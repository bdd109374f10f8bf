//! General ledger statistics

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregate::{expenses, incomes, monthly_totals, sum_by_category, total};
use crate::models::{Money, MonthPeriod, Transaction};

/// Headline numbers for the whole ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerStatistics {
    pub transaction_count: usize,
    pub expense_count: usize,
    pub income_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub total_expense: Money,
    pub total_income: Money,
    pub mean_expense: Money,
    pub costliest_category: Option<(String, Money)>,
    pub costliest_month: Option<(MonthPeriod, Money)>,
}

/// Compute statistics over a ledger snapshot; an empty ledger gives zeros
pub fn compute(transactions: &[Transaction]) -> LedgerStatistics {
    let spent: Vec<&Transaction> = expenses(transactions).collect();
    let expense_count = spent.len();
    let total_expense = total(spent.iter().copied());

    let mean_expense = if expense_count > 0 {
        Money::from_cents((total_expense.cents() as f64 / expense_count as f64).round() as i64)
    } else {
        Money::zero()
    };

    // First maximum wins: alphabetical for categories, earliest for months
    let mut costliest_category: Option<(String, Money)> = None;
    for (category, amount) in sum_by_category(spent.iter().copied()) {
        if costliest_category.as_ref().map_or(true, |(_, best)| amount > *best) {
            costliest_category = Some((category, amount));
        }
    }

    let mut costliest_month: Option<(MonthPeriod, Money)> = None;
    for month in monthly_totals(spent.iter().copied()) {
        if costliest_month.map_or(true, |(_, best)| month.total > best) {
            costliest_month = Some((month.period, month.total));
        }
    }

    LedgerStatistics {
        transaction_count: transactions.len(),
        expense_count,
        income_count: transactions.len() - expense_count,
        first_date: transactions.iter().map(|t| t.date).min(),
        last_date: transactions.iter().map(|t| t.date).max(),
        total_expense,
        total_income: total(incomes(transactions)),
        mean_expense,
        costliest_category,
        costliest_month,
    }
}

impl LedgerStatistics {
    /// Format the statistics for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Ledger statistics\n");
        output.push_str(&"=".repeat(44));
        output.push('\n');

        if self.transaction_count == 0 {
            output.push_str("No transactions recorded yet.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<20} {} ({} expenses, {} income)\n",
            "Transactions:", self.transaction_count, self.expense_count, self.income_count
        ));
        if let (Some(first), Some(last)) = (self.first_date, self.last_date) {
            output.push_str(&format!("{:<20} {} .. {}\n", "Period:", first, last));
        }
        output.push_str(&format!("{:<20} {}\n", "Total spent:", self.total_expense));
        output.push_str(&format!("{:<20} {}\n", "Total income:", self.total_income));
        output.push_str(&format!("{:<20} {}\n", "Mean expense:", self.mean_expense));
        if let Some((category, amount)) = &self.costliest_category {
            output.push_str(&format!("{:<20} {} ({})\n", "Top category:", category, amount));
        }
        if let Some((month, amount)) = &self.costliest_month {
            output.push_str(&format!("{:<20} {} ({})\n", "Costliest month:", month, amount));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_ledger() {
        let stats = compute(&[]);
        assert_eq!(stats.transaction_count, 0);
        assert!(stats.first_date.is_none());
        assert!(stats.costliest_category.is_none());
        assert!(stats.mean_expense.is_zero());
        assert!(stats.format_terminal().contains("No transactions"));
    }

    #[test]
    fn test_statistics() {
        let txns = vec![
            Transaction::expense(date(2025, 2, 3), "Affitto", "Casa", Money::from_units(600)),
            Transaction::expense(date(2025, 1, 9), "Spesa", "Alimentari", Money::from_units(80)),
            Transaction::expense(date(2025, 1, 20), "Spesa", "Alimentari", Money::from_units(40)),
            Transaction::income(date(2025, 1, 27), "Paga", "Stipendio", Money::from_units(2000)),
        ];

        let stats = compute(&txns);
        assert_eq!(stats.transaction_count, 4);
        assert_eq!(stats.expense_count, 3);
        assert_eq!(stats.income_count, 1);
        assert_eq!(stats.first_date, Some(date(2025, 1, 9)));
        assert_eq!(stats.last_date, Some(date(2025, 2, 3)));
        assert_eq!(stats.total_expense, Money::from_units(720));
        assert_eq!(stats.total_income, Money::from_units(2000));
        assert_eq!(stats.mean_expense, Money::from_units(240));
        assert_eq!(stats.costliest_category, Some(("Casa".to_string(), Money::from_units(600))));
        assert_eq!(
            stats.costliest_month,
            Some((MonthPeriod::new(2025, 2).unwrap(), Money::from_units(600)))
        );
    }
}
