//! Aggregation primitives
//!
//! Pure functions over transaction slices. Empty input yields empty maps or
//! zero values, never an error; callers decide what "no data" means.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Money, MonthPeriod, Transaction};

/// Total expense of one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub period: MonthPeriod,
    pub total: Money,
}

/// Derived per-month summary used as forecast input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAggregate {
    pub period: MonthPeriod,
    pub total_expense: Money,
    pub total_income: Money,
    pub category_totals: BTreeMap<String, Money>,
    /// Mean weekday index (0 = Monday) over the month's expenses
    pub mean_weekday: f64,
    /// Most frequent expense category; ties go to the alphabetically first
    pub dominant_category: String,
    pub expense_count: usize,
}

/// Expense transactions only
pub fn expenses<'a, I>(transactions: I) -> impl Iterator<Item = &'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions.into_iter().filter(|t| t.is_expense())
}

/// Income transactions only
pub fn incomes<'a, I>(transactions: I) -> impl Iterator<Item = &'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions.into_iter().filter(|t| t.is_income())
}

/// Sum of amounts per category
///
/// Kinds are not separated here; filter with [`expenses`] or [`incomes`]
/// first.
pub fn sum_by_category<'a, I>(transactions: I) -> BTreeMap<String, Money>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: BTreeMap<String, Money> = BTreeMap::new();
    for txn in transactions {
        *totals.entry(txn.category.clone()).or_default() += txn.amount;
    }
    totals
}

/// Sum of all amounts
pub fn total<'a, I>(transactions: I) -> Money
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions.into_iter().map(|t| t.amount).sum()
}

/// Total expense per calendar month, chronological
pub fn monthly_totals<'a, I>(transactions: I) -> Vec<MonthlyTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut by_month: BTreeMap<MonthPeriod, Money> = BTreeMap::new();
    for txn in expenses(transactions) {
        *by_month.entry(MonthPeriod::from_date(txn.date)).or_default() += txn.amount;
    }

    by_month
        .into_iter()
        .map(|(period, total)| MonthlyTotal { period, total })
        .collect()
}

/// Mean expense amount per weekday (0 = Monday .. 6 = Sunday)
///
/// Weekdays without expenses are absent from the map.
pub fn mean_by_weekday<'a, I>(transactions: I) -> BTreeMap<u32, f64>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut buckets: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for txn in expenses(transactions) {
        buckets
            .entry(txn.weekday_index())
            .or_default()
            .push(txn.amount.to_major());
    }

    buckets
        .into_iter()
        .map(|(weekday, amounts)| (weekday, mean(&amounts)))
        .collect()
}

/// Arithmetic mean; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1); 0 with fewer than two values
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Per-month aggregates for every month with at least one expense
pub fn monthly_aggregates<'a, I>(transactions: I) -> Vec<MonthlyAggregate>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut by_month: BTreeMap<MonthPeriod, Vec<&Transaction>> = BTreeMap::new();
    for txn in transactions {
        by_month
            .entry(MonthPeriod::from_date(txn.date))
            .or_default()
            .push(txn);
    }

    by_month
        .into_iter()
        .filter_map(|(period, month_txns)| {
            let spent: Vec<&Transaction> = expenses(month_txns.iter().copied()).collect();
            if spent.is_empty() {
                return None;
            }

            let weekdays: Vec<f64> = spent.iter().map(|t| t.weekday_index() as f64).collect();

            Some(MonthlyAggregate {
                period,
                total_expense: total(spent.iter().copied()),
                total_income: total(incomes(month_txns.iter().copied())),
                category_totals: sum_by_category(spent.iter().copied()),
                mean_weekday: mean(&weekdays),
                dominant_category: dominant_category(&spent),
                expense_count: spent.len(),
            })
        })
        .collect()
}

/// Most frequent category; the BTreeMap order breaks ties alphabetically
fn dominant_category(transactions: &[&Transaction]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for txn in transactions {
        *counts.entry(txn.category.as_str()).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (category, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((category, count));
        }
    }

    best.map(|(category, _)| category.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(d: NaiveDate, cat: &str, units: i64) -> Transaction {
        Transaction::expense(d, "test", cat, Money::from_units(units))
    }

    #[test]
    fn test_sum_by_category() {
        let empty: Vec<Transaction> = Vec::new();
        assert!(sum_by_category(&empty).is_empty());

        let txns = vec![
            expense(date(2025, 1, 1), "Casa", 10),
            expense(date(2025, 1, 2), "Casa", 5),
        ];
        let sums = sum_by_category(&txns);
        assert_eq!(sums.len(), 1);
        assert_eq!(sums["Casa"], Money::from_units(15));
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(std_dev(&[5.0]), 0.0);
        assert_eq!(std_dev(&[1.0, 1.0, 1.0]), 0.0);
        assert!((std_dev(&[10.0, 10.0, 100.0]) - 51.9615).abs() < 1e-3);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_monthly_totals_are_chronological_and_expense_only() {
        let txns = vec![
            expense(date(2025, 3, 1), "Casa", 30),
            expense(date(2024, 12, 5), "Casa", 10),
            Transaction::income(date(2025, 3, 2), "Paga", "Stipendio", Money::from_units(999)),
            expense(date(2025, 3, 9), "Svago", 5),
        ];

        let totals = monthly_totals(&txns);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].period, MonthPeriod::new(2024, 12).unwrap());
        assert_eq!(totals[0].total, Money::from_units(10));
        assert_eq!(totals[1].total, Money::from_units(35));
    }

    #[test]
    fn test_mean_by_weekday_ignores_income() {
        // 2025-01-13 is a Monday, 2025-01-15 a Wednesday
        let txns = vec![
            expense(date(2025, 1, 13), "Casa", 10),
            expense(date(2025, 1, 20), "Casa", 20),
            expense(date(2025, 1, 15), "Casa", 7),
            Transaction::income(date(2025, 1, 13), "Paga", "Stipendio", Money::from_units(1000)),
        ];

        let means = mean_by_weekday(&txns);
        assert_eq!(means.len(), 2);
        assert_eq!(means[&0], 15.0);
        assert_eq!(means[&2], 7.0);
    }

    #[test]
    fn test_monthly_aggregates() {
        let txns = vec![
            expense(date(2025, 1, 13), "Svago", 10),
            expense(date(2025, 1, 15), "Casa", 20),
            expense(date(2025, 1, 17), "Casa", 5),
            Transaction::income(date(2025, 1, 27), "Paga", "Stipendio", Money::from_units(100)),
            // Income-only month is skipped
            Transaction::income(date(2025, 2, 27), "Paga", "Stipendio", Money::from_units(100)),
        ];

        let aggs = monthly_aggregates(&txns);
        assert_eq!(aggs.len(), 1);
        let jan = &aggs[0];
        assert_eq!(jan.total_expense, Money::from_units(35));
        assert_eq!(jan.total_income, Money::from_units(100));
        assert_eq!(jan.dominant_category, "Casa");
        assert_eq!(jan.expense_count, 3);
        // Monday, Wednesday, Friday
        assert!((jan.mean_weekday - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_dominant_category_tie_is_alphabetical() {
        let txns = vec![
            expense(date(2025, 1, 1), "Svago", 10),
            expense(date(2025, 1, 2), "Casa", 10),
        ];
        let aggs = monthly_aggregates(&txns);
        assert_eq!(aggs[0].dominant_category, "Casa");
    }
}
