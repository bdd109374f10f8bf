//! Per-category outlier detection

use serde::Serialize;

use chrono::NaiveDate;

use super::aggregate::{mean, std_dev};
use crate::display::report::clip;
use crate::models::{Money, Transaction};

/// Default number of standard deviations above the mean
pub const DEFAULT_THRESHOLD: f64 = 2.0;

/// Categories with fewer transactions are not evaluated
pub const MIN_CATEGORY_SIZE: usize = 3;

/// Maximum number of anomalies reported
pub const MAX_ANOMALIES: usize = 10;

/// A transaction well above its category's usual amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: Money,
    pub category_mean: f64,
    /// `amount - category_mean`
    pub difference: f64,
}

/// Flag transactions with `amount > mean + threshold * std_dev` of their category
///
/// The category baseline includes the flagged transaction itself. Results
/// are ordered by amount, largest first, and capped at ten.
pub fn detect_anomalies(transactions: &[Transaction], threshold: f64) -> Vec<Anomaly> {
    // Categories in order of first appearance
    let mut categories: Vec<&str> = Vec::new();
    for txn in transactions {
        if !categories.contains(&txn.category.as_str()) {
            categories.push(&txn.category);
        }
    }

    let mut anomalies = Vec::new();

    for category in categories {
        let members: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| t.category == category)
            .collect();
        if members.len() < MIN_CATEGORY_SIZE {
            continue;
        }

        let amounts: Vec<f64> = members.iter().map(|t| t.amount.to_major()).collect();
        let category_mean = mean(&amounts);
        let limit = category_mean + threshold * std_dev(&amounts);

        for (txn, amount) in members.iter().zip(&amounts) {
            if *amount > limit {
                anomalies.push(Anomaly {
                    date: txn.date,
                    description: txn.description.clone(),
                    category: txn.category.clone(),
                    amount: txn.amount,
                    category_mean,
                    difference: amount - category_mean,
                });
            }
        }
    }

    // sort_by is stable, so equal amounts keep ledger order
    anomalies.sort_by(|a, b| b.amount.cmp(&a.amount));
    anomalies.truncate(MAX_ANOMALIES);
    anomalies
}

/// Format a list of anomalies for terminal display
pub fn format_anomalies(anomalies: &[Anomaly], threshold: f64) -> String {
    let mut output = String::new();

    output.push_str(&format!("Anomalies (> mean + {} std-dev)\n", threshold));
    output.push_str(&"=".repeat(74));
    output.push('\n');

    if anomalies.is_empty() {
        output.push_str("No anomalies found.\n");
        return output;
    }

    output.push_str(&format!(
        "{:<10} {:<24} {:<14} {:>10} {:>10}\n",
        "Date", "Description", "Category", "Amount", "Over mean"
    ));
    output.push_str(&"-".repeat(74));
    output.push('\n');

    for a in anomalies {
        output.push_str(&format!(
            "{:<10} {:<24} {:<14} {:>10} {:>+10.2}\n",
            a.date.format("%Y-%m-%d"),
            clip(&a.description, 24),
            a.category,
            a.amount,
            a.difference
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn expense(d: u32, desc: &str, cat: &str, units: i64) -> Transaction {
        Transaction::expense(date(d), desc, cat, Money::from_units(units))
    }

    #[test]
    fn test_three_transactions_cannot_be_flagged() {
        // mean 40, sample std 51.96, line 143.9
        let txns = vec![
            expense(1, "a", "Svago", 10),
            expense(2, "b", "Svago", 10),
            expense(3, "c", "Svago", 100),
        ];
        assert!(detect_anomalies(&txns, DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn test_flags_clear_outlier() {
        let mut txns: Vec<Transaction> = (1..=9).map(|d| expense(d, "Caffè", "Ristorazione", 10)).collect();
        txns.push(expense(10, "Cena di gala", "Ristorazione", 100));

        let anomalies = detect_anomalies(&txns, DEFAULT_THRESHOLD);
        assert_eq!(anomalies.len(), 1);
        let a = &anomalies[0];
        assert_eq!(a.description, "Cena di gala");
        assert!((a.category_mean - 19.0).abs() < 1e-9);
        assert!((a.difference - 81.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_categories_are_skipped() {
        let txns = vec![
            expense(1, "a", "Casa", 10),
            expense(2, "b", "Casa", 10_000),
        ];
        assert!(detect_anomalies(&txns, 0.0).is_empty());
    }

    #[test]
    fn test_sorted_and_capped() {
        let mut txns = Vec::new();
        // Threshold 0 flags everything above the mean
        for (i, cat) in ["Casa", "Svago", "Salute", "Varie"].iter().enumerate() {
            for d in 1..=5 {
                txns.push(expense(d, "x", cat, (d as i64) * 10 + i as i64));
            }
        }

        let anomalies = detect_anomalies(&txns, 0.0);
        assert_eq!(anomalies.len(), 8);
        assert!(anomalies.windows(2).all(|w| w[0].amount >= w[1].amount));
        assert_eq!(anomalies[0].amount, Money::from_units(53));

        let mut many = Vec::new();
        for d in 1..=28 {
            many.push(expense(d, "x", "Casa", if d % 2 == 0 { 100 } else { 1 }));
        }
        assert_eq!(detect_anomalies(&many, 0.0).len(), MAX_ANOMALIES);
    }

    #[test]
    fn test_format_anomalies() {
        assert!(format_anomalies(&[], 2.0).contains("No anomalies found."));
    }
}
