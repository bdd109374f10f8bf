//! Transaction display formatting
//!
//! Renders ledger entries as a table for the `list` command.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::clip;
use crate::models::Transaction;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Note")]
    note: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(txn: &Transaction) -> Self {
        let amount = if txn.is_income() {
            format!("+{}", txn.amount)
        } else {
            format!("-{}", txn.amount)
        };

        Self {
            date: txn.date.format("%Y-%m-%d").to_string(),
            kind: txn.kind.to_string(),
            description: clip(&txn.description, 30),
            category: txn.category.clone(),
            amount,
            note: clip(&txn.note, 24),
        }
    }
}

/// Format a list of transactions as a table
pub fn format_transaction_table(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<TransactionRow> = transactions.iter().map(TransactionRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction) -> String {
    let mut output = String::new();

    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Description: {}\n", txn.description));
    output.push_str(&format!("Category:    {}\n", txn.category));
    output.push_str(&format!("Amount:      {}\n", txn.amount));

    if !txn.note.is_empty() {
        output.push_str(&format!("Note:        {}\n", txn.note));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_table() {
        assert_eq!(format_transaction_table(&[]), "No transactions found.\n");
    }

    #[test]
    fn test_table_contains_rows() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let txns = vec![
            Transaction::expense(date, "Pizza", "Ristorazione", Money::from_cents(1250)),
            Transaction::income(date, "Stipendio", "Stipendio", Money::from_units(1800)),
        ];

        let table = format_transaction_table(&txns);
        assert!(table.contains("Description"));
        assert!(table.contains("-12.50"));
        assert!(table.contains("+1800.00"));
    }

    #[test]
    fn test_details_include_note() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let txn = Transaction::expense(date, "Treno", "Trasporti", Money::from_units(9)).with_note("Milano");
        let details = format_transaction_details(&txn);
        assert!(details.contains("Category:    Trasporti"));
        assert!(details.contains("Note:        Milano"));
    }
}
