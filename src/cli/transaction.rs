//! Transaction CLI commands
//!
//! Implements `add` and `list`.

use chrono::NaiveDate;
use clap::Args;

use super::parse_month;
use crate::display::transaction::{format_transaction_details, format_transaction_table};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, TransactionKind};
use crate::services::{CreateTransactionInput, TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Arguments for `add`
#[derive(Args)]
pub struct AddArgs {
    /// Amount (e.g., "12.50" or "12,50")
    pub amount: String,
    /// Description (e.g., "Pizza con amici")
    pub description: String,
    /// Category name; detected from the description when omitted
    #[arg(short, long)]
    pub category: Option<String>,
    /// Record an income instead of an expense
    #[arg(short, long)]
    pub income: bool,
    /// Transaction date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,
    /// Free-text note
    #[arg(short, long)]
    pub note: Option<String>,
}

/// Arguments for `list`
#[derive(Args)]
pub struct ListArgs {
    /// Only show this month (YYYY-MM)
    #[arg(short, long)]
    pub month: Option<String>,
    /// Number of most recent transactions to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Handle `add`
pub fn handle_add_command(storage: &Storage, args: AddArgs) -> LedgerResult<()> {
    let service = TransactionService::new(storage);

    let amount = Money::parse(&args.amount).map_err(|e| {
        LedgerError::invalid(format!(
            "Invalid amount format: '{}'. Use format like '12.50'. Error: {}",
            args.amount, e
        ))
    })?;

    let date = match args.date {
        Some(date_str) => Some(NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
            LedgerError::invalid(format!("Invalid date format: '{}'. Use YYYY-MM-DD", date_str))
        })?),
        None => None,
    };

    let kind = if args.income {
        TransactionKind::Income
    } else {
        TransactionKind::Expense
    };

    let auto_categorized = args.category.is_none();
    let input = CreateTransactionInput {
        date,
        description: args.description,
        amount,
        kind,
        category: args.category,
        note: args.note,
    };

    let txn = service.create(input)?;

    println!("Recorded {}:", txn.kind.to_string().to_lowercase());
    print!("{}", format_transaction_details(&txn));
    if auto_categorized {
        println!("(category detected from the description)");
    }

    Ok(())
}

/// Handle `list`
pub fn handle_list_command(storage: &Storage, args: ListArgs) -> LedgerResult<()> {
    let service = TransactionService::new(storage);

    let mut filter = TransactionFilter::new().limit(args.limit);
    if let Some(month) = args.month.as_deref() {
        filter = filter.month(parse_month(Some(month))?);
    }

    let transactions = service.list(filter)?;
    print!("{}", format_transaction_table(&transactions));

    if !transactions.is_empty() {
        println!("Showing {} of {} transaction(s)", transactions.len(), service.count()?);
    }

    Ok(())
}
