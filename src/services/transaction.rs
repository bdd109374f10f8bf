//! Transaction service
//!
//! Turns loosely-typed input into validated ledger entries: resolves the
//! category (explicit or auto-detected) and appends through storage.

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::categorize::{Categorizer, KeywordCategorizer};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{categories_for, find_category, Money, MonthPeriod, Transaction, TransactionKind};
use crate::storage::Storage;

/// Service for recording and listing transactions
pub struct TransactionService<'a> {
    storage: &'a Storage,
    categorizer: Box<dyn Categorizer + 'a>,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only transactions dated in this month
    pub month: Option<MonthPeriod>,
    /// Keep only the most recent N entries
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by month
    pub fn month(mut self, month: MonthPeriod) -> Self {
        self.month = Some(month);
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub description: String,
    pub amount: Money,
    pub kind: TransactionKind,
    /// Auto-detected from the description when absent
    pub category: Option<String>,
    pub note: Option<String>,
}

impl CreateTransactionInput {
    /// An expense dated today with the category left to the categorizer
    pub fn expense(description: impl Into<String>, amount: Money) -> Self {
        Self {
            date: None,
            description: description.into(),
            amount,
            kind: TransactionKind::Expense,
            category: None,
            note: None,
        }
    }

    /// An income dated today with the category left to the categorizer
    pub fn income(description: impl Into<String>, amount: Money) -> Self {
        Self {
            kind: TransactionKind::Income,
            ..Self::expense(description, amount)
        }
    }
}

impl<'a> TransactionService<'a> {
    /// Create a transaction service using keyword categorization
    pub fn new(storage: &'a Storage) -> Self {
        Self::with_categorizer(storage, KeywordCategorizer::new())
    }

    /// Create a transaction service with a custom categorization strategy
    pub fn with_categorizer(storage: &'a Storage, categorizer: impl Categorizer + 'a) -> Self {
        Self {
            storage,
            categorizer: Box::new(categorizer),
        }
    }

    /// Validate the input and append it to the ledger
    pub fn create(&self, input: CreateTransactionInput) -> LedgerResult<Transaction> {
        let description = input.description.trim();
        if description.is_empty() {
            return Err(LedgerError::invalid("Description cannot be empty"));
        }

        let category = match input.category.as_deref() {
            Some(name) => find_category(input.kind, name)
                .ok_or_else(|| {
                    LedgerError::invalid(format!(
                        "'{}' is not a valid {} category (expected one of: {})",
                        name.trim(),
                        input.kind,
                        categories_for(input.kind).join(", ")
                    ))
                })?
                .to_string(),
            None => self.categorizer.categorize(description, input.kind)?,
        };

        let date = input.date.unwrap_or_else(|| Local::now().date_naive());
        let mut txn = Transaction::new(date, description, category, input.amount, input.kind);
        if let Some(note) = input.note {
            txn.note = note.trim().to_string();
        }

        self.storage.append(txn.clone())?;

        info!(
            kind = %txn.kind,
            category = %txn.category,
            amount = %txn.amount,
            "Transaction recorded"
        );

        Ok(txn)
    }

    /// List transactions in ledger order
    pub fn list(&self, filter: TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        let mut transactions = match filter.month {
            Some(month) => self.storage.transactions_in(month)?,
            None => self.storage.all_transactions()?,
        };

        if let Some(limit) = filter.limit {
            let skip = transactions.len().saturating_sub(limit);
            transactions.drain(..skip);
        }

        Ok(transactions)
    }

    /// Count all transactions
    pub fn count(&self) -> LedgerResult<usize> {
        self.storage.transactions.count()
    }
}
