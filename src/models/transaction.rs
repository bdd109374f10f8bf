//! Transaction model
//!
//! A ledger entry is either an expense or an income. Entries are immutable
//! once appended and are identified only by their position in the ledger.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::is_valid_category;
use super::money::Money;

/// Whether a transaction is money going out or coming in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[default]
    Expense,
    Income,
}

impl TransactionKind {
    /// Label used in the `tipo` column of the ledger file
    pub fn ledger_label(&self) -> &'static str {
        match self {
            Self::Expense => "spesa",
            Self::Income => "ricavo",
        }
    }

    /// Parse a `tipo` label (or its English equivalent)
    pub fn from_ledger_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "spesa" | "expense" => Some(Self::Expense),
            "ricavo" | "income" => Some(Self::Income),
            _ => None,
        }
    }

    pub fn is_expense(&self) -> bool {
        matches!(self, Self::Expense)
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Self::Income)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "Expense"),
            Self::Income => write!(f, "Income"),
        }
    }
}

/// A single ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Day the money moved
    pub date: NaiveDate,

    /// Free-text label
    pub description: String,

    /// Category from the vocabulary of `kind`
    pub category: String,

    /// Always positive; direction is carried by `kind`
    pub amount: Money,

    pub kind: TransactionKind,

    /// Optional notes (empty when absent)
    #[serde(default)]
    pub note: String,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        category: impl Into<String>,
        amount: Money,
        kind: TransactionKind,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            category: category.into(),
            amount,
            kind,
            note: String::new(),
        }
    }

    /// Create an expense
    pub fn expense(
        date: NaiveDate,
        description: impl Into<String>,
        category: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self::new(date, description, category, amount, TransactionKind::Expense)
    }

    /// Create an income
    pub fn income(
        date: NaiveDate,
        description: impl Into<String>,
        category: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self::new(date, description, category, amount, TransactionKind::Income)
    }

    /// Attach a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind.is_expense()
    }

    pub fn is_income(&self) -> bool {
        self.kind.is_income()
    }

    /// Weekday index, 0 = Monday .. 6 = Sunday
    pub fn weekday_index(&self) -> u32 {
        self.date.weekday().num_days_from_monday()
    }

    /// Calendar month of the transaction as (year, month)
    pub fn year_month(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }

    /// Check whether the transaction falls in the given calendar month
    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }

    /// Validate the ledger invariants
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if !is_valid_category(self.kind, &self.category) {
            return Err(TransactionValidationError::UnknownCategory {
                kind: self.kind,
                category: self.category.clone(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.category,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    UnknownCategory {
        kind: TransactionKind,
        category: String,
    },
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than zero (got {})", amount)
            }
            Self::UnknownCategory { kind, category } => {
                write!(f, "'{}' is not a valid {} category", category, kind)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
