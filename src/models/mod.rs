//! Core data models for Spendwise
//!
//! This module contains the value types shared by the storage layer and the
//! analytics engine: transactions, amounts, category vocabularies and months.

pub mod category;
pub mod money;
pub mod period;
pub mod transaction;

pub use category::{
    categories_for, default_category, find_category, is_valid_category, EXPENSE_CATEGORIES,
    INCOME_CATEGORIES,
};
pub use money::{Money, MoneyParseError};
pub use period::{MonthPeriod, PeriodParseError};
pub use transaction::{Transaction, TransactionKind, TransactionValidationError};
