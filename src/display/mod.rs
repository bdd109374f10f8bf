//! Display formatting for terminal output
//!
//! Provides utilities for formatting ledger entries and report fragments
//! for terminal display.

pub mod report;
pub mod transaction;

pub use transaction::{format_transaction_details, format_transaction_table};
