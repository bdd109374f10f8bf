//! Service layer for Spendwise
//!
//! The service layer sits between callers (the CLI or any other front end)
//! and storage: it validates input, resolves categories and runs the
//! analytics engine over ledger snapshots.

pub mod analytics;
pub mod transaction;

pub use analytics::AnalyticsService;
pub use transaction::{CreateTransactionInput, TransactionFilter, TransactionService};
