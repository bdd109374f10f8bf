//! Spendwise - personal expense ledger with budgets, forecasts and anomaly detection
//!
//! This library provides the ledger analytics engine behind the `spendwise`
//! command-line tool. A flat ledger of income and expense transactions is
//! turned into monthly budget comparisons, a next-month spend forecast,
//! behavioral pattern summaries and per-category outliers.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and the budget configuration
//! - `error`: Custom error types
//! - `models`: Transactions, amounts, categories and months
//! - `storage`: CSV ledger with atomic writes
//! - `analytics`: Aggregates, budgets, forecasting, patterns and anomalies
//! - `categorize`: Keyword categorization with a fallback chain
//! - `services`: Business logic layer used by front ends
//! - `backup`: Timestamped backups with retention
//!
//! # Example
//!
//! ```rust,ignore
//! use spendwise::config::LedgerPaths;
//! use spendwise::services::AnalyticsService;
//! use spendwise::storage::Storage;
//!
//! let storage = Storage::open(LedgerPaths::new()?)?;
//! let report = AnalyticsService::new(&storage).patterns()?;
//! println!("{}", report.format_terminal());
//! ```

pub mod analytics;
pub mod backup;
pub mod categorize;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod log;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
