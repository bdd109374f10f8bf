//! Configuration module for Spendwise
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Budget configuration persistence

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::{BudgetConfig, Goals};
