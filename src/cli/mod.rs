//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod config;
pub mod report;
pub mod transaction;

pub use backup::{handle_backup_command, BackupCommands};
pub use config::{handle_config_command, ConfigArgs};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_add_command, handle_list_command, AddArgs, ListArgs};

use crate::error::{LedgerError, LedgerResult};
use crate::models::MonthPeriod;

/// Parse a `YYYY-MM` option, defaulting to the current month
pub(crate) fn parse_month(month: Option<&str>) -> LedgerResult<MonthPeriod> {
    match month {
        Some(s) => MonthPeriod::parse(s).map_err(|e| {
            LedgerError::Config(format!("{}. Use YYYY-MM (e.g., 2025-01)", e))
        }),
        None => Ok(MonthPeriod::current()),
    }
}
