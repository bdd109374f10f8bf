//! CLI commands for reports
//!
//! Every report prints a terminal rendering by default, or the report
//! structure as pretty JSON with `--json`.

use chrono::NaiveDate;
use clap::Subcommand;
use serde::Serialize;

use super::parse_month;
use crate::analytics::anomalies::format_anomalies;
use crate::analytics::recommendations::format_recommendations;
use crate::analytics::DEFAULT_THRESHOLD;
use crate::error::{LedgerError, LedgerResult};
use crate::services::AnalyticsService;
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Budget vs actual spending for a month
    Budget {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Income vs expenses for a month
    Balance {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// General statistics over the whole ledger
    #[command(alias = "statistics")]
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Weekday bias, monthly trend and volatility
    Patterns {
        #[arg(long)]
        json: bool,
    },

    /// Transactions far above their category's usual amount
    Anomalies {
        /// Standard deviations above the category mean
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        #[arg(long)]
        json: bool,
    },

    /// Forecast next month's total spend
    Forecast {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Budget recommendations for the current month
    #[command(alias = "recommendations")]
    Advice {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

/// Handle report commands
pub fn handle_report_command(storage: &Storage, cmd: ReportCommands) -> LedgerResult<()> {
    let service = AnalyticsService::new(storage);

    let result = match cmd {
        ReportCommands::Budget { month, json } => {
            let report = service.budget(parse_month(month.as_deref())?)?;
            emit(json, &report, || report.format_terminal())
        }
        ReportCommands::Balance { month, json } => {
            let balance = service.balance(parse_month(month.as_deref())?)?;
            emit(json, &balance, || balance.format_terminal())
        }
        ReportCommands::Stats { json } => service
            .statistics()
            .and_then(|stats| emit(json, &stats, || stats.format_terminal())),
        ReportCommands::Patterns { json } => service
            .patterns()
            .and_then(|report| emit(json, &report, || report.format_terminal())),
        ReportCommands::Anomalies { threshold, json } => {
            let anomalies = service.anomalies(threshold)?;
            emit(json, &anomalies, || format_anomalies(&anomalies, threshold))
        }
        ReportCommands::Forecast { as_of, json } => {
            let today = parse_date_or_today(as_of.as_deref())?;
            service
                .forecast(today)
                .and_then(|report| emit(json, &report, || report.format_terminal()))
        }
        ReportCommands::Advice { as_of, json } => {
            let today = parse_date_or_today(as_of.as_deref())?;
            let advice = service.recommendations(today)?;
            emit(json, &advice, || format_recommendations(&advice))
        }
    };

    // Not enough history is an answer, not a failure
    match result {
        Err(e) if e.is_no_data() || e.is_insufficient_data() => {
            println!("{}", e);
            Ok(())
        }
        other => other,
    }
}

fn emit<T: Serialize>(json: bool, report: &T, terminal: impl FnOnce() -> String) -> LedgerResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", terminal());
    }
    Ok(())
}

fn parse_date_or_today(date_str: Option<&str>) -> LedgerResult<NaiveDate> {
    match date_str {
        Some(date_str) => NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
            LedgerError::Config(format!("Invalid date format: '{}'. Use YYYY-MM-DD", date_str))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
