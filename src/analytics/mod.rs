//! Ledger analytics engine
//!
//! Every analysis is a synchronous function over a read snapshot of the
//! ledger. Nothing here touches storage or keeps state between calls.
//!
//! - `aggregate`: sums, means and std-dev by category, weekday and month
//! - `budget`: budget vs actual and the monthly income/expense balance
//! - `forecast` / `forest`: next-month spend forecast
//! - `patterns` / `anomalies`: behavioral summaries and outliers
//! - `statistics` / `recommendations`: ledger overview and advice

pub mod aggregate;
pub mod anomalies;
pub mod budget;
pub mod forecast;
pub mod forest;
pub mod patterns;
pub mod recommendations;
pub mod statistics;

pub use aggregate::{MonthlyAggregate, MonthlyTotal};
pub use anomalies::{detect_anomalies, Anomaly, DEFAULT_THRESHOLD};
pub use budget::{evaluate, BudgetAlert, BudgetReport, BudgetStatus, CategoryBudget, MonthlyBalance};
pub use forecast::{forecast_next_month, Forecast, ForecastModel, ForecastReport, TrainingReport};
pub use patterns::{analyze_patterns, PatternReport, TrendDirection};
pub use recommendations::{Recommendation, RecommendationKind};
pub use statistics::LedgerStatistics;
