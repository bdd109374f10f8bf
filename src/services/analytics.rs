//! Analytics service
//!
//! Takes a read snapshot of the ledger and the budget configuration and
//! hands it to the analytics engine. Each call works on fresh data, so a
//! forecast is always retrained on the current ledger.

use chrono::NaiveDate;
use tracing::debug;

use crate::analytics::{
    self, statistics, Anomaly, BudgetReport, ForecastReport, LedgerStatistics, MonthlyBalance,
    PatternReport, Recommendation,
};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{MonthPeriod, Transaction};
use crate::storage::Storage;

/// Service producing reports over the ledger
pub struct AnalyticsService<'a> {
    storage: &'a Storage,
}

impl<'a> AnalyticsService<'a> {
    /// Create a new analytics service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn snapshot(&self) -> LedgerResult<Vec<Transaction>> {
        let transactions = self.storage.all_transactions()?;
        debug!(count = transactions.len(), "Ledger snapshot taken");
        Ok(transactions)
    }

    /// Budget vs actual for a month
    pub fn budget(&self, period: MonthPeriod) -> LedgerResult<BudgetReport> {
        let transactions = self.storage.transactions_in(period)?;
        let config = self.storage.budget_config()?;
        analytics::evaluate(period, &transactions, &config)
    }

    /// Income vs expenses for a month
    pub fn balance(&self, period: MonthPeriod) -> LedgerResult<MonthlyBalance> {
        let transactions = self.storage.transactions_in(period)?;
        Ok(MonthlyBalance::compute(period, &transactions))
    }

    /// Whole-ledger statistics; `NoData` on an empty ledger
    pub fn statistics(&self) -> LedgerResult<LedgerStatistics> {
        let transactions = self.snapshot()?;
        if transactions.is_empty() {
            return Err(LedgerError::NoData);
        }
        Ok(statistics::compute(&transactions))
    }

    /// Spending patterns over all expenses
    pub fn patterns(&self) -> LedgerResult<PatternReport> {
        analytics::analyze_patterns(&self.snapshot()?)
    }

    /// Per-category outliers above `threshold` standard deviations
    pub fn anomalies(&self, threshold: f64) -> LedgerResult<Vec<Anomaly>> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(LedgerError::Config(format!(
                "Anomaly threshold must be a non-negative number (got {})",
                threshold
            )));
        }
        Ok(analytics::detect_anomalies(&self.snapshot()?, threshold))
    }

    /// Train on the current ledger and forecast the month after `today`
    pub fn forecast(&self, today: NaiveDate) -> LedgerResult<ForecastReport> {
        analytics::forecast_next_month(&self.snapshot()?, today)
    }

    /// Budget advice for the month containing `today`
    pub fn recommendations(&self, today: NaiveDate) -> LedgerResult<Vec<Recommendation>> {
        let config = self.storage.budget_config()?;
        analytics::recommendations::generate(today, &self.snapshot()?, &config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seed_months(storage: &Storage, months: u32, per_month: u32) {
        for month in 1..=months {
            for day in 1..=per_month {
                let txn = Transaction::expense(
                    date(2025, month, day),
                    "Spesa",
                    if day % 2 == 0 { "Alimentari" } else { "Casa" },
                    Money::from_units(10 * day as i64 + month as i64),
                );
                storage.append(txn).unwrap();
            }
        }
    }

    #[test]
    fn test_empty_ledger() {
        let (_temp, storage) = create_test_storage();
        let service = AnalyticsService::new(&storage);

        assert!(service.statistics().unwrap_err().is_no_data());
        assert!(service.patterns().unwrap_err().is_no_data());
        assert!(service.anomalies(2.0).unwrap().is_empty());
        assert!(service.forecast(date(2025, 3, 31)).unwrap_err().is_insufficient_data());

        let report = service.budget(MonthPeriod::new(2025, 1).unwrap()).unwrap();
        assert!(report.alerts.is_empty());
        assert_eq!(report.categories.len(), 8);
    }

    #[test]
    fn test_budget_uses_stored_config() {
        let (_temp, storage) = create_test_storage();
        let mut config = storage.budget_config().unwrap();
        config.monthly_budgets.clear();
        config.set_limit("Casa", Money::from_units(100));
        storage.update_budget_config(config).unwrap();

        storage
            .append(Transaction::expense(date(2025, 1, 3), "Affitto", "Casa", Money::from_units(95)))
            .unwrap();

        let service = AnalyticsService::new(&storage);
        let report = service.budget(MonthPeriod::new(2025, 1).unwrap()).unwrap();
        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.alerts.len(), 1);
    }

    #[test]
    fn test_forecast_with_enough_history() {
        let (_temp, storage) = create_test_storage();
        seed_months(&storage, 3, 4);

        let service = AnalyticsService::new(&storage);
        let report = service.forecast(date(2025, 3, 31)).unwrap();
        assert_eq!(report.training.months, 3);
        assert_eq!(report.forecast.period, MonthPeriod::new(2025, 4).unwrap());
        assert!(report.forecast.low <= report.forecast.point);
        assert!(report.forecast.point <= report.forecast.high);
    }

    #[test]
    fn test_twelve_equal_months_end_to_end() {
        let (_temp, storage) = create_test_storage();
        for month in 1..=12 {
            storage
                .append(Transaction::expense(date(2024, month, 15), "Varie", "Varie", Money::from_units(100)))
                .unwrap();
        }

        let service = AnalyticsService::new(&storage);
        let june = MonthPeriod::new(2024, 6).unwrap();
        let report = service.budget(june).unwrap();
        let varie = report.categories.iter().find(|c| c.category == "Varie").unwrap();
        assert_eq!(varie.spent, Money::from_units(100));

        let patterns = service.patterns().unwrap();
        assert_eq!(patterns.volatility, 0.0);
        assert_eq!(patterns.monthly_trend_pct, Some(0.0));
        assert_eq!(
            patterns.trend_direction,
            Some(crate::analytics::TrendDirection::Decreasing)
        );
    }

    #[test]
    fn test_bad_budget_only_fails_budget_report() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.config_file(), r#"{"budget_mensile": {"Casa": -5}}"#).unwrap();

        let storage = Storage::open(paths).unwrap();
        storage
            .append(Transaction::expense(date(2025, 1, 3), "Affitto", "Casa", Money::from_units(700)))
            .unwrap();

        let service = AnalyticsService::new(&storage);
        let january = MonthPeriod::new(2025, 1).unwrap();
        assert!(service.patterns().is_ok());
        assert!(service.balance(january).is_ok());
        assert!(service.statistics().is_ok());
        assert!(matches!(service.budget(january), Err(LedgerError::Config(_))));
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let (_temp, storage) = create_test_storage();
        let service = AnalyticsService::new(&storage);
        assert!(matches!(service.anomalies(-1.0), Err(LedgerError::Config(_))));
    }

    #[test]
    fn test_statistics_and_recommendations() {
        let (_temp, storage) = create_test_storage();
        seed_months(&storage, 2, 3);

        let service = AnalyticsService::new(&storage);
        let stats = service.statistics().unwrap();
        assert_eq!(stats.transaction_count, 6);

        let advice = service.recommendations(date(2025, 2, 15)).unwrap();
        assert!(!advice.is_empty());
        assert!(advice.len() <= 5);
    }
}
