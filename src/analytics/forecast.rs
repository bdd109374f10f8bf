//! Next-month spend forecast
//!
//! The model is retrained from the ledger on every request. Each month with
//! expenses becomes one training row:
//!
//! | feature | value |
//! |---------|-------|
//! | 0 | year |
//! | 1 | month |
//! | 2 | mean weekday of the month's expenses |
//! | 3 | code of the month's most frequent category |
//!
//! and the target is the month's total expense. Prediction uses fixed
//! placeholders for the last two features (Wednesday, code 0) and reports a
//! conventional ±20% band rather than a calibrated interval.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use tracing::debug;

use super::aggregate::{expenses, mean, monthly_aggregates, MonthlyAggregate};
use super::forest::{RandomForest, SeededRng};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{MonthPeriod, Transaction};

/// Minimum number of ledger rows before training is attempted
pub const MIN_TRANSACTIONS: usize = 10;

/// Minimum number of distinct months with expenses
pub const MIN_MONTHS: usize = 3;

/// Percentage of months held out for evaluation when there are more than `MIN_MONTHS`
pub const TEST_PERCENT: usize = 30;

pub const N_TREES: usize = 50;
pub const SEED: u64 = 42;

/// Multipliers of the reported band (±20%)
pub const BAND_LOW: f64 = 0.8;
pub const BAND_HIGH: f64 = 1.2;
pub const CONFIDENCE_LABEL: &str = "80%";

const FORECAST_HORIZON_DAYS: i64 = 30;
const PLACEHOLDER_WEEKDAY: f64 = 3.0;
const PLACEHOLDER_CATEGORY_CODE: f64 = 0.0;

/// Outcome of a training run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub transactions: usize,
    pub months: usize,
    pub samples_train: usize,
    pub samples_test: usize,
    /// Mean absolute error on held-out months; `None` when nothing was held out
    pub mae: Option<f64>,
    /// R² on held-out months; `None` when nothing was held out
    pub r2: Option<f64>,
}

/// Point forecast with its band, in major currency units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub period: MonthPeriod,
    pub point: f64,
    pub low: f64,
    pub high: f64,
    pub confidence: String,
}

impl Forecast {
    fn from_point(period: MonthPeriod, point: f64) -> Self {
        Self {
            period,
            point,
            low: point * BAND_LOW,
            high: point * BAND_HIGH,
            confidence: CONFIDENCE_LABEL.to_string(),
        }
    }
}

/// Training summary plus the forecast it produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub training: TrainingReport,
    pub forecast: Forecast,
}

impl ForecastReport {
    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        let f = &self.forecast;
        let t = &self.training;

        output.push_str(&format!("Spend forecast - {}\n", f.period));
        output.push_str(&"=".repeat(40));
        output.push('\n');
        output.push_str(&format!("Predicted spend:  {:.2}\n", f.point));
        output.push_str(&format!(
            "Range ({}):      {:.2} - {:.2}\n",
            f.confidence, f.low, f.high
        ));
        output.push('\n');
        output.push_str(&format!(
            "Trained on {} month(s) ({} transactions), {} held out\n",
            t.samples_train, t.transactions, t.samples_test
        ));
        match (t.mae, t.r2) {
            (Some(mae), Some(r2)) => {
                output.push_str(&format!("MAE: {:.2}  R²: {:.3}\n", mae, r2));
            }
            _ => output.push_str("MAE / R²: not available (limited data)\n"),
        }

        output
    }
}

/// Random-forest regressor over monthly aggregates
#[derive(Debug, Clone, Default)]
pub struct ForecastModel {
    forest: Option<RandomForest>,
}

impl ForecastModel {
    /// Create an untrained model
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_trained(&self) -> bool {
        self.forest.is_some()
    }

    /// Train on the expense history in `transactions`
    ///
    /// Fails with `InsufficientData` below 10 ledger rows (incomes
    /// included) or 3 distinct months with expenses. With more than 3
    /// months, 30% of them are held out and the model is evaluated on them.
    pub fn train(&mut self, transactions: &[Transaction]) -> LedgerResult<TrainingReport> {
        let spent: Vec<&Transaction> = expenses(transactions).collect();
        let aggregates = monthly_aggregates(spent.iter().copied());

        if transactions.len() < MIN_TRANSACTIONS || aggregates.len() < MIN_MONTHS {
            return Err(LedgerError::InsufficientData {
                transactions: transactions.len(),
                months: aggregates.len(),
            });
        }

        let (rows, targets) = feature_matrix(&spent, &aggregates);
        let n = rows.len();

        let report = if n > MIN_MONTHS {
            let n_test = (n * TEST_PERCENT).div_ceil(100);
            let mut order: Vec<usize> = (0..n).collect();
            SeededRng::new(SEED).shuffle(&mut order);
            let (test_idx, train_idx) = order.split_at(n_test);

            let train_rows: Vec<Vec<f64>> = train_idx.iter().map(|&i| rows[i].clone()).collect();
            let train_targets: Vec<f64> = train_idx.iter().map(|&i| targets[i]).collect();
            let forest = RandomForest::fit(&train_rows, &train_targets, N_TREES, SEED);

            let actual: Vec<f64> = test_idx.iter().map(|&i| targets[i]).collect();
            let predicted: Vec<f64> = test_idx.iter().map(|&i| forest.predict(&rows[i])).collect();

            self.forest = Some(forest);

            TrainingReport {
                transactions: transactions.len(),
                months: n,
                samples_train: train_idx.len(),
                samples_test: test_idx.len(),
                mae: Some(mean_absolute_error(&actual, &predicted)),
                r2: Some(r2_score(&actual, &predicted)),
            }
        } else {
            self.forest = Some(RandomForest::fit(&rows, &targets, N_TREES, SEED));

            TrainingReport {
                transactions: transactions.len(),
                months: n,
                samples_train: n,
                samples_test: 0,
                mae: None,
                r2: None,
            }
        };

        debug!(
            months = report.months,
            train = report.samples_train,
            test = report.samples_test,
            mae = ?report.mae,
            "Trained forecast model"
        );

        Ok(report)
    }

    /// Predict total spend for the month containing `today + 30 days`
    pub fn predict_next_month(&self, today: NaiveDate) -> LedgerResult<Forecast> {
        let forest = self.forest.as_ref().ok_or(LedgerError::ModelNotTrained)?;

        let target = today + Duration::days(FORECAST_HORIZON_DAYS);
        let features = [
            target.year() as f64,
            target.month() as f64,
            PLACEHOLDER_WEEKDAY,
            PLACEHOLDER_CATEGORY_CODE,
        ];

        let point = forest.predict(&features);
        Ok(Forecast::from_point(MonthPeriod::from_date(target), point))
    }
}

/// Train a fresh model and forecast the month after `today`
pub fn forecast_next_month(
    transactions: &[Transaction],
    today: NaiveDate,
) -> LedgerResult<ForecastReport> {
    let mut model = ForecastModel::new();
    let training = model.train(transactions)?;
    let forecast = model.predict_next_month(today)?;
    Ok(ForecastReport { training, forecast })
}

/// One row per month; category codes index the sorted list of categories
/// seen in the training expenses
fn feature_matrix(
    spent: &[&Transaction],
    aggregates: &[MonthlyAggregate],
) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut categories: Vec<&str> = spent.iter().map(|t| t.category.as_str()).collect();
    categories.sort_unstable();
    categories.dedup();

    let code = |category: &str| -> f64 {
        categories
            .binary_search(&category)
            .map(|i| i as f64)
            .unwrap_or(0.0)
    };

    aggregates
        .iter()
        .map(|agg| {
            (
                vec![
                    agg.period.year as f64,
                    agg.period.month as f64,
                    agg.mean_weekday,
                    code(&agg.dominant_category),
                ],
                agg.total_expense.to_major(),
            )
        })
        .unzip()
}

fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .collect();
    mean(&errors)
}

/// Coefficient of determination; 1 for a perfect fit of constant targets
fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    let actual_mean = mean(actual);
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - actual_mean).powi(2)).sum();

    if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    }
}
