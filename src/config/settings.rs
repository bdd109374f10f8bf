//! Budget configuration for Spendwise
//!
//! The configuration document keeps the field names of the original bot's
//! `config.json` so existing files keep loading:
//!
//! ```json
//! {
//!   "budget_mensile": { "Casa": 800, "Varie": 150 },
//!   "entrate_mensili": 2500,
//!   "obiettivi": { "risparmio_target": 500, "alert_soglia_percentuale": 80 }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::{is_valid_category, Money, TransactionKind};

/// Savings goals and alerting policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    /// Monthly savings target (advisory only)
    #[serde(rename = "risparmio_target", default)]
    pub savings_target: Money,

    /// Percentage of a category budget at which an alert is raised
    #[serde(rename = "alert_soglia_percentuale", default = "default_alert_threshold")]
    pub alert_threshold_pct: f64,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            savings_target: Money::from_units(500),
            alert_threshold_pct: default_alert_threshold(),
        }
    }
}

fn default_alert_threshold() -> f64 {
    80.0
}

/// Monthly budget limits per expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Expense category -> monthly limit
    #[serde(rename = "budget_mensile", default)]
    pub monthly_budgets: BTreeMap<String, Money>,

    /// Expected monthly income (informational)
    #[serde(rename = "entrate_mensili", default)]
    pub monthly_income: Money,

    #[serde(rename = "obiettivi", default)]
    pub goals: Goals,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        let monthly_budgets = [
            ("Trasporti", 200),
            ("Alimentari", 400),
            ("Ristorazione", 150),
            ("Casa", 800),
            ("Salute", 100),
            ("Svago", 200),
            ("Abbigliamento", 100),
            ("Varie", 150),
        ]
        .into_iter()
        .map(|(cat, limit)| (cat.to_string(), Money::from_units(limit)))
        .collect();

        Self {
            monthly_budgets,
            monthly_income: Money::from_units(2500),
            goals: Goals::default(),
        }
    }
}

impl BudgetConfig {
    /// Alert threshold as a percentage
    pub fn alert_threshold(&self) -> f64 {
        self.goals.alert_threshold_pct
    }

    /// Advisory savings target
    pub fn savings_target(&self) -> Money {
        self.goals.savings_target
    }

    /// Monthly limit for a category, if one is configured
    pub fn limit(&self, category: &str) -> Option<Money> {
        self.monthly_budgets.get(category).copied()
    }

    /// Set (or replace) the monthly limit for a category
    pub fn set_limit(&mut self, category: impl Into<String>, limit: Money) {
        self.monthly_budgets.insert(category.into(), limit);
    }

    /// Sum of all configured limits
    pub fn total_budget(&self) -> Money {
        self.monthly_budgets.values().sum()
    }

    /// Check that the configuration can be evaluated
    pub fn validate(&self) -> Result<(), LedgerError> {
        for (category, limit) in &self.monthly_budgets {
            if !is_valid_category(TransactionKind::Expense, category) {
                return Err(LedgerError::Config(format!(
                    "'{}' is not an expense category",
                    category
                )));
            }
            if limit.is_negative() {
                return Err(LedgerError::Config(format!(
                    "Budget for '{}' is negative ({})",
                    category, limit
                )));
            }
        }

        let threshold = self.goals.alert_threshold_pct;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(LedgerError::Config(format!(
                "Alert threshold must be a positive percentage (got {})",
                threshold
            )));
        }

        Ok(())
    }

    /// Load the configuration from disk, or return the defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let config_path = paths.config_file();

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(|e| {
                LedgerError::Storage(format!("Failed to read config file: {}", e))
            })?;

            let config: BudgetConfig = serde_json::from_str(&contents).map_err(|e| {
                LedgerError::Config(format!("Failed to parse config file: {}", e))
            })?;

            Ok(config)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(BudgetConfig::default())
        }
    }

    /// Save the configuration to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(paths.config_file(), contents)
            .map_err(|e| LedgerError::Storage(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = BudgetConfig::default();
        assert_eq!(config.monthly_budgets.len(), 8);
        assert_eq!(config.limit("Casa"), Some(Money::from_units(800)));
        assert_eq!(config.alert_threshold(), 80.0);
        assert_eq!(config.total_budget(), Money::from_units(2100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parses_original_document() {
        let json = r#"{
            "budget_mensile": {"Casa": 800, "Varie": 150.5},
            "entrate_mensili": 2500,
            "obiettivi": {"risparmio_target": 500, "alert_soglia_percentuale": 75}
        }"#;

        let config: BudgetConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.limit("Varie"), Some(Money::from_cents(15050)));
        assert_eq!(config.monthly_income, Money::from_units(2500));
        assert_eq!(config.alert_threshold(), 75.0);
    }

    #[test]
    fn test_missing_threshold_defaults_to_80() {
        let json = r#"{"budget_mensile": {"Casa": 800}, "obiettivi": {}}"#;
        let config: BudgetConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.alert_threshold(), 80.0);
        assert!(config.savings_target().is_zero());
    }

    #[test]
    fn test_validate_rejects_malformed() {
        let mut config = BudgetConfig::default();
        config.set_limit("Stipendio", Money::from_units(10));
        assert!(matches!(config.validate(), Err(LedgerError::Config(_))));

        let mut config = BudgetConfig::default();
        config.set_limit("Casa", Money::from_units(-1));
        assert!(config.validate().is_err());

        let mut config = BudgetConfig::default();
        config.goals.alert_threshold_pct = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut config = BudgetConfig::default();
        config.set_limit("Svago", Money::from_units(50));
        config.save(&paths).unwrap();

        let raw = std::fs::read_to_string(paths.config_file()).unwrap();
        assert!(raw.contains("budget_mensile"));
        assert!(raw.contains("alert_soglia_percentuale"));

        let loaded = BudgetConfig::load_or_create(&paths).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unparseable_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.config_file(), "not json").unwrap();

        let err = BudgetConfig::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }
}
