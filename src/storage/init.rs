//! Storage initialization
//!
//! Handles first-run setup: an empty ledger with its header row and the
//! default budget configuration.

use tracing::info;

use crate::config::paths::LedgerPaths;
use crate::config::settings::BudgetConfig;
use crate::error::LedgerError;
use crate::models::Transaction;

use super::file_io::write_csv_atomic;
use super::transactions::LEDGER_HEADER;

/// Initialize storage for a fresh installation
///
/// Existing files are left untouched.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<(), LedgerError> {
    paths.ensure_directories()?;

    if !paths.ledger_file().exists() {
        write_csv_atomic::<Transaction, _>(paths.ledger_file(), &LEDGER_HEADER, &[])?;
        info!(path = %paths.ledger_file().display(), "Created empty ledger");
    }

    if !paths.config_file().exists() {
        BudgetConfig::default().save(paths)?;
        info!(path = %paths.config_file().display(), "Created default budget configuration");
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.is_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_files() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        initialize_storage(&paths).unwrap();
        assert!(!needs_initialization(&paths));

        let ledger = std::fs::read_to_string(paths.ledger_file()).unwrap();
        assert_eq!(ledger.trim(), LEDGER_HEADER.join(","));

        let config = BudgetConfig::load_or_create(&paths).unwrap();
        assert_eq!(config, BudgetConfig::default());
    }

    #[test]
    fn test_initialize_keeps_existing_config() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let mut config = BudgetConfig::default();
        config.goals.alert_threshold_pct = 60.0;
        config.save(&paths).unwrap();

        initialize_storage(&paths).unwrap();

        let loaded = BudgetConfig::load_or_create(&paths).unwrap();
        assert_eq!(loaded.alert_threshold(), 60.0);
    }
}
