//! Storage layer for Spendwise
//!
//! Provides the CSV-backed ledger with atomic writes, the budget
//! configuration document and first-run initialization.

pub mod file_io;
pub mod init;
pub mod transactions;

pub use file_io::{read_csv, write_csv_atomic};
pub use init::initialize_storage;
pub use transactions::{TransactionRepository, LEDGER_HEADER};

use std::sync::RwLock;

use tracing::{debug, info};

use crate::config::paths::LedgerPaths;
use crate::config::settings::BudgetConfig;
use crate::error::LedgerError;
use crate::models::{MonthPeriod, Transaction};

/// Main storage coordinator: the ledger plus its budget configuration
pub struct Storage {
    paths: LedgerPaths,
    pub transactions: TransactionRepository,
    config: RwLock<BudgetConfig>,
}

impl Storage {
    /// Create a new Storage instance without touching the ledger files
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.ledger_file()),
            config: RwLock::new(BudgetConfig::default()),
            paths,
        })
    }

    /// Open the ledger, creating the files on first use, and load everything
    pub fn open(paths: LedgerPaths) -> Result<Self, LedgerError> {
        initialize_storage(&paths)?;
        let mut storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), LedgerError> {
        self.transactions.load()?;

        // Limits are validated when a budget is evaluated, so a bad entry
        // leaves the ledger usable.
        let config = BudgetConfig::load_or_create(&self.paths)?;
        *self
            .config
            .get_mut()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire config lock: {}", e)))? =
            config;

        info!(
            transactions = self.transactions.count()?,
            base_dir = %self.paths.base_dir().display(),
            "Ledger loaded"
        );
        Ok(())
    }

    /// Validate and append a transaction to the ledger
    pub fn append(&self, txn: Transaction) -> Result<(), LedgerError> {
        debug!(date = %txn.date, category = %txn.category, amount = %txn.amount, "Appending transaction");
        self.transactions.append(txn)
    }

    /// All transactions in insertion order
    pub fn all_transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        self.transactions.get_all()
    }

    /// Transactions dated in the given month
    pub fn transactions_in(&self, period: MonthPeriod) -> Result<Vec<Transaction>, LedgerError> {
        self.transactions.get_by_month(period)
    }

    /// Snapshot of the current budget configuration
    pub fn budget_config(&self) -> Result<BudgetConfig, LedgerError> {
        let config = self
            .config
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire config lock: {}", e)))?;
        Ok(config.clone())
    }

    /// Validate, persist and install a new budget configuration
    pub fn update_budget_config(&self, new_config: BudgetConfig) -> Result<(), LedgerError> {
        new_config.validate()?;

        let mut config = self
            .config
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire config lock: {}", e)))?;

        new_config.save(&self.paths)?;
        *config = new_config;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
