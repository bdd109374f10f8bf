//! Path management for Spendwise
//!
//! Provides XDG-compliant path resolution for the ledger, the budget
//! configuration and backups.
//!
//! ## Path Resolution Order
//!
//! 1. `SPENDWISE_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/spendwise` or `~/.config/spendwise`
//! 3. Windows: `%APPDATA%\spendwise`

use std::path::PathBuf;

use crate::error::LedgerError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "SPENDWISE_DATA_DIR";

/// Manages all paths used by Spendwise
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    /// Base directory for all Spendwise data
    base_dir: PathBuf,
}

impl LedgerPaths {
    /// Create a new LedgerPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, LedgerError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create LedgerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the backup directory
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backup")
    }

    /// Get the path to the transaction ledger (CSV)
    pub fn ledger_file(&self) -> PathBuf {
        self.base_dir.join("spese.csv")
    }

    /// Get the path to the budget configuration (JSON)
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), LedgerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| LedgerError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if the ledger has been initialized (both files exist)
    pub fn is_initialized(&self) -> bool {
        self.ledger_file().exists() && self.config_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, LedgerError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME")
                .map_err(|_| LedgerError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("spendwise"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, LedgerError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| LedgerError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("spendwise"))
}
