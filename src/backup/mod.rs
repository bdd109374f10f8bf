//! Backup system for Spendwise
//!
//! A backup snapshots both data files side by side in the `backup/`
//! directory under a shared timestamp. Older snapshots beyond the
//! retention count are pruned oldest first.
//!
//! # Example
//!
//! ```rust,ignore
//! use spendwise::backup::{BackupManager, DEFAULT_RETENTION};
//! use spendwise::config::LedgerPaths;
//!
//! let paths = LedgerPaths::new()?;
//! let manager = BackupManager::new(paths, DEFAULT_RETENTION);
//! let (created, pruned) = manager.create_backup_with_retention()?;
//! ```

mod manager;

pub use manager::{BackupInfo, BackupManager, DEFAULT_RETENTION};
