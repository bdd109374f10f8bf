//! Backup manager for Spendwise
//!
//! A backup is a pair of timestamped copies of the ledger and the budget
//! configuration in the backup directory:
//!
//! - `spese_backup_YYYYMMDD_HHMMSS_mmm.csv`
//! - `config_backup_YYYYMMDD_HHMMSS_mmm.json`

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;
use tracing::info;

use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};

const LEDGER_PREFIX: &str = "spese_backup_";
const CONFIG_PREFIX: &str = "config_backup_";

/// Number of backups kept by default
pub const DEFAULT_RETENTION: usize = 30;

/// Metadata about a backup
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    /// Timestamp part shared by both files
    pub stamp: String,
    /// When the backup was created (local time)
    pub created_at: NaiveDateTime,
    pub ledger_path: PathBuf,
    /// Absent when the configuration copy was removed by hand
    pub config_path: Option<PathBuf>,
    /// Combined size in bytes
    pub size_bytes: u64,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    paths: LedgerPaths,
    retention: usize,
}

impl BackupManager {
    /// Create a new BackupManager keeping at most `retention` backups
    pub fn new(paths: LedgerPaths, retention: usize) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            paths,
            retention,
        }
    }

    /// Copy the ledger and the configuration into the backup directory
    pub fn create_backup(&self) -> LedgerResult<BackupInfo> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create backup directory: {}", e)))?;

        let now = Local::now().naive_local();
        let stamp = format!(
            "{}_{:03}",
            now.format("%Y%m%d_%H%M%S"),
            now.nanosecond() / 1_000_000
        );

        let ledger_path = self.backup_dir.join(format!("{}{}.csv", LEDGER_PREFIX, stamp));
        let config_path = self.backup_dir.join(format!("{}{}.json", CONFIG_PREFIX, stamp));

        copy_file(&self.paths.ledger_file(), &ledger_path)?;
        copy_file(&self.paths.config_file(), &config_path)?;

        info!(%stamp, dir = %self.backup_dir.display(), "Backup created");

        self.parse_backup_info(&ledger_path).ok_or_else(|| {
            LedgerError::Storage(format!("Backup {} could not be read back", stamp))
        })
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> LedgerResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| LedgerError::Io(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(info) = self.parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(backups)
    }

    fn parse_backup_info(&self, ledger_path: &Path) -> Option<BackupInfo> {
        let filename = ledger_path.file_name()?.to_string_lossy().to_string();
        let stamp = filename.strip_prefix(LEDGER_PREFIX)?.strip_suffix(".csv")?;
        let created_at = parse_backup_stamp(stamp)?;

        let config_path = self.backup_dir.join(format!("{}{}.json", CONFIG_PREFIX, stamp));
        let config_path = config_path.exists().then_some(config_path);

        let mut size_bytes = fs::metadata(ledger_path).ok()?.len();
        if let Some(path) = &config_path {
            size_bytes += fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        }

        Some(BackupInfo {
            stamp: stamp.to_string(),
            created_at,
            ledger_path: ledger_path.to_path_buf(),
            config_path,
            size_bytes,
        })
    }

    /// Delete the oldest backups beyond the retention limit
    pub fn enforce_retention(&self) -> LedgerResult<Vec<BackupInfo>> {
        let backups = self.list_backups()?;
        let mut deleted = Vec::new();

        for backup in backups.into_iter().skip(self.retention) {
            fs::remove_file(&backup.ledger_path)
                .map_err(|e| LedgerError::Io(format!("Failed to delete old backup: {}", e)))?;
            if let Some(path) = &backup.config_path {
                fs::remove_file(path)
                    .map_err(|e| LedgerError::Io(format!("Failed to delete old backup: {}", e)))?;
            }
            deleted.push(backup);
        }

        Ok(deleted)
    }

    /// Create a backup and then enforce the retention limit
    pub fn create_backup_with_retention(&self) -> LedgerResult<(BackupInfo, Vec<BackupInfo>)> {
        let created = self.create_backup()?;
        let deleted = self.enforce_retention()?;
        Ok((created, deleted))
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Get the most recent backup
    pub fn get_latest_backup(&self) -> LedgerResult<Option<BackupInfo>> {
        let backups = self.list_backups()?;
        Ok(backups.into_iter().next())
    }
}

fn copy_file(from: &Path, to: &Path) -> LedgerResult<()> {
    if !from.exists() {
        return Err(LedgerError::Storage(format!(
            "Cannot back up missing file {}",
            from.display()
        )));
    }

    fs::copy(from, to).map_err(|e| {
        LedgerError::Io(format!("Failed to copy {}: {}", from.display(), e))
    })?;
    Ok(())
}

/// Parse `YYYYMMDD_HHMMSS` with an optional `_mmm` millisecond suffix
fn parse_backup_stamp(stamp: &str) -> Option<NaiveDateTime> {
    let parts: Vec<&str> = stamp.split('_').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let (date_part, time_part) = (parts[0], parts[1]);
    let millis: u32 = match parts.get(2) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let date = NaiveDate::parse_from_str(date_part, "%Y%m%d").ok()?;
    let time = NaiveTime::parse_from_str(time_part, "%H%M%S").ok()?;
    let time = time.with_nanosecond(millis.checked_mul(1_000_000)?)?;

    Some(NaiveDateTime::new(date, time))
}
