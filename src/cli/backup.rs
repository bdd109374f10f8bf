//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;

use crate::backup::{BackupManager, DEFAULT_RETENTION};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerResult;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Copy the ledger and budget configuration into the backup directory
    Create {
        /// Number of backups to keep; older ones are deleted
        #[arg(short, long, default_value_t = DEFAULT_RETENTION)]
        keep: usize,
    },

    /// List all available backups
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Delete the oldest backups beyond the retention limit
    Prune {
        /// Number of backups to keep
        #[arg(short, long, default_value_t = DEFAULT_RETENTION)]
        keep: usize,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(paths: &LedgerPaths, cmd: BackupCommands) -> LedgerResult<()> {
    match cmd {
        BackupCommands::Create { keep } => {
            let manager = BackupManager::new(paths.clone(), keep);

            println!("Creating backup...");
            let (backup, pruned) = manager.create_backup_with_retention()?;
            println!("Backup created: {}", backup.stamp);
            println!("  Ledger: {}", backup.ledger_path.display());
            if let Some(config) = &backup.config_path {
                println!("  Config: {}", config.display());
            }
            if !pruned.is_empty() {
                println!("Removed {} old backup(s).", pruned.len());
            }
        }

        BackupCommands::List { verbose } => {
            let manager = BackupManager::new(paths.clone(), DEFAULT_RETENTION);
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: spendwise backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            let now = chrono::Local::now().naive_local();
            for (i, backup) in backups.iter().enumerate() {
                let age = format_duration(now.signed_duration_since(backup.created_at));

                if verbose {
                    println!(
                        "{}. {}\n   Created: {}\n   Ledger:  {}\n   Config:  {}\n   Size:    {}\n   Age:     {}\n",
                        i + 1,
                        backup.stamp,
                        backup.created_at.format("%Y-%m-%d %H:%M:%S"),
                        backup.ledger_path.display(),
                        backup
                            .config_path
                            .as_ref()
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|| "(missing)".to_string()),
                        format_size(backup.size_bytes),
                        age,
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {})",
                        i + 1,
                        backup.stamp,
                        age,
                        format_size(backup.size_bytes),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Prune { keep, force } => {
            let manager = BackupManager::new(paths.clone(), keep);
            let backups = manager.list_backups()?;
            let to_delete = backups.len().saturating_sub(keep);

            if to_delete == 0 {
                println!("No backups to prune.");
                println!("Keeping up to {}; you have {}.", keep, backups.len());
                return Ok(());
            }

            println!("Prune Summary");
            println!("=============");
            println!("Current backups: {}", backups.len());
            println!("To be deleted:   {}", to_delete);
            println!();

            if !force {
                println!("To delete old backups, run again with --force flag:");
                println!("  spendwise backup prune --keep {} --force", keep);
                return Ok(());
            }

            let deleted = manager.enforce_retention()?;
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let seconds = duration.num_seconds().max(0);

    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m", seconds / 60)
    } else if seconds < 86400 {
        format!("{}h", seconds / 3600)
    } else {
        format!("{}d", seconds / 86400)
    }
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(chrono::Duration::seconds(42)), "42s");
        assert_eq!(format_duration(chrono::Duration::minutes(5)), "5m");
        assert_eq!(format_duration(chrono::Duration::hours(3)), "3h");
        assert_eq!(format_duration(chrono::Duration::days(2)), "2d");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
