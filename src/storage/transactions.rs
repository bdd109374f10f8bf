//! Transaction repository for CSV storage
//!
//! Manages loading and appending ledger entries to spese.csv. Rows are kept
//! in insertion order; the file is rewritten atomically on every append so
//! a failed write leaves the previous ledger intact.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::LedgerError;
use crate::models::{Money, MonthPeriod, Transaction, TransactionKind};

use super::file_io::{read_csv, write_csv_atomic};

/// Column order of the ledger file
pub const LEDGER_HEADER: [&str; 6] = [
    "data",
    "nome_transazione",
    "categoria",
    "importo",
    "tipo",
    "note",
];

/// On-disk shape of a ledger row
///
/// Older ledgers name the description column `nome_spesa` and have no
/// `tipo` column; such rows are read as expenses.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerRow {
    #[serde(rename = "data")]
    date: String,

    #[serde(rename = "nome_transazione", alias = "nome_spesa", default)]
    description: String,

    #[serde(rename = "categoria")]
    category: String,

    #[serde(rename = "importo")]
    amount: Money,

    #[serde(rename = "tipo", default)]
    kind: Option<String>,

    #[serde(default)]
    note: Option<String>,
}

impl LedgerRow {
    fn into_transaction(self, line: usize) -> Result<Transaction, LedgerError> {
        let date = parse_ledger_date(&self.date).ok_or_else(|| {
            LedgerError::Storage(format!("Invalid date '{}' at line {}", self.date, line))
        })?;

        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("") => TransactionKind::Expense,
            Some(label) => TransactionKind::from_ledger_label(label).ok_or_else(|| {
                LedgerError::Storage(format!("Unknown tipo '{}' at line {}", label, line))
            })?,
        };

        let txn = Transaction::new(date, self.description, self.category, self.amount, kind)
            .with_note(self.note.unwrap_or_default());

        if let Err(e) = txn.validate() {
            warn!(line, error = %e, "Ledger row violates invariants; keeping it as recorded");
        }

        Ok(txn)
    }
}

impl From<&Transaction> for LedgerRow {
    fn from(txn: &Transaction) -> Self {
        Self {
            date: txn.date.format("%Y-%m-%d").to_string(),
            description: txn.description.clone(),
            category: txn.category.clone(),
            amount: txn.amount,
            kind: Some(txn.kind.ledger_label().to_string()),
            note: Some(txn.note.clone()),
        }
    }
}

/// Accepts plain dates as well as timestamps written by other tools
fn parse_ledger_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

/// Repository for ledger persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<Vec<Transaction>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load transactions from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let rows: Vec<(usize, LedgerRow)> = read_csv(&self.path)?;

        let transactions = rows
            .into_iter()
            .map(|(line, row)| row.into_transaction(line))
            .collect::<Result<Vec<_>, _>>()?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        debug!(count = transactions.len(), path = %self.path.display(), "Loaded ledger");
        *data = transactions;

        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        write_rows(&self.path, &data)
    }

    /// Validate and append a transaction, persisting the whole ledger
    ///
    /// The write lock is held across the file write so concurrent appends
    /// are serialized. The in-memory ledger only changes once the file has
    /// been replaced.
    pub fn append(&self, txn: Transaction) -> Result<(), LedgerError> {
        txn.validate()
            .map_err(|e| LedgerError::InvalidTransaction(e.to_string()))?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut next = Vec::with_capacity(data.len() + 1);
        next.extend(data.iter().cloned());
        next.push(txn);

        write_rows(&self.path, &next)?;
        *data = next;

        Ok(())
    }

    /// Get all transactions in insertion order
    pub fn get_all(&self) -> Result<Vec<Transaction>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.clone())
    }

    /// Get transactions dated in a calendar month, in insertion order
    pub fn get_by_month(&self, period: MonthPeriod) -> Result<Vec<Transaction>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .iter()
            .filter(|t| period.contains(t.date))
            .cloned()
            .collect())
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

fn write_rows(path: &Path, transactions: &[Transaction]) -> Result<(), LedgerError> {
    let rows: Vec<LedgerRow> = transactions.iter().map(LedgerRow::from).collect();
    write_csv_atomic(path, &LEDGER_HEADER, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("spese.csv");
        let repo = TransactionRepository::new(path);
        (temp_dir, repo)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_append_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let lunch = Transaction::expense(date(2025, 1, 10), "Pranzo", "Ristorazione", Money::from_cents(1250))
            .with_note("con colleghi, ufficio");
        let salary = Transaction::income(date(2025, 1, 27), "Stipendio", "Stipendio", Money::from_units(2000));

        repo.append(lunch.clone()).unwrap();
        repo.append(salary.clone()).unwrap();

        let repo2 = TransactionRepository::new(temp_dir.path().join("spese.csv"));
        repo2.load().unwrap();
        assert_eq!(repo2.get_all().unwrap(), vec![lunch, salary]);
    }

    #[test]
    fn test_append_rejects_invalid() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let bad = Transaction::expense(date(2025, 1, 10), "x", "Stipendio", Money::from_units(5));
        let err = repo.append(bad).unwrap_err();
        assert!(err.is_invalid_transaction());

        let zero = Transaction::expense(date(2025, 1, 10), "x", "Varie", Money::zero());
        assert!(repo.append(zero).unwrap_err().is_invalid_transaction());

        assert_eq!(repo.count().unwrap(), 0);
        assert!(!temp_dir.path().join("spese.csv").exists());
    }

    #[test]
    fn test_get_by_month() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.append(Transaction::expense(date(2025, 1, 31), "a", "Varie", Money::from_units(1))).unwrap();
        repo.append(Transaction::expense(date(2025, 2, 1), "b", "Varie", Money::from_units(2))).unwrap();
        repo.append(Transaction::expense(date(2024, 2, 1), "c", "Varie", Money::from_units(3))).unwrap();

        let feb = repo.get_by_month(MonthPeriod::new(2025, 2).unwrap()).unwrap();
        assert_eq!(feb.len(), 1);
        assert_eq!(feb[0].description, "b");
    }

    #[test]
    fn test_loads_legacy_ledger() {
        let (temp_dir, repo) = create_test_repo();
        fs::write(
            temp_dir.path().join("spese.csv"),
            "data,nome_spesa,categoria,importo,note\n2024-11-05,Benzina,Trasporti,45.5,\n",
        )
        .unwrap();

        repo.load().unwrap();
        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].description, "Benzina");
        assert_eq!(all[0].kind, TransactionKind::Expense);
        assert_eq!(all[0].amount, Money::from_cents(4550));
        assert!(all[0].note.is_empty());
    }

    #[test]
    fn test_written_file_layout() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        repo.append(Transaction::income(date(2025, 3, 1), "Paghetta", "Famiglia", Money::from_units(50)))
            .unwrap();

        let contents = fs::read_to_string(temp_dir.path().join("spese.csv")).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("data,nome_transazione,categoria,importo,tipo,note"));
        assert!(lines.next().unwrap().starts_with("2025-03-01,Paghetta,Famiglia,50"));
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        const THREADS: u32 = 4;
        const PER_THREAD: u32 = 5;

        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        std::thread::scope(|scope| {
            for t in 0..THREADS {
                let repo = &repo;
                scope.spawn(move || {
                    for i in 0..PER_THREAD {
                        let txn = Transaction::expense(
                            date(2025, 1, 1 + t),
                            format!("t{}-{}", t, i),
                            "Varie",
                            Money::from_units(1 + i as i64),
                        );
                        repo.append(txn).unwrap();
                    }
                });
            }
        });

        let expected = (THREADS * PER_THREAD) as usize;
        assert_eq!(repo.count().unwrap(), expected);

        let reloaded = TransactionRepository::new(temp_dir.path().join("spese.csv"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), expected);
        assert!(!temp_dir.path().join("spese.csv.tmp").exists());
    }

    #[test]
    fn test_huge_amount_row_is_storage_error() {
        let (temp_dir, repo) = create_test_repo();
        fs::write(
            temp_dir.path().join("spese.csv"),
            "data,nome_transazione,categoria,importo,tipo,note\n2025-01-01,x,Varie,100000000000000000,spesa,\n",
        )
        .unwrap();

        assert!(repo.load().unwrap_err().is_storage());
    }

    #[test]
    fn test_invalid_date_is_storage_error() {
        let (temp_dir, repo) = create_test_repo();
        fs::write(
            temp_dir.path().join("spese.csv"),
            "data,nome_transazione,categoria,importo,tipo,note\nyesterday,x,Varie,1,spesa,\n",
        )
        .unwrap();

        let err = repo.load().unwrap_err();
        assert!(err.is_storage());
    }
}
