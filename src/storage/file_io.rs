//! File I/O utilities with atomic writes
//!
//! Provides safe CSV file operations that won't corrupt the ledger on failure.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::LedgerError;

/// Read every record of a CSV file with a header row
///
/// Returns an empty vector if the file doesn't exist. Each record is
/// returned with its 1-based line number for error reporting.
pub fn read_csv<T, P>(path: P) -> Result<Vec<(usize, T)>, LedgerError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .map_err(|e| LedgerError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(BufReader::new(file));

    let mut records = Vec::new();
    for (index, result) in reader.deserialize().enumerate() {
        // Line 1 is the header
        let line = index + 2;
        let record: T = result.map_err(|e| {
            LedgerError::Storage(format!(
                "Failed to parse {} at line {}: {}",
                path.display(),
                line,
                e
            ))
        })?;
        records.push((line, record));
    }

    Ok(records)
}

/// Write a CSV file atomically (write to temp, then rename)
///
/// The header row is always written, even when there are no records, so an
/// empty ledger is still a well-formed file.
pub fn write_csv_atomic<T, P>(path: P, header: &[&str], records: &[T]) -> Result<(), LedgerError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            LedgerError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Create temp file in same directory (important for atomic rename)
    let temp_path = path.with_extension("csv.tmp");

    let result = write_records(&temp_path, header, records);
    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LedgerError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

fn write_records<T: Serialize>(
    temp_path: &Path,
    header: &[&str],
    records: &[T],
) -> Result<(), LedgerError> {
    let file = File::create(temp_path)
        .map_err(|e| LedgerError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));

    writer
        .write_record(header)
        .map_err(|e| LedgerError::Storage(format!("Failed to write header: {}", e)))?;

    for record in records {
        writer
            .serialize(record)
            .map_err(|e| LedgerError::Storage(format!("Failed to serialize record: {}", e)))?;
    }

    let mut buffered = writer
        .into_inner()
        .map_err(|e| LedgerError::Storage(format!("Failed to flush data: {}", e)))?;

    buffered
        .flush()
        .map_err(|e| LedgerError::Storage(format!("Failed to flush data: {}", e)))?;

    // Sync to disk before rename
    buffered
        .get_ref()
        .sync_all()
        .map_err(|e| LedgerError::Storage(format!("Failed to sync data: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestRow {
        name: String,
        value: i32,
    }

    const HEADER: [&str; 2] = ["name", "value"];

    #[test]
    fn test_read_nonexistent_returns_empty() {
        let temp_dir = TempDir::new().unwrap();
        let rows: Vec<(usize, TestRow)> = read_csv(temp_dir.path().join("missing.csv")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.csv");

        let data = vec![
            TestRow { name: "a".into(), value: 1 },
            TestRow { name: "b, with comma".into(), value: 2 },
        ];
        write_csv_atomic(&path, &HEADER, &data).unwrap();

        let loaded: Vec<(usize, TestRow)> = read_csv(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], (2, data[0].clone()));
        assert_eq!(loaded[1].1, data[1]);
    }

    #[test]
    fn test_empty_file_still_has_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.csv");

        write_csv_atomic::<TestRow, _>(&path, &HEADER, &[]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim(), "name,value");
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.csv");

        write_csv_atomic(&path, &HEADER, &[TestRow { name: "x".into(), value: 0 }]).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("test.csv.tmp").exists());
    }

    #[test]
    fn test_parse_error_reports_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.csv");
        fs::write(&path, "name,value\na,1\nb,not-a-number\n").unwrap();

        let err = read_csv::<TestRow, _>(&path).unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
        assert!(err.to_string().contains("line 3"));
    }

    #[derive(Debug, Deserialize)]
    struct AmountRow {
        #[allow(dead_code)]
        amount: crate::models::Money,
    }

    #[test]
    fn test_huge_amount_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("huge.csv");
        fs::write(&path, "amount\n12.5\n100000000000000000\n").unwrap();

        let err = read_csv::<AmountRow, _>(&path).unwrap_err();
        assert!(err.is_storage());
        assert!(err.to_string().contains("line 3"));
    }
}
