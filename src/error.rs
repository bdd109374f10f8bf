//! Custom error types for Spendwise
//!
//! This module defines the error hierarchy for the ledger engine using
//! thiserror for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Spendwise operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The transaction violates a ledger invariant and was not appended
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Not enough history to train the forecast model
    #[error(
        "Insufficient data: {transactions} transaction(s) across {months} month(s) \
         (need at least 10 transactions and 3 months)"
    )]
    InsufficientData { transactions: usize, months: usize },

    /// Malformed or missing budget configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Analysis requested on an empty ledger
    #[error("No data available")]
    NoData,

    /// Underlying persistence failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Prediction requested before the model was trained
    #[error("Forecast model has not been trained")]
    ModelNotTrained,

    /// A categorizer could not produce a category
    #[error("Categorization failed: {0}")]
    Categorization(String),
}

impl LedgerError {
    /// Create an invalid transaction error
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidTransaction(reason.into())
    }

    /// Check if this is an invalid transaction error
    pub fn is_invalid_transaction(&self) -> bool {
        matches!(self, Self::InvalidTransaction(_))
    }

    /// Check if this is an insufficient data error
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }

    /// Check if this is a "no data" error
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    /// Check if this error comes from the persistence layer
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io(_) | Self::Csv(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for Spendwise operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_insufficient_data_error() {
        let err = LedgerError::InsufficientData {
            transactions: 9,
            months: 2,
        };
        assert!(err.is_insufficient_data());
        assert!(err.to_string().starts_with("Insufficient data: 9 transaction(s) across 2 month(s)"));
    }

    #[test]
    fn test_invalid_helper() {
        let err = LedgerError::invalid("amount must be positive");
        assert!(err.is_invalid_transaction());
        assert_eq!(
            err.to_string(),
            "Invalid transaction: amount must be positive"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LedgerError = io_err.into();
        assert!(matches!(err, LedgerError::Io(_)));
        assert!(err.is_storage());
    }
}
