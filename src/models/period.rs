//! Calendar month periods
//!
//! Budgets and aggregates are always monthly; this type names a month and
//! knows how to parse, display and step through months.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month (e.g., "2025-01")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthPeriod {
    pub year: i32,
    pub month: u32,
}

impl MonthPeriod {
    /// Create a month period
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodParseError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodParseError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Get the current month in local time
    pub fn current() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    /// First day of the month
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Last day of the month (inclusive)
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.next().start_date().map(|d| d - Duration::days(1))
    }

    /// Check if a date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Get the next month
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Get the previous month
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Parse a "YYYY-MM" string
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();

        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| PeriodParseError::InvalidFormat(s.to_string()))?;

        let year: i32 = year
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;

        Self::new(year, month)
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::InvalidFormat(s) => {
                write!(f, "Invalid month format: {} (expected YYYY-MM)", s)
            }
            PeriodParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
        }
    }
}

impl std::error::Error for PeriodParseError {}
