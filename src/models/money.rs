//! Money type for representing ledger amounts
//!
//! Internally stores amounts in hundredths of the ledger unit (i64) to avoid
//! floating-point drift when summing. Serializes as a plain decimal number
//! so the CSV ledger and JSON reports carry human-readable amounts.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A currency-agnostic amount stored as hundredths of the ledger unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from hundredths
    ///
    /// # Examples
    /// ```
    /// use spendwise::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Create a Money amount from a decimal value, rounding to the nearest hundredth
    pub fn from_major(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in hundredths
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the amount as a decimal value (for statistics)
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the hundredths portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Create a Money amount from whole units, or `None` on overflow
    pub const fn checked_from_units(units: i64) -> Option<Self> {
        match units.checked_mul(100) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "10.50", "10,50", "-10.50", "€10.50", "$10.50" and "10".
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        let s = s
            .strip_prefix('€')
            .or_else(|| s.strip_prefix('$'))
            .unwrap_or(s)
            .trim();

        // Decimal comma is common in hand-typed amounts
        let normalized = s.replace(',', ".");
        let invalid = || MoneyParseError::InvalidFormat(s.to_string());
        let out_of_range = || MoneyParseError::OutOfRange(s.to_string());

        let (whole, frac) = normalized.split_once('.').unwrap_or((normalized.as_str(), ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        // Digits only: a second sign ("--5", "-+5") is rejected here
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| out_of_range())?
        };

        // Pad or truncate to 2 digits
        let cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac[..2].parse().map_err(|_| invalid())?,
        };

        let total = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .ok_or_else(out_of_range)?;

        Ok(Self(if negative { -total } else { total }))
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Pad as a whole so column widths in reports apply
        let text = if self.is_negative() {
            format!("-{}.{:02}", self.units().abs(), self.cents_part())
        } else {
            format!("{}.{:02}", self.units(), self.cents_part())
        };
        f.pad(&text)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_major())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoneyVisitor;

        impl Visitor<'_> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a decimal amount")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
                if v.is_finite() && (v * 100.0).abs() < i64::MAX as f64 {
                    Ok(Money::from_major(v))
                } else {
                    Err(E::custom("amount is not a finite number in range"))
                }
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                Money::checked_from_units(v).ok_or_else(|| E::custom("amount out of range"))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(Money::checked_from_units)
                    .ok_or_else(|| E::custom("amount out of range"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
                Money::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid amount: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
