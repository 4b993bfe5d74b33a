//! # Monetary Amounts
//!
//! [`Amount`] operates in smallest currency units (cents/paise) as an
//! unsigned integer. Only checked arithmetic is exposed — an overflow
//! surfaces as [`AmountError::Overflow`], never a silent wrap.
//!
//! ## Security Invariant
//!
//! Fractional and negative amounts cannot be constructed. Parsing
//! rejects anything that is not a plain base-10 unsigned integer, so a
//! malformed amount string cannot silently default to zero and mask
//! data corruption in settlement calculations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors arising from monetary amount handling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Arithmetic overflowed the smallest-unit integer range.
    #[error("amount arithmetic overflow: {0}")]
    Overflow(String),

    /// The amount string is not a plain unsigned integer.
    #[error("invalid monetary amount: \"{0}\"")]
    Invalid(String),
}

/// A monetary amount in smallest currency units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Amount(u64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from smallest currency units.
    pub fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// Access the raw smallest-unit value.
    pub fn units(&self) -> u64 {
        self.0
    }

    /// Whether this amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] if the sum exceeds `u64::MAX`.
    pub fn checked_add(self, other: Amount) -> Result<Amount, AmountError> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or_else(|| AmountError::Overflow(format!("{} + {}", self.0, other.0)))
    }

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Overflow`] if `other` exceeds `self`.
    pub fn checked_sub(self, other: Amount) -> Result<Amount, AmountError> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or_else(|| AmountError::Overflow(format!("{} - {}", self.0, other.0)))
    }

    /// Parse an amount from a plain base-10 unsigned integer string.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Invalid`] for anything else — signs,
    /// decimal points, separators, and empty strings are all rejected.
    pub fn parse(s: &str) -> Result<Amount, AmountError> {
        s.parse::<u64>()
            .map(Amount)
            .map_err(|_| AmountError::Invalid(s.to_string()))
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
