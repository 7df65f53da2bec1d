//! Commission percent constrained to the closed range [0, 100].
//!
//! Every percent stored in the forest goes through `try_new`, so a value read
//! back from the store is trusted to be in range.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A percent value outside [0, 100].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("percent {0} is outside the range 0..=100")]
pub struct PercentOutOfRange(pub Decimal);

/// Commission percent, guaranteed to be within [0, 100].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Percent(Decimal);

impl Percent {
    /// Validate and wrap a decimal percent.
    ///
    /// # Errors
    /// Returns `PercentOutOfRange` if the value is negative or above 100.
    pub fn try_new(value: Decimal) -> Result<Self, PercentOutOfRange> {
        if value.is_negative() || value > Decimal::hundred() {
            return Err(PercentOutOfRange(value));
        }
        Ok(Percent(value))
    }

    /// Parse a percent from its canonical string form.
    ///
    /// # Errors
    /// Returns `PercentOutOfRange` for unparsable or out-of-range input.
    pub fn from_str_canonical(s: &str) -> Result<Self, PercentOutOfRange> {
        let value =
            Decimal::from_str_canonical(s).map_err(|_| PercentOutOfRange(Decimal::zero()))?;
        Self::try_new(value)
    }

    /// The zero percent.
    pub fn zero() -> Self {
        Percent(Decimal::zero())
    }

    /// Get the underlying decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Canonical string form, suitable for persistence.
    pub fn to_canonical_string(&self) -> String {
        self.0.to_canonical_string()
    }

    /// Subtract a margin, flooring at zero.
    ///
    /// Used when a new member's percent is derived from its referrer's.
    pub fn saturating_sub(&self, margin: Percent) -> Percent {
        let diff = self.0 - margin.0;
        if diff.is_negative() {
            Percent::zero()
        } else {
            Percent(diff)
        }
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(s: &str) -> Percent {
        Percent::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_try_new_accepts_bounds() {
        assert!(Percent::try_new(Decimal::zero()).is_ok());
        assert!(Percent::try_new(Decimal::hundred()).is_ok());
        assert!(Percent::from_str_canonical("42.5").is_ok());
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert!(Percent::from_str_canonical("-0.1").is_err());
        assert!(Percent::from_str_canonical("100.1").is_err());
        assert!(Percent::from_str_canonical("abc").is_err());
    }

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        assert_eq!(pct("10").saturating_sub(pct("3")), pct("7"));
        assert_eq!(pct("2").saturating_sub(pct("5")), Percent::zero());
    }

    #[test]
    fn test_ordering() {
        assert!(pct("5") < pct("8"));
        assert!(pct("100") > pct("99.999"));
    }
}
