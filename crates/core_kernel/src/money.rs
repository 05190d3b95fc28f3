//! Native currency amounts
//!
//! The engine moves a single native currency measured in indivisible
//! units. `Amount` wraps the unit count and only exposes checked
//! arithmetic, so escrow and ledger code can never silently wrap.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use thiserror::Error;

/// Errors that can occur during amount arithmetic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Overflow adding {0} and {1}")]
    Overflow(Amount, Amount),

    #[error("Underflow subtracting {1} from {0}")]
    Underflow(Amount, Amount),
}

/// A non-negative quantity of native currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// The zero amount
    pub const ZERO: Amount = Amount(0);

    /// Creates an amount from a unit count
    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    /// Returns the unit count
    pub const fn units(&self) -> u64 {
        self.0
    }

    /// Returns true if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is strictly positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checked addition
    pub fn checked_add(&self, other: Amount) -> Result<Amount, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or(MoneyError::Overflow(*self, other))
    }

    /// Checked subtraction; fails rather than going below zero
    pub fn checked_sub(&self, other: Amount) -> Result<Amount, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or(MoneyError::Underflow(*self, other))
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Self(units)
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> u64 {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} units", self.0)
    }
}

/// Sums saturate at `u64::MAX`; use `checked_add` where overflow matters.
impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| Amount(acc.0.saturating_add(a.0)))
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn add_then_sub_restores_original(
            a in 0u64..1_000_000_000_000u64,
            b in 0u64..1_000_000_000_000u64
        ) {
            let sum = Amount::new(a).checked_add(Amount::new(b)).unwrap();
            prop_assert_eq!(sum.checked_sub(Amount::new(b)).unwrap(), Amount::new(a));
        }

        #[test]
        fn checked_sub_never_goes_negative(a in any::<u64>(), b in any::<u64>()) {
            let result = Amount::new(a).checked_sub(Amount::new(b));
            prop_assert_eq!(result.is_ok(), a >= b);
        }
    }
}
