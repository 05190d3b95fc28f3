//! Ledger port
//!
//! The contract the claims engine requires from whatever system actually
//! holds currency.

use core_kernel::{Amount, DomainPort, PartyId};

use crate::error::LedgerError;
use crate::transaction::Reference;

/// Atomic debit/credit of native currency units
///
/// Each call either applies completely or fails without any effect.
pub trait LedgerPort: DomainPort {
    /// Removes `amount` from `source`
    ///
    /// # Errors
    ///
    /// - `InsufficientFunds` if `source` holds less than `amount`
    /// - `InvalidPosting` if `amount` is zero
    fn debit(&mut self, source: PartyId, amount: Amount, reference: &Reference) -> Result<(), LedgerError>;

    /// Adds `amount` to `destination`
    ///
    /// # Errors
    ///
    /// - `InvalidPosting` if `amount` is zero
    /// - `Calculation` if the destination balance would overflow
    fn credit(&mut self, destination: PartyId, amount: Amount, reference: &Reference) -> Result<(), LedgerError>;

    /// Returns the current balance of `party`; unknown parties hold zero
    fn balance(&self, party: PartyId) -> Result<Amount, LedgerError>;
}
