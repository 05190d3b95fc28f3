//! Ledger domain errors

use thiserror::Error;

use core_kernel::{Amount, MoneyError, PartyId, PortError};

/// Errors that can occur when posting to the ledger
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The source account holds less than the requested debit
    #[error("Insufficient funds in {account}: requested {requested}, available {available}")]
    InsufficientFunds {
        account: PartyId,
        requested: Amount,
        available: Amount,
    },

    /// Postings must move a positive amount
    #[error("Invalid posting: {0}")]
    InvalidPosting(String),

    /// Balance arithmetic failed
    #[error("Calculation error: {0}")]
    Calculation(#[from] MoneyError),

    /// The ledger system itself failed
    #[error("Ledger unavailable: {0}")]
    Port(#[from] PortError),
}

impl LedgerError {
    /// Returns true if the failure is an underfunded source account
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, LedgerError::InsufficientFunds { .. })
    }
}
