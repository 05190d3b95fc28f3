//! Ledger Test Doubles
//!
//! Ledgers that refuse postings, for exercising failure atomicity.

use core_kernel::{Amount, DomainPort, PartyId, PortError};
use domain_ledger::{InMemoryLedger, LedgerError, LedgerPort, Reference};

/// A ledger whose backing system is down
#[derive(Debug, Default)]
pub struct UnavailableLedger;

impl DomainPort for UnavailableLedger {}

impl LedgerPort for UnavailableLedger {
    fn debit(&mut self, _source: PartyId, _amount: Amount, _reference: &Reference) -> Result<(), LedgerError> {
        Err(PortError::unavailable("ledger").into())
    }

    fn credit(&mut self, _destination: PartyId, _amount: Amount, _reference: &Reference) -> Result<(), LedgerError> {
        Err(PortError::unavailable("ledger").into())
    }

    fn balance(&self, _party: PartyId) -> Result<Amount, LedgerError> {
        Err(PortError::unavailable("ledger").into())
    }
}

/// An in-memory ledger that accepts debits but refuses every credit
#[derive(Debug, Default)]
pub struct CreditFailingLedger {
    inner: InMemoryLedger,
}

impl CreditFailingLedger {
    pub fn new(inner: InMemoryLedger) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &InMemoryLedger {
        &self.inner
    }
}

impl DomainPort for CreditFailingLedger {}

impl LedgerPort for CreditFailingLedger {
    fn debit(&mut self, source: PartyId, amount: Amount, reference: &Reference) -> Result<(), LedgerError> {
        self.inner.debit(source, amount, reference)
    }

    fn credit(&mut self, _destination: PartyId, _amount: Amount, _reference: &Reference) -> Result<(), LedgerError> {
        Err(PortError::internal("credit rejected").into())
    }

    fn balance(&self, party: PartyId) -> Result<Amount, LedgerError> {
        self.inner.balance(party)
    }
}
