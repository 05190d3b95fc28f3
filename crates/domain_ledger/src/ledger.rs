//! In-memory ledger adapter
//!
//! Holds one balance per party and an append-only journal of postings.
//!
//! # Invariants
//!
//! - Balances never go below zero
//! - A failed posting changes neither balances nor the journal
//! - Sum of balances equals deposits plus credits minus debits

use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, warn};
use uuid::Uuid;

use core_kernel::{Amount, DomainPort, JournalEntryId, PartyId};
use crate::error::LedgerError;
use crate::ports::LedgerPort;
use crate::transaction::{JournalEntry, PostingType, Reference};

/// Reference type used for externally sourced deposits
pub const DEPOSIT_REFERENCE: &str = "deposit";

/// Ledger holding balances in memory
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: HashMap<PartyId, Amount>,
    journal: Vec<JournalEntry>,
}

impl InMemoryLedger {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `party` with currency entering the system from outside
    pub fn deposit(&mut self, party: PartyId, amount: Amount) -> Result<(), LedgerError> {
        let reference = Reference::new(DEPOSIT_REFERENCE, *party.as_uuid());
        self.credit(party, amount, &reference)
    }

    /// Returns the journal, oldest first
    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    /// Returns the journal entries made for one reference
    pub fn entries_for(&self, reference_id: &Uuid) -> Vec<&JournalEntry> {
        self.journal.iter().filter(|e| e.refers_to(reference_id)).collect()
    }

    /// Total debited on behalf of `reference_id`
    pub fn total_debited(&self, reference_id: &Uuid) -> Amount {
        self.total_of(reference_id, PostingType::Debit)
    }

    /// Total credited on behalf of `reference_id`
    pub fn total_credited(&self, reference_id: &Uuid) -> Amount {
        self.total_of(reference_id, PostingType::Credit)
    }

    /// Sum of every balance held in the ledger
    pub fn total_supply(&self) -> Amount {
        self.balances.values().sum()
    }

    fn total_of(&self, reference_id: &Uuid, posting_type: PostingType) -> Amount {
        self.journal
            .iter()
            .filter(|e| e.refers_to(reference_id) && e.posting_type == posting_type)
            .map(|e| e.amount)
            .sum()
    }

    fn current(&self, party: PartyId) -> Amount {
        self.balances.get(&party).copied().unwrap_or(Amount::ZERO)
    }

    fn record(&mut self, account: PartyId, amount: Amount, posting_type: PostingType, reference: &Reference, balance_after: Amount) {
        self.balances.insert(account, balance_after);
        self.journal.push(JournalEntry {
            id: JournalEntryId::new_v7(),
            account,
            amount,
            posting_type,
            reference: reference.clone(),
            balance_after,
            created_at: Utc::now(),
        });
    }
}

impl DomainPort for InMemoryLedger {}

impl LedgerPort for InMemoryLedger {
    fn debit(&mut self, source: PartyId, amount: Amount, reference: &Reference) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidPosting("debit of zero units".to_string()));
        }

        let available = self.current(source);
        let balance_after = available.checked_sub(amount).map_err(|_| {
            warn!(account = %source, requested = %amount, available = %available, "Debit refused");
            LedgerError::InsufficientFunds {
                account: source,
                requested: amount,
                available,
            }
        })?;

        self.record(source, amount, PostingType::Debit, reference, balance_after);
        debug!(account = %source, amount = %amount, reference = %reference.reference_id, "Debited");
        Ok(())
    }

    fn credit(&mut self, destination: PartyId, amount: Amount, reference: &Reference) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidPosting("credit of zero units".to_string()));
        }

        let balance_after = self.current(destination).checked_add(amount)?;

        self.record(destination, amount, PostingType::Credit, reference, balance_after);
        debug!(account = %destination, amount = %amount, reference = %reference.reference_id, "Credited");
        Ok(())
    }

    fn balance(&self, party: PartyId) -> Result<Amount, LedgerError> {
        Ok(self.current(party))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_then_debit() {
        let mut ledger = InMemoryLedger::new();
        let payer = PartyId::new();
        ledger.deposit(payer, Amount::new(1000)).unwrap();

        let reference = Reference::new("claim", Uuid::new_v4());
        ledger.debit(payer, Amount::new(400), &reference).unwrap();

        assert_eq!(ledger.balance(payer).unwrap(), Amount::new(600));
        assert_eq!(ledger.journal().len(), 2);
        assert_eq!(ledger.journal()[1].balance_after, Amount::new(600));
    }

    #[test]
    fn test_overdraw_leaves_no_trace() {
        let mut ledger = InMemoryLedger::new();
        let payer = PartyId::new();
        ledger.deposit(payer, Amount::new(100)).unwrap();

        let reference = Reference::new("claim", Uuid::new_v4());
        let err = ledger.debit(payer, Amount::new(101), &reference).unwrap_err();

        assert!(err.is_insufficient_funds());
        assert_eq!(ledger.balance(payer).unwrap(), Amount::new(100));
        assert_eq!(ledger.journal().len(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn debits_never_overdraw(start in 0u64..10_000, debits in prop::collection::vec(1u64..5_000, 0..10)) {
            let mut ledger = InMemoryLedger::new();
            let payer = PartyId::new();
            if start > 0 {
                ledger.deposit(payer, Amount::new(start)).unwrap();
            }
            let reference = Reference::new("claim", Uuid::new_v4());

            let mut expected = start;
            for units in debits {
                let result = ledger.debit(payer, Amount::new(units), &reference);
                prop_assert_eq!(result.is_ok(), units <= expected);
                if units <= expected {
                    expected -= units;
                }
                prop_assert_eq!(ledger.balance(payer).unwrap(), Amount::new(expected));
            }
        }

        #[test]
        fn transfers_preserve_supply(amounts in prop::collection::vec(1u64..1_000, 1..10)) {
            let mut ledger = InMemoryLedger::new();
            let from = PartyId::new();
            let to = PartyId::new();
            ledger.deposit(from, Amount::new(100_000)).unwrap();
            let supply = ledger.total_supply();
            let reference = Reference::new("claim", Uuid::new_v4());

            for units in amounts {
                ledger.debit(from, Amount::new(units), &reference).unwrap();
                ledger.credit(to, Amount::new(units), &reference).unwrap();
                prop_assert_eq!(ledger.total_supply(), supply);
            }
        }
    }
}
