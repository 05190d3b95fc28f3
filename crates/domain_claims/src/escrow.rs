//! Claim escrow
//!
//! Each claim carries an escrow balance. Funding pulls exactly the claim
//! amount from the funder's ledger account; release pushes the whole
//! balance to one destination. Both calls are crate-private so that only
//! lifecycle transitions can move escrowed value.
//!
//! The ledger is always called before the escrow balance changes: if the
//! ledger refuses, the escrow is left exactly as it was.

use serde::{Deserialize, Serialize};

use core_kernel::{Amount, ClaimId, PartyId};
use domain_ledger::{LedgerError, LedgerPort, Reference};
use crate::error::ClaimError;

/// Reference type attached to every ledger posting made by an escrow
pub const CLAIM_REFERENCE: &str = "claim";

/// Units held on behalf of one claim
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escrow {
    balance: Amount,
}

impl Escrow {
    /// Returns the held balance
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Moves exactly `required` from `source` into escrow
    ///
    /// `offered` is what the funder put forward; anything above `required`
    /// stays in the funder's account.
    ///
    /// # Errors
    ///
    /// - `InsufficientFunds` if `offered < required`
    /// - `Ledger(InsufficientFunds)` if `source` holds less than `required`
    pub(crate) fn fund<L: LedgerPort + ?Sized>(
        &mut self,
        claim_id: ClaimId,
        ledger: &mut L,
        source: PartyId,
        required: Amount,
        offered: Amount,
    ) -> Result<Amount, ClaimError> {
        if offered < required {
            return Err(ClaimError::InsufficientFunds {
                claim_id,
                required,
                offered,
            });
        }

        let new_balance = self
            .balance
            .checked_add(required)
            .map_err(LedgerError::from)?;

        ledger.debit(source, required, &reference(claim_id))?;
        self.balance = new_balance;
        Ok(required)
    }

    /// Pays the whole balance to `destination` and empties the escrow
    ///
    /// An empty escrow releases nothing and makes no ledger call.
    pub(crate) fn release<L: LedgerPort + ?Sized>(
        &mut self,
        claim_id: ClaimId,
        ledger: &mut L,
        destination: PartyId,
    ) -> Result<Amount, ClaimError> {
        let payout = self.balance;
        if payout.is_positive() {
            ledger.credit(destination, payout, &reference(claim_id))?;
        }
        self.balance = Amount::ZERO;
        Ok(payout)
    }
}

fn reference(claim_id: ClaimId) -> Reference {
    Reference::new(CLAIM_REFERENCE, claim_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_ledger::InMemoryLedger;

    #[test]
    fn test_fund_takes_exactly_the_required_amount() {
        let mut ledger = InMemoryLedger::new();
        let funder = PartyId::new();
        ledger.deposit(funder, Amount::new(1000)).unwrap();
        let mut escrow = Escrow::default();

        let moved = escrow
            .fund(ClaimId::new(), &mut ledger, funder, Amount::new(500), Amount::new(800))
            .unwrap();

        assert_eq!(moved, Amount::new(500));
        assert_eq!(escrow.balance(), Amount::new(500));
        assert_eq!(ledger.balance(funder).unwrap(), Amount::new(500));
    }

    #[test]
    fn test_short_offer_touches_nothing() {
        let mut ledger = InMemoryLedger::new();
        let funder = PartyId::new();
        ledger.deposit(funder, Amount::new(1000)).unwrap();
        let mut escrow = Escrow::default();

        let err = escrow
            .fund(ClaimId::new(), &mut ledger, funder, Amount::new(500), Amount::new(499))
            .unwrap_err();

        assert!(matches!(err, ClaimError::InsufficientFunds { .. }));
        assert_eq!(escrow.balance(), Amount::ZERO);
        assert_eq!(ledger.balance(funder).unwrap(), Amount::new(1000));
    }

    #[test]
    fn test_underfunded_source_touches_nothing() {
        let mut ledger = InMemoryLedger::new();
        let funder = PartyId::new();
        ledger.deposit(funder, Amount::new(100)).unwrap();
        let mut escrow = Escrow::default();

        let err = escrow
            .fund(ClaimId::new(), &mut ledger, funder, Amount::new(500), Amount::new(500))
            .unwrap_err();

        assert!(err.is_insufficient_funds());
        assert_eq!(escrow.balance(), Amount::ZERO);
    }

    #[test]
    fn test_release_empties_escrow() {
        let mut ledger = InMemoryLedger::new();
        let funder = PartyId::new();
        let payee = PartyId::new();
        ledger.deposit(funder, Amount::new(500)).unwrap();
        let claim_id = ClaimId::new();
        let mut escrow = Escrow::default();
        escrow
            .fund(claim_id, &mut ledger, funder, Amount::new(500), Amount::new(500))
            .unwrap();

        let paid = escrow.release(claim_id, &mut ledger, payee).unwrap();

        assert_eq!(paid, Amount::new(500));
        assert_eq!(escrow.balance(), Amount::ZERO);
        assert_eq!(ledger.balance(payee).unwrap(), Amount::new(500));
        assert_eq!(ledger.total_debited(claim_id.as_uuid()), ledger.total_credited(claim_id.as_uuid()));
    }

    #[test]
    fn test_release_of_empty_escrow_posts_nothing() {
        let mut ledger = InMemoryLedger::new();
        let mut escrow = Escrow::default();

        let paid = escrow.release(ClaimId::new(), &mut ledger, PartyId::new()).unwrap();

        assert_eq!(paid, Amount::ZERO);
        assert!(ledger.journal().is_empty());
    }
}
