//! Claim lifecycle
//!
//! `ClaimLifecycle` owns every claim and is the only way to drive one
//! through its states. Each transition checks, in order: existence, that
//! the claim is still open, caller authority (holder or capability), state
//! preconditions, and only then touches the ledger. A transition that
//! fails leaves the claim, its escrow, and the journal unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use core_kernel::{Amount, ClaimId, PartyId};
use domain_capability::{Capability, CapabilityRegistry, Role};
use domain_ledger::LedgerPort;
use crate::claim::{ClaimReference, ClosedVia, InsuranceClaim};
use crate::error::ClaimError;
use crate::events::ClaimEvent;

/// Tunable transition rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleRules {
    /// When set, `edit_claim_id` refuses claims whose escrow is not funded
    pub edit_requires_funding: bool,
    /// When unset, transitions still run but no events are journaled
    pub record_events: bool,
}

impl Default for LifecycleRules {
    fn default() -> Self {
        Self {
            edit_requires_funding: false,
            record_events: true,
        }
    }
}

/// Owner of all claims and their escrows
#[derive(Debug, Default)]
pub struct ClaimLifecycle {
    claims: HashMap<ClaimId, InsuranceClaim>,
    journal: Vec<ClaimEvent>,
    rules: LifecycleRules,
}

impl ClaimLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: LifecycleRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn rules(&self) -> LifecycleRules {
        self.rules
    }

    /// Opens a claim held by `caller`
    ///
    /// Either reference may be `ClaimReference::UNDECLARED`.
    pub fn create(
        &mut self,
        caller: PartyId,
        insurer_id: ClaimReference,
        authority_id: ClaimReference,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<ClaimId, ClaimError> {
        let claim = InsuranceClaim::open(caller, insurer_id, authority_id, amount, now)?;
        let claim_id = claim.id();

        info!(claim_id = %claim_id, holder = %caller, amount = %amount, "Claim created");
        self.record(ClaimEvent::ClaimCreated {
            claim_id,
            holder: caller,
            insurer_id,
            authority_id,
            amount,
            timestamp: now,
        });
        self.claims.insert(claim_id, claim);
        Ok(claim_id)
    }

    /// Reassigns the authority identifier; holder only
    pub fn edit_claim_id(
        &mut self,
        claim_id: ClaimId,
        caller: PartyId,
        authority_id: ClaimReference,
        now: DateTime<Utc>,
    ) -> Result<(), ClaimError> {
        let requires_funding = self.rules.edit_requires_funding;
        let claim = self.open_claim_mut(claim_id)?;
        claim.ensure_holder(caller)?;
        if requires_funding {
            claim.ensure_funded()?;
        }

        let previous = claim.authority_id();
        claim.set_authority_id(authority_id, now);

        debug!(claim_id = %claim_id, previous = %previous, current = %authority_id, "Authority id changed");
        self.record(ClaimEvent::AuthorityIdChanged {
            claim_id,
            previous,
            current: authority_id,
            timestamp: now,
        });
        Ok(())
    }

    /// Funds the claim's escrow from `caller`'s account
    ///
    /// Exactly the claim amount is debited even when `offered` is larger.
    ///
    /// # Errors
    ///
    /// - `ClaimPending` if the escrow is already funded
    /// - `InsufficientFunds` if `offered` is below the claim amount
    /// - `Ledger` if the ledger refuses the debit
    pub fn fund<L: LedgerPort + ?Sized>(
        &mut self,
        claim_id: ClaimId,
        caller: PartyId,
        offered: Amount,
        ledger: &mut L,
        now: DateTime<Utc>,
    ) -> Result<Amount, ClaimError> {
        let claim = self.open_claim_mut(claim_id)?;
        claim.ensure_unfunded()?;

        let required = claim.amount();
        let funded = claim
            .escrow_mut()
            .fund(claim_id, ledger, caller, required, offered)
            .map_err(|e| {
                warn!(claim_id = %claim_id, funder = %caller, error = %e, "Escrow funding refused");
                e
            })?;
        claim.mark_pending(now);

        info!(claim_id = %claim_id, funder = %caller, amount = %funded, "Escrow funded");
        self.record(ClaimEvent::EscrowFunded {
            claim_id,
            funded_by: caller,
            amount: funded,
            timestamp: now,
        });
        Ok(funded)
    }

    /// Records the insurer's validation; requires an Insurer capability
    pub fn validate_with_insurer(
        &mut self,
        claim_id: ClaimId,
        caller: PartyId,
        capability: &Capability,
        registry: &CapabilityRegistry,
        now: DateTime<Utc>,
    ) -> Result<(), ClaimError> {
        let claim = self.open_claim_mut(claim_id)?;
        registry.check(capability, Role::Insurer, caller)?;

        if claim.record_insurer_validation(now) {
            debug!(claim_id = %claim_id, validator = %caller, "Insurer validated claim");
            self.record(ClaimEvent::InsurerValidated {
                claim_id,
                validator: caller,
                timestamp: now,
            });
        }
        Ok(())
    }

    /// Records the authority's validation; requires an Authority capability
    pub fn validate_by_authority(
        &mut self,
        claim_id: ClaimId,
        caller: PartyId,
        capability: &Capability,
        registry: &CapabilityRegistry,
        now: DateTime<Utc>,
    ) -> Result<(), ClaimError> {
        let claim = self.open_claim_mut(claim_id)?;
        registry.check(capability, Role::Authority, caller)?;

        if claim.record_authority_validation(now) {
            debug!(claim_id = %claim_id, validator = %caller, "Authority validated claim");
            self.record(ClaimEvent::AuthorityValidated {
                claim_id,
                validator: caller,
                timestamp: now,
            });
        }
        Ok(())
    }

    /// Pays the escrow to the holder and hands the claim to `insurer`
    ///
    /// Requires a declared authority identifier. Funding and validations
    /// are not required; an unfunded claim pays out zero.
    pub fn release_to_insurer<L: LedgerPort + ?Sized>(
        &mut self,
        claim_id: ClaimId,
        caller: PartyId,
        insurer: PartyId,
        ledger: &mut L,
        now: DateTime<Utc>,
    ) -> Result<Amount, ClaimError> {
        let claim = self.open_claim_mut(claim_id)?;
        claim.ensure_holder(caller)?;
        if !claim.authority_id().is_declared() {
            return Err(ClaimError::UndeclaredClaim(claim_id));
        }

        let payout = claim.escrow_mut().release(claim_id, ledger, caller)?;
        claim.transfer_to(insurer);
        claim.close(ClosedVia::Insurer, now);

        info!(claim_id = %claim_id, payee = %caller, insurer = %insurer, amount = %payout, "Claim released to insurer");
        self.record(ClaimEvent::ReleasedToInsurer {
            claim_id,
            payee: caller,
            insurer,
            amount: payout,
            timestamp: now,
        });
        Ok(payout)
    }

    /// Pays the escrow to the holder once both parties have validated
    pub fn release_to_authority<L: LedgerPort + ?Sized>(
        &mut self,
        claim_id: ClaimId,
        caller: PartyId,
        ledger: &mut L,
        now: DateTime<Utc>,
    ) -> Result<Amount, ClaimError> {
        let claim = self.open_claim_mut(claim_id)?;
        claim.ensure_holder(caller)?;
        claim.ensure_funded()?;
        if !claim.insurer_validation() {
            return Err(ClaimError::NotValidatedByInsurer(claim_id));
        }
        if !claim.authority_validation() {
            return Err(ClaimError::NotValidatedByAuthority(claim_id));
        }

        let payout = claim.escrow_mut().release(claim_id, ledger, caller)?;
        claim.close(ClosedVia::Authority, now);

        info!(claim_id = %claim_id, payee = %caller, amount = %payout, "Claim released to authority");
        self.record(ClaimEvent::ReleasedToAuthority {
            claim_id,
            payee: caller,
            amount: payout,
            timestamp: now,
        });
        Ok(payout)
    }

    /// Withdraws an unfunded claim; holder only
    pub fn revoke(
        &mut self,
        claim_id: ClaimId,
        caller: PartyId,
        now: DateTime<Utc>,
    ) -> Result<(), ClaimError> {
        let claim = self.open_claim_mut(claim_id)?;
        claim.ensure_holder(caller)?;
        claim.ensure_unfunded()?;

        claim.close(ClosedVia::Revoked, now);

        info!(claim_id = %claim_id, holder = %caller, "Claim revoked");
        self.record(ClaimEvent::ClaimRevoked { claim_id, timestamp: now });
        Ok(())
    }

    /// Returns a claim by id
    pub fn claim(&self, claim_id: ClaimId) -> Result<&InsuranceClaim, ClaimError> {
        self.claims
            .get(&claim_id)
            .ok_or(ClaimError::ClaimNotFound(claim_id))
    }

    /// Returns the ids of claims currently held by `holder`
    pub fn held_by(&self, holder: PartyId) -> Vec<ClaimId> {
        let mut ids: Vec<_> = self
            .claims
            .values()
            .filter(|c| c.holder() == holder)
            .map(|c| c.id())
            .collect();
        ids.sort_by_key(|id| *id.as_uuid());
        ids
    }

    /// Sum of every open escrow balance
    pub fn total_escrowed(&self) -> Amount {
        self.claims.values().map(|c| c.payout_balance()).sum()
    }

    pub fn events_for(&self, claim_id: ClaimId) -> Vec<&ClaimEvent> {
        self.journal
            .iter()
            .filter(|e| e.claim_id() == claim_id)
            .collect()
    }

    pub fn journal(&self) -> &[ClaimEvent] {
        &self.journal
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    fn open_claim_mut(&mut self, claim_id: ClaimId) -> Result<&mut InsuranceClaim, ClaimError> {
        let claim = self
            .claims
            .get_mut(&claim_id)
            .ok_or(ClaimError::ClaimNotFound(claim_id))?;
        claim.ensure_open()?;
        Ok(claim)
    }

    fn record(&mut self, event: ClaimEvent) {
        if self.rules.record_events {
            self.journal.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_ledger::InMemoryLedger;

    fn setup() -> (ClaimLifecycle, InMemoryLedger, PartyId, ClaimId) {
        let mut lifecycle = ClaimLifecycle::new();
        let mut ledger = InMemoryLedger::new();
        let holder = PartyId::new_v7();
        ledger.deposit(holder, Amount::new(1000)).unwrap();
        let claim_id = lifecycle
            .create(
                holder,
                ClaimReference::new(1),
                ClaimReference::new(2),
                Amount::new(500),
                Utc::now(),
            )
            .unwrap();
        (lifecycle, ledger, holder, claim_id)
    }

    #[test]
    fn test_second_funding_is_pending_error() {
        let (mut lifecycle, mut ledger, holder, id) = setup();
        lifecycle.fund(id, holder, Amount::new(500), &mut ledger, Utc::now()).unwrap();

        let err = lifecycle
            .fund(id, holder, Amount::new(500), &mut ledger, Utc::now())
            .unwrap_err();

        assert!(matches!(err, ClaimError::ClaimPending { .. }));
        assert_eq!(ledger.balance(holder).unwrap(), Amount::new(500));
    }

    #[test]
    fn test_closed_claim_rejects_everything() {
        let (mut lifecycle, mut ledger, holder, id) = setup();
        lifecycle.revoke(id, holder, Utc::now()).unwrap();

        assert!(matches!(
            lifecycle.fund(id, holder, Amount::new(500), &mut ledger, Utc::now()),
            Err(ClaimError::ClaimAlreadyProcessed(_))
        ));
        assert!(matches!(
            lifecycle.edit_claim_id(id, holder, ClaimReference::new(3), Utc::now()),
            Err(ClaimError::ClaimAlreadyProcessed(_))
        ));
        assert!(matches!(
            lifecycle.revoke(id, holder, Utc::now()),
            Err(ClaimError::ClaimAlreadyProcessed(_))
        ));
    }

    #[test]
    fn test_edit_requires_funding_rule() {
        let mut lifecycle = ClaimLifecycle::with_rules(LifecycleRules {
            edit_requires_funding: true,
            record_events: true,
        });
        let holder = PartyId::new_v7();
        let id = lifecycle
            .create(holder, ClaimReference::UNDECLARED, ClaimReference::UNDECLARED, Amount::new(5), Utc::now())
            .unwrap();

        let err = lifecycle
            .edit_claim_id(id, holder, ClaimReference::new(4), Utc::now())
            .unwrap_err();

        assert!(matches!(err, ClaimError::ClaimPending { .. }));
        assert!(!lifecycle.claim(id).unwrap().authority_id().is_declared());
    }

    #[test]
    fn test_disabled_journal_records_nothing() {
        let mut lifecycle = ClaimLifecycle::with_rules(LifecycleRules {
            edit_requires_funding: false,
            record_events: false,
        });
        let holder = PartyId::new_v7();
        let id = lifecycle
            .create(holder, ClaimReference::UNDECLARED, ClaimReference::UNDECLARED, Amount::new(5), Utc::now())
            .unwrap();
        lifecycle.revoke(id, holder, Utc::now()).unwrap();

        assert!(lifecycle.journal().is_empty());
        assert!(!lifecycle.claim(id).unwrap().is_active());
    }
}
