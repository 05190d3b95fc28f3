//! Claim aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{Amount, ClaimId, PartyId};
use crate::error::{ClaimError, PendingReason};
use crate::escrow::Escrow;

/// An identifier assigned to a claim by the insurer or the authority
///
/// Zero is the placeholder for "not yet assigned".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimReference(u64);

impl ClaimReference {
    /// The placeholder reference
    pub const UNDECLARED: ClaimReference = ClaimReference(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Returns true if a real identifier has been assigned
    pub const fn is_declared(&self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for ClaimReference {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ClaimReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_declared() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("undeclared")
        }
    }
}

/// Which terminal transition closed a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClosedVia {
    /// Holder took the payout and handed the record to the insurer
    Insurer,
    /// Holder took the payout after insurer and authority validation
    Authority,
    /// Holder withdrew the claim before it was funded
    Revoked,
}

/// State machine view of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    Open {
        insurer_validation: bool,
        authority_validation: bool,
        insurer_is_pending: bool,
    },
    Closed {
        via: ClosedVia,
    },
}

impl ClaimStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, ClaimStatus::Open { .. })
    }
}

/// A claim with its escrowed payout
///
/// # Invariants
///
/// - `amount` is positive and fixed at creation
/// - The escrow balance only changes through lifecycle transitions
/// - `insurer_is_pending` and both validation flags only go false -> true
/// - Once `is_active` is false the claim accepts no further mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceClaim {
    id: ClaimId,
    holder: PartyId,
    insurer_id: ClaimReference,
    authority_id: ClaimReference,
    amount: Amount,
    escrow: Escrow,
    insurer_is_pending: bool,
    insurer_validation: bool,
    authority_validation: bool,
    is_active: bool,
    closed_via: Option<ClosedVia>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InsuranceClaim {
    /// Opens a new claim held by `holder`
    ///
    /// # Errors
    ///
    /// `InvalidAmount` if `amount` is zero.
    pub fn open(
        holder: PartyId,
        insurer_id: ClaimReference,
        authority_id: ClaimReference,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<Self, ClaimError> {
        if amount.is_zero() {
            return Err(ClaimError::InvalidAmount);
        }

        Ok(Self {
            id: ClaimId::new_v7(),
            holder,
            insurer_id,
            authority_id,
            amount,
            escrow: Escrow::default(),
            insurer_is_pending: false,
            insurer_validation: false,
            authority_validation: false,
            is_active: true,
            closed_via: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> ClaimId {
        self.id
    }

    /// Current holder; becomes the insurer after `release_to_insurer`
    pub fn holder(&self) -> PartyId {
        self.holder
    }

    pub fn insurer_id(&self) -> ClaimReference {
        self.insurer_id
    }

    pub fn authority_id(&self) -> ClaimReference {
        self.authority_id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Units currently held in escrow
    pub fn payout_balance(&self) -> Amount {
        self.escrow.balance()
    }

    pub fn insurer_is_pending(&self) -> bool {
        self.insurer_is_pending
    }

    pub fn insurer_validation(&self) -> bool {
        self.insurer_validation
    }

    pub fn authority_validation(&self) -> bool {
        self.authority_validation
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn closed_via(&self) -> Option<ClosedVia> {
        self.closed_via
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the state machine view
    pub fn status(&self) -> ClaimStatus {
        match self.closed_via {
            Some(via) if !self.is_active => ClaimStatus::Closed { via },
            _ => ClaimStatus::Open {
                insurer_validation: self.insurer_validation,
                authority_validation: self.authority_validation,
                insurer_is_pending: self.insurer_is_pending,
            },
        }
    }

    pub(crate) fn ensure_open(&self) -> Result<(), ClaimError> {
        if !self.is_active {
            return Err(ClaimError::ClaimAlreadyProcessed(self.id));
        }
        Ok(())
    }

    pub(crate) fn ensure_holder(&self, caller: PartyId) -> Result<(), ClaimError> {
        if caller != self.holder {
            return Err(ClaimError::NotPolicyHolder {
                claim_id: self.id,
                caller,
            });
        }
        Ok(())
    }

    pub(crate) fn ensure_funded(&self) -> Result<(), ClaimError> {
        if !self.insurer_is_pending {
            return Err(ClaimError::ClaimPending {
                claim_id: self.id,
                reason: PendingReason::NotFunded,
            });
        }
        Ok(())
    }

    pub(crate) fn ensure_unfunded(&self) -> Result<(), ClaimError> {
        if self.insurer_is_pending {
            return Err(ClaimError::ClaimPending {
                claim_id: self.id,
                reason: PendingReason::AlreadyFunded,
            });
        }
        Ok(())
    }

    pub(crate) fn escrow_mut(&mut self) -> &mut Escrow {
        &mut self.escrow
    }

    pub(crate) fn set_authority_id(&mut self, authority_id: ClaimReference, now: DateTime<Utc>) {
        self.authority_id = authority_id;
        self.updated_at = now;
    }

    pub(crate) fn mark_pending(&mut self, now: DateTime<Utc>) {
        self.insurer_is_pending = true;
        self.updated_at = now;
    }

    /// Returns true if the flag changed
    pub(crate) fn record_insurer_validation(&mut self, now: DateTime<Utc>) -> bool {
        let changed = !self.insurer_validation;
        self.insurer_validation = true;
        if changed {
            self.updated_at = now;
        }
        changed
    }

    /// Returns true if the flag changed
    pub(crate) fn record_authority_validation(&mut self, now: DateTime<Utc>) -> bool {
        let changed = !self.authority_validation;
        self.authority_validation = true;
        if changed {
            self.updated_at = now;
        }
        changed
    }

    pub(crate) fn transfer_to(&mut self, new_holder: PartyId) {
        self.holder = new_holder;
    }

    pub(crate) fn close(&mut self, via: ClosedVia, now: DateTime<Utc>) {
        self.is_active = false;
        self.closed_via = Some(via);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_claim() -> InsuranceClaim {
        InsuranceClaim::open(
            PartyId::new(),
            ClaimReference::new(7),
            ClaimReference::UNDECLARED,
            Amount::new(500),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_claim_is_open_and_unfunded() {
        let claim = open_claim();

        assert!(claim.is_active());
        assert_eq!(claim.payout_balance(), Amount::ZERO);
        assert_eq!(
            claim.status(),
            ClaimStatus::Open {
                insurer_validation: false,
                authority_validation: false,
                insurer_is_pending: false,
            }
        );
        assert!(!claim.authority_id().is_declared());
        assert!(claim.insurer_id().is_declared());
    }

    #[test]
    fn test_zero_amount_is_rejected() {
        let result = InsuranceClaim::open(
            PartyId::new(),
            ClaimReference::UNDECLARED,
            ClaimReference::UNDECLARED,
            Amount::ZERO,
            Utc::now(),
        );
        assert!(matches!(result, Err(ClaimError::InvalidAmount)));
    }

    #[test]
    fn test_validation_flags_report_first_change_only() {
        let mut claim = open_claim();
        assert!(claim.record_insurer_validation(Utc::now()));
        assert!(!claim.record_insurer_validation(Utc::now()));
        assert!(claim.insurer_validation());
    }

    #[test]
    fn test_closed_status() {
        let mut claim = open_claim();
        claim.close(ClosedVia::Revoked, Utc::now());

        assert_eq!(claim.status(), ClaimStatus::Closed { via: ClosedVia::Revoked });
        assert!(matches!(claim.ensure_open(), Err(ClaimError::ClaimAlreadyProcessed(_))));
    }

    #[test]
    fn test_claim_reference_display() {
        assert_eq!(ClaimReference::new(9).to_string(), "#9");
        assert_eq!(ClaimReference::UNDECLARED.to_string(), "undeclared");
    }
}
