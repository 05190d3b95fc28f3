//! Claims domain errors

use thiserror::Error;

use core_kernel::{Amount, ClaimId, PartyId};
use domain_capability::CapabilityError;
use domain_ledger::LedgerError;

/// Why a pending-state precondition failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingReason {
    /// The operation requires a funded escrow
    NotFunded,
    /// The operation requires an unfunded claim
    AlreadyFunded,
}

impl std::fmt::Display for PendingReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PendingReason::NotFunded => f.write_str("escrow not funded"),
            PendingReason::AlreadyFunded => f.write_str("escrow already funded"),
        }
    }
}

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Invalid amount: claim amount must be greater than zero")]
    InvalidAmount,

    #[error("{caller} is not the holder of claim {claim_id}")]
    NotPolicyHolder { claim_id: ClaimId, caller: PartyId },

    #[error("Insufficient funds for claim {claim_id}: required {required}, offered {offered}")]
    InsufficientFunds {
        claim_id: ClaimId,
        required: Amount,
        offered: Amount,
    },

    #[error("Claim already processed: {0}")]
    ClaimAlreadyProcessed(ClaimId),

    #[error("Claim {claim_id} pending precondition not met: {reason}")]
    ClaimPending { claim_id: ClaimId, reason: PendingReason },

    #[error("Claim {0} has no declared authority identifier")]
    UndeclaredClaim(ClaimId),

    #[error("Claim {0} has not been validated by the insurer")]
    NotValidatedByInsurer(ClaimId),

    #[error("Claim {0} has not been validated by the authority")]
    NotValidatedByAuthority(ClaimId),

    #[error("Claim not found: {0}")]
    ClaimNotFound(ClaimId),

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ClaimError {
    /// Returns true if the failure is an underfunded offer or source account
    pub fn is_insufficient_funds(&self) -> bool {
        match self {
            ClaimError::InsufficientFunds { .. } => true,
            ClaimError::Ledger(e) => e.is_insufficient_funds(),
            _ => false,
        }
    }
}
