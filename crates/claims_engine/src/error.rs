//! Engine error handling
//!
//! Domain crates keep their own error enums. `EngineError` wraps them and
//! `ErrorKind` flattens the result into the taxonomy callers match on.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use domain_capability::CapabilityError;
use domain_claims::ClaimError;
use domain_ledger::LedgerError;
use domain_policy::PolicyError;

/// Failure categories reported by every engine operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    InvalidCapability,
    NotPolicyHolder,
    InvalidAmount,
    InvalidExpiration,
    InsufficientFunds,
    ClaimAlreadyProcessed,
    ClaimPending,
    UndeclaredClaim,
    NotValidatedByInsurer,
    NotValidatedByAuthority,
    NotFound,
    LedgerFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::InvalidCapability => "invalid_capability",
            ErrorKind::NotPolicyHolder => "not_policy_holder",
            ErrorKind::InvalidAmount => "invalid_amount",
            ErrorKind::InvalidExpiration => "invalid_expiration",
            ErrorKind::InsufficientFunds => "insufficient_funds",
            ErrorKind::ClaimAlreadyProcessed => "claim_already_processed",
            ErrorKind::ClaimPending => "claim_pending",
            ErrorKind::UndeclaredClaim => "undeclared_claim",
            ErrorKind::NotValidatedByInsurer => "not_validated_by_insurer",
            ErrorKind::NotValidatedByAuthority => "not_validated_by_authority",
            ErrorKind::NotFound => "not_found",
            ErrorKind::LedgerFailure => "ledger_failure",
        };
        f.write_str(name)
    }
}

/// Engine error types
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Returns the failure category
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Capability(e) => capability_kind(e),
            EngineError::Policy(e) => policy_kind(e),
            EngineError::Claim(e) => claim_kind(e),
            EngineError::Ledger(e) => ledger_kind(e),
        }
    }

    /// Returns true for authorization failures of either kind
    pub fn is_authorization(&self) -> bool {
        matches!(self.kind(), ErrorKind::Unauthorized | ErrorKind::InvalidCapability)
    }
}

fn capability_kind(error: &CapabilityError) -> ErrorKind {
    match error {
        CapabilityError::Unauthorized(_) => ErrorKind::Unauthorized,
        CapabilityError::InvalidCapability { .. }
        | CapabilityError::AdminNotIssuable
        | CapabilityError::AdminNotRevocable => ErrorKind::InvalidCapability,
        CapabilityError::NotFound(_) => ErrorKind::NotFound,
    }
}

fn policy_kind(error: &PolicyError) -> ErrorKind {
    match error {
        PolicyError::InvalidAmount => ErrorKind::InvalidAmount,
        PolicyError::InvalidExpiration { .. } => ErrorKind::InvalidExpiration,
        PolicyError::NotPolicyHolder { .. } => ErrorKind::NotPolicyHolder,
        PolicyError::PolicyNotFound(_) => ErrorKind::NotFound,
    }
}

fn ledger_kind(error: &LedgerError) -> ErrorKind {
    match error {
        LedgerError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
        LedgerError::InvalidPosting(_) | LedgerError::Calculation(_) | LedgerError::Port(_) => {
            ErrorKind::LedgerFailure
        }
    }
}

fn claim_kind(error: &ClaimError) -> ErrorKind {
    match error {
        ClaimError::InvalidAmount => ErrorKind::InvalidAmount,
        ClaimError::NotPolicyHolder { .. } => ErrorKind::NotPolicyHolder,
        ClaimError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
        ClaimError::ClaimAlreadyProcessed(_) => ErrorKind::ClaimAlreadyProcessed,
        ClaimError::ClaimPending { .. } => ErrorKind::ClaimPending,
        ClaimError::UndeclaredClaim(_) => ErrorKind::UndeclaredClaim,
        ClaimError::NotValidatedByInsurer(_) => ErrorKind::NotValidatedByInsurer,
        ClaimError::NotValidatedByAuthority(_) => ErrorKind::NotValidatedByAuthority,
        ClaimError::ClaimNotFound(_) => ErrorKind::NotFound,
        ClaimError::Capability(e) => capability_kind(e),
        ClaimError::Ledger(e) => ledger_kind(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{Amount, ClaimId, MoneyError, PartyId, PolicyId, PortError};

    #[test]
    fn test_nested_claim_errors_flatten() {
        let err = EngineError::from(ClaimError::Ledger(LedgerError::InsufficientFunds {
            account: PartyId::new(),
            requested: Amount::new(5),
            available: Amount::ZERO,
        }));
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);

        let err = EngineError::from(ClaimError::Capability(CapabilityError::Unauthorized(
            "no".to_string(),
        )));
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(err.is_authorization());
    }

    #[test]
    fn test_lookup_failures_are_not_found() {
        assert_eq!(
            EngineError::from(ClaimError::ClaimNotFound(ClaimId::new())).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            EngineError::from(PolicyError::PolicyNotFound(PolicyId::new())).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_ledger_breakdowns_are_ledger_failures() {
        let overflow = MoneyError::Overflow(Amount::new(u64::MAX), Amount::new(1));
        assert_eq!(
            EngineError::from(LedgerError::Calculation(overflow)).kind(),
            ErrorKind::LedgerFailure
        );
        assert_eq!(
            EngineError::from(LedgerError::Port(PortError::unavailable("ledger"))).kind(),
            ErrorKind::LedgerFailure
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::NotValidatedByAuthority.to_string(), "not_validated_by_authority");
    }
}
