//! Custom Test Assertions
//!
//! Assertion helpers for engine state that give more meaningful failure
//! messages than a bare `assert_eq!` on a nested field.

use std::fmt::Debug;

use claims_engine::{EngineResult, ErrorKind, InsuranceEngine};
use core_kernel::{Amount, ClaimId, Clock};
use domain_claims::{ClaimStatus, ClosedVia};
use domain_ledger::LedgerPort;

/// Asserts that a result failed with the given kind
///
/// # Panics
///
/// Panics if the result is `Ok` or carries a different kind
pub fn assert_error_kind<T: Debug>(result: EngineResult<T>, expected: ErrorKind) {
    match result {
        Ok(value) => panic!("Expected {} error, got Ok({:?})", expected, value),
        Err(e) => assert_eq!(
            e.kind(),
            expected,
            "Expected {} error, got {} ({})",
            expected,
            e.kind(),
            e
        ),
    }
}

/// Asserts that a claim is closed through the given path with an empty escrow
pub fn assert_claim_closed<L: LedgerPort, C: Clock>(
    engine: &InsuranceEngine<L, C>,
    claim_id: ClaimId,
    via: ClosedVia,
) {
    let claim = engine.claim(claim_id).expect("claim exists");
    assert_eq!(
        claim.status(),
        ClaimStatus::Closed { via },
        "Claim {} is not closed via {:?}",
        claim_id,
        via
    );
    assert!(
        claim.payout_balance().is_zero(),
        "Closed claim {} still holds {}",
        claim_id,
        claim.payout_balance()
    );
}

/// Asserts that a claim is still open
pub fn assert_claim_open<L: LedgerPort, C: Clock>(engine: &InsuranceEngine<L, C>, claim_id: ClaimId) {
    let claim = engine.claim(claim_id).expect("claim exists");
    assert!(
        claim.status().is_open(),
        "Claim {} unexpectedly closed: {:?}",
        claim_id,
        claim.status()
    );
}

/// Asserts the escrowed balance of a claim
pub fn assert_escrow_balance<L: LedgerPort, C: Clock>(
    engine: &InsuranceEngine<L, C>,
    claim_id: ClaimId,
    expected: Amount,
) {
    let actual = engine.claim(claim_id).expect("claim exists").payout_balance();
    assert_eq!(
        actual, expected,
        "Escrow of claim {} holds {}, expected {}",
        claim_id, actual, expected
    );
}

/// Asserts that a claim's ledger postings net to zero
///
/// Every unit debited into the claim's escrow has been credited back out.
pub fn assert_postings_balanced(ledger: &domain_ledger::InMemoryLedger, claim_id: ClaimId) {
    let debited = ledger.total_debited(claim_id.as_uuid());
    let credited = ledger.total_credited(claim_id.as_uuid());
    assert_eq!(
        debited, credited,
        "Claim {} debited {} but credited {}",
        claim_id, debited, credited
    );
}
