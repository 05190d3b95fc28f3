//! Property-Based Test Generators
//!
//! Strategies for amounts and for random sequences of claim operations
//! issued by a mix of legitimate and illegitimate callers.

use proptest::prelude::*;

use core_kernel::Amount;

/// Who performs an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// The party that opened the claim
    Holder,
    /// Holds the Insurer capability
    Insurer,
    /// Holds the Authority capability
    Authority,
    /// Holds nothing; presents borrowed capabilities
    Stranger,
}

/// What is attempted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Fund { offered: Amount },
    ValidateWithInsurer,
    ValidateByAuthority,
    EditClaimId { authority_id: u64 },
    ReleaseToInsurer,
    ReleaseToAuthority,
    Revoke,
}

/// One step in a generated claim history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimOp {
    pub actor: Actor,
    pub action: Action,
}

/// Strategy for positive claim amounts
pub fn claim_amount_strategy() -> impl Strategy<Value = Amount> {
    (1u64..5_000u64).prop_map(Amount::new)
}

/// Strategy for amounts offered at funding, zero included
pub fn offered_amount_strategy() -> impl Strategy<Value = Amount> {
    (0u64..1_500u64).prop_map(Amount::new)
}

pub fn actor_strategy() -> impl Strategy<Value = Actor> {
    prop_oneof![
        3 => Just(Actor::Holder),
        2 => Just(Actor::Insurer),
        2 => Just(Actor::Authority),
        1 => Just(Actor::Stranger),
    ]
}

pub fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        offered_amount_strategy().prop_map(|offered| Action::Fund { offered }),
        Just(Action::ValidateWithInsurer),
        Just(Action::ValidateByAuthority),
        (0u64..4).prop_map(|authority_id| Action::EditClaimId { authority_id }),
        Just(Action::ReleaseToInsurer),
        Just(Action::ReleaseToAuthority),
        Just(Action::Revoke),
    ]
}

pub fn claim_op_strategy() -> impl Strategy<Value = ClaimOp> {
    (actor_strategy(), action_strategy()).prop_map(|(actor, action)| ClaimOp { actor, action })
}

/// Strategy for operation histories of up to `max_len` steps
pub fn claim_ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<ClaimOp>> {
    prop::collection::vec(claim_op_strategy(), 0..max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn claim_amounts_are_positive(amount in claim_amount_strategy()) {
            prop_assert!(amount.is_positive());
        }

        #[test]
        fn histories_respect_length(ops in claim_ops_strategy(8)) {
            prop_assert!(ops.len() < 8);
        }
    }
}
