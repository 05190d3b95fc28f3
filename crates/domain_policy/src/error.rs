//! Policy domain errors

use chrono::{DateTime, Utc};
use thiserror::Error;

use core_kernel::{PartyId, PolicyId};

/// Errors that can occur in the policy domain
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// Coverage amount must be positive
    #[error("Invalid amount: coverage must be greater than zero")]
    InvalidAmount,

    /// Expiration must lie strictly after the current time
    #[error("Invalid expiration {expiration}: must be after {now}")]
    InvalidExpiration {
        expiration: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    /// Caller is not the recorded holder
    #[error("{caller} is not the holder of policy {policy_id}")]
    NotPolicyHolder {
        policy_id: PolicyId,
        caller: PartyId,
    },

    /// No policy with this id is stored
    #[error("Policy not found: {0}")]
    PolicyNotFound(PolicyId),
}
