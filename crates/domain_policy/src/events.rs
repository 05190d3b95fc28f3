//! Domain events for policy records
//!
//! Events form the audit trail of the store: one event per successful
//! mutation, in the order they were applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Amount, PartyId, PolicyId};

/// Domain events emitted by policy operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyEvent {
    /// A policy was created by its holder
    PolicyCreated {
        policy_id: PolicyId,
        holder: PartyId,
        coverage_amount: Amount,
        expiration: Option<DateTime<Utc>>,
        timestamp: DateTime<Utc>,
    },

    /// The holder set the policy active
    PolicyActivated {
        policy_id: PolicyId,
        timestamp: DateTime<Utc>,
    },

    /// The holder set the policy inactive
    PolicyDeactivated {
        policy_id: PolicyId,
        timestamp: DateTime<Utc>,
    },
}

impl PolicyEvent {
    /// Returns the policy ID associated with this event
    pub fn policy_id(&self) -> PolicyId {
        match self {
            PolicyEvent::PolicyCreated { policy_id, .. } => *policy_id,
            PolicyEvent::PolicyActivated { policy_id, .. } => *policy_id,
            PolicyEvent::PolicyDeactivated { policy_id, .. } => *policy_id,
        }
    }

    /// Returns the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            PolicyEvent::PolicyCreated { timestamp, .. } => *timestamp,
            PolicyEvent::PolicyActivated { timestamp, .. } => *timestamp,
            PolicyEvent::PolicyDeactivated { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            PolicyEvent::PolicyCreated { .. } => "PolicyCreated",
            PolicyEvent::PolicyActivated { .. } => "PolicyActivated",
            PolicyEvent::PolicyDeactivated { .. } => "PolicyDeactivated",
        }
    }
}
