//! Domain events for claims
//!
//! One event per successful state change. Idempotent calls that change
//! nothing (a repeated validation) emit nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Amount, ClaimId, PartyId};
use crate::claim::ClaimReference;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimEvent {
    ClaimCreated {
        claim_id: ClaimId,
        holder: PartyId,
        insurer_id: ClaimReference,
        authority_id: ClaimReference,
        amount: Amount,
        timestamp: DateTime<Utc>,
    },

    AuthorityIdChanged {
        claim_id: ClaimId,
        previous: ClaimReference,
        current: ClaimReference,
        timestamp: DateTime<Utc>,
    },

    EscrowFunded {
        claim_id: ClaimId,
        funded_by: PartyId,
        amount: Amount,
        timestamp: DateTime<Utc>,
    },

    InsurerValidated {
        claim_id: ClaimId,
        validator: PartyId,
        timestamp: DateTime<Utc>,
    },

    AuthorityValidated {
        claim_id: ClaimId,
        validator: PartyId,
        timestamp: DateTime<Utc>,
    },

    ReleasedToInsurer {
        claim_id: ClaimId,
        payee: PartyId,
        insurer: PartyId,
        amount: Amount,
        timestamp: DateTime<Utc>,
    },

    ReleasedToAuthority {
        claim_id: ClaimId,
        payee: PartyId,
        amount: Amount,
        timestamp: DateTime<Utc>,
    },

    ClaimRevoked {
        claim_id: ClaimId,
        timestamp: DateTime<Utc>,
    },
}

impl ClaimEvent {
    /// Returns the claim ID associated with this event
    pub fn claim_id(&self) -> ClaimId {
        match self {
            ClaimEvent::ClaimCreated { claim_id, .. }
            | ClaimEvent::AuthorityIdChanged { claim_id, .. }
            | ClaimEvent::EscrowFunded { claim_id, .. }
            | ClaimEvent::InsurerValidated { claim_id, .. }
            | ClaimEvent::AuthorityValidated { claim_id, .. }
            | ClaimEvent::ReleasedToInsurer { claim_id, .. }
            | ClaimEvent::ReleasedToAuthority { claim_id, .. }
            | ClaimEvent::ClaimRevoked { claim_id, .. } => *claim_id,
        }
    }

    /// Returns the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ClaimEvent::ClaimCreated { timestamp, .. }
            | ClaimEvent::AuthorityIdChanged { timestamp, .. }
            | ClaimEvent::EscrowFunded { timestamp, .. }
            | ClaimEvent::InsurerValidated { timestamp, .. }
            | ClaimEvent::AuthorityValidated { timestamp, .. }
            | ClaimEvent::ReleasedToInsurer { timestamp, .. }
            | ClaimEvent::ReleasedToAuthority { timestamp, .. }
            | ClaimEvent::ClaimRevoked { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            ClaimEvent::ClaimCreated { .. } => "ClaimCreated",
            ClaimEvent::AuthorityIdChanged { .. } => "AuthorityIdChanged",
            ClaimEvent::EscrowFunded { .. } => "EscrowFunded",
            ClaimEvent::InsurerValidated { .. } => "InsurerValidated",
            ClaimEvent::AuthorityValidated { .. } => "AuthorityValidated",
            ClaimEvent::ReleasedToInsurer { .. } => "ReleasedToInsurer",
            ClaimEvent::ReleasedToAuthority { .. } => "ReleasedToAuthority",
            ClaimEvent::ClaimRevoked { .. } => "ClaimRevoked",
        }
    }

    /// Returns the payout amount for release events
    pub fn payout(&self) -> Option<Amount> {
        match self {
            ClaimEvent::ReleasedToInsurer { amount, .. }
            | ClaimEvent::ReleasedToAuthority { amount, .. } => Some(*amount),
            _ => None,
        }
    }
}
