//! Capability domain errors

use thiserror::Error;

use core_kernel::{CapabilityId, PartyId};
use crate::capability::Role;

/// Errors raised when a capability is presented or issued
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityError {
    /// The caller does not hold a valid capability for the operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The capability is genuine but carries the wrong role
    #[error("Invalid capability {capability_id}: expected {expected}, found {actual}")]
    InvalidCapability {
        capability_id: CapabilityId,
        expected: Role,
        actual: Role,
    },

    /// An Admin capability may only come from bootstrap
    #[error("Admin capabilities cannot be issued")]
    AdminNotIssuable,

    /// The bootstrap Admin capability cannot be revoked
    #[error("The bootstrap Admin capability cannot be revoked")]
    AdminNotRevocable,

    /// No capability with this id was ever issued
    #[error("Capability not found: {0}")]
    NotFound(CapabilityId),
}

impl CapabilityError {
    pub(crate) fn not_held(capability_id: CapabilityId, caller: PartyId) -> Self {
        CapabilityError::Unauthorized(format!("{} is not held by {}", capability_id, caller))
    }

    pub(crate) fn revoked(capability_id: CapabilityId) -> Self {
        CapabilityError::Unauthorized(format!("{} has been revoked", capability_id))
    }

    pub(crate) fn unknown(capability_id: CapabilityId) -> Self {
        CapabilityError::Unauthorized(format!("{} was not issued by this registry", capability_id))
    }

    /// Returns true for errors that mean "no valid token was presented"
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CapabilityError::Unauthorized(_))
    }

    /// Returns true for role mismatches and role-policy violations
    pub fn is_invalid_capability(&self) -> bool {
        matches!(
            self,
            CapabilityError::InvalidCapability { .. }
                | CapabilityError::AdminNotIssuable
                | CapabilityError::AdminNotRevocable
        )
    }
}
