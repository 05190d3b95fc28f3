//! Capability registry
//!
//! The registry is the only place capabilities are minted. It keeps a
//! record for every token it has issued and validates presented tokens
//! against those records.
//!
//! # Invariants
//!
//! - Exactly one Admin capability exists, created by `bootstrap`
//! - Insurer and Authority capabilities are issued only on presentation of
//!   that Admin capability by its holder
//! - Records are never mutated except to mark a revocation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use core_kernel::{CapabilityId, PartyId};
use crate::capability::{Capability, Role};
use crate::error::CapabilityError;

/// The registry's view of an issued capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRecord {
    pub id: CapabilityId,
    pub role: Role,
    pub holder: PartyId,
    /// The Admin capability that issued this one; `None` for bootstrap
    pub issued_by: Option<CapabilityId>,
    pub issued_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl CapabilityRecord {
    fn of(capability: &Capability, issued_by: Option<CapabilityId>) -> Self {
        Self {
            id: capability.id(),
            role: capability.role(),
            holder: capability.holder(),
            issued_by,
            issued_at: capability.issued_at(),
            revoked_at: None,
        }
    }

    /// Returns true if the capability has been revoked
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

/// Issues and validates capabilities
#[derive(Debug)]
pub struct CapabilityRegistry {
    admin_id: CapabilityId,
    records: HashMap<CapabilityId, CapabilityRecord>,
}

impl CapabilityRegistry {
    /// One-time system setup
    ///
    /// Produces the registry together with the sole Admin capability, held
    /// by `admin`. There is no other way to obtain an Admin capability.
    pub fn bootstrap(admin: PartyId, now: DateTime<Utc>) -> (Self, Capability) {
        let capability = Capability::mint(Role::Admin, admin, now);
        let mut records = HashMap::new();
        records.insert(capability.id(), CapabilityRecord::of(&capability, None));

        info!(capability_id = %capability.id(), holder = %admin, "Bootstrapped admin capability");

        let registry = Self {
            admin_id: capability.id(),
            records,
        };
        (registry, capability)
    }

    /// Issues a new Insurer or Authority capability to `target`
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `issuer` is not the valid Admin capability held
    ///   by `caller`
    /// - `AdminNotIssuable` if `role` is `Admin`
    pub fn issue(
        &mut self,
        role: Role,
        target: PartyId,
        issuer: &Capability,
        caller: PartyId,
        now: DateTime<Utc>,
    ) -> Result<Capability, CapabilityError> {
        self.check(issuer, Role::Admin, caller).map_err(|e| {
            warn!(caller = %caller, error = %e, "Capability issue refused");
            match e {
                CapabilityError::Unauthorized(_) => e,
                other => CapabilityError::Unauthorized(other.to_string()),
            }
        })?;

        if role == Role::Admin {
            return Err(CapabilityError::AdminNotIssuable);
        }

        let capability = Capability::mint(role, target, now);
        self.records
            .insert(capability.id(), CapabilityRecord::of(&capability, Some(issuer.id())));

        info!(
            capability_id = %capability.id(),
            role = %role,
            holder = %target,
            "Issued capability"
        );
        Ok(capability)
    }

    /// Validates that `caller` presents a live capability of `required` role
    ///
    /// This is a pure predicate; it never changes the registry.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the token is unknown, revoked, does not match its
    ///   issued record, or is not held by `caller`
    /// - `InvalidCapability` if the role differs from `required`, or an
    ///   Admin token is not the bootstrap instance
    pub fn check(
        &self,
        capability: &Capability,
        required: Role,
        caller: PartyId,
    ) -> Result<(), CapabilityError> {
        let record = self
            .records
            .get(&capability.id())
            .ok_or_else(|| CapabilityError::unknown(capability.id()))?;

        if record.role != capability.role() || record.holder != capability.holder() {
            return Err(CapabilityError::unknown(capability.id()));
        }
        if record.is_revoked() {
            return Err(CapabilityError::revoked(capability.id()));
        }
        if record.holder != caller {
            return Err(CapabilityError::not_held(capability.id(), caller));
        }
        if record.role != required {
            return Err(CapabilityError::InvalidCapability {
                capability_id: capability.id(),
                expected: required,
                actual: record.role,
            });
        }
        if required == Role::Admin && capability.id() != self.admin_id {
            return Err(CapabilityError::InvalidCapability {
                capability_id: capability.id(),
                expected: Role::Admin,
                actual: record.role,
            });
        }

        debug!(capability_id = %capability.id(), role = %required, caller = %caller, "Capability accepted");
        Ok(())
    }

    /// Revokes an Insurer or Authority capability
    ///
    /// Revoking an already revoked capability is a no-op.
    pub fn revoke(
        &mut self,
        capability_id: CapabilityId,
        admin: &Capability,
        caller: PartyId,
        now: DateTime<Utc>,
    ) -> Result<(), CapabilityError> {
        self.check(admin, Role::Admin, caller).map_err(|e| match e {
            CapabilityError::Unauthorized(_) => e,
            other => CapabilityError::Unauthorized(other.to_string()),
        })?;

        if capability_id == self.admin_id {
            return Err(CapabilityError::AdminNotRevocable);
        }

        let record = self
            .records
            .get_mut(&capability_id)
            .ok_or(CapabilityError::NotFound(capability_id))?;

        if record.revoked_at.is_none() {
            record.revoked_at = Some(now);
            info!(capability_id = %capability_id, role = %record.role, "Revoked capability");
        }
        Ok(())
    }

    /// Returns the id of the bootstrap Admin capability
    pub fn admin_id(&self) -> CapabilityId {
        self.admin_id
    }

    /// Returns the issued record for a capability
    pub fn record(&self, capability_id: &CapabilityId) -> Option<&CapabilityRecord> {
        self.records.get(capability_id)
    }

    pub fn role_of(&self, capability_id: &CapabilityId) -> Option<Role> {
        self.records.get(capability_id).map(|r| r.role)
    }

    pub fn holder_of(&self, capability_id: &CapabilityId) -> Option<PartyId> {
        self.records.get(capability_id).map(|r| r.holder)
    }

    /// Returns true if the capability exists and has been revoked
    pub fn is_revoked(&self, capability_id: &CapabilityId) -> bool {
        self.records
            .get(capability_id)
            .map(CapabilityRecord::is_revoked)
            .unwrap_or(false)
    }

    /// Returns the live (unrevoked) capabilities held by a party
    pub fn held_by(&self, party: PartyId) -> Vec<&CapabilityRecord> {
        self.records
            .values()
            .filter(|r| r.holder == party && !r.is_revoked())
            .collect()
    }

    /// Returns the number of capabilities ever issued, bootstrap included
    pub fn issued_count(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (CapabilityRegistry, Capability, PartyId) {
        let admin = PartyId::new();
        let (registry, cap) = CapabilityRegistry::bootstrap(admin, Utc::now());
        (registry, cap, admin)
    }

    #[test]
    fn test_bootstrap_produces_single_admin() {
        let (registry, cap, admin) = setup();
        assert_eq!(cap.role(), Role::Admin);
        assert_eq!(cap.holder(), admin);
        assert_eq!(registry.admin_id(), cap.id());
        assert_eq!(registry.issued_count(), 1);
        assert!(registry.check(&cap, Role::Admin, admin).is_ok());
    }

    #[test]
    fn test_capability_from_another_registry_is_unknown() {
        let (registry, _, admin) = setup();
        let (_, foreign_admin) = CapabilityRegistry::bootstrap(admin, Utc::now());

        let err = registry.check(&foreign_admin, Role::Admin, admin).unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let (mut registry, admin_cap, admin) = setup();
        let insurer = PartyId::new();
        let cap = registry
            .issue(Role::Insurer, insurer, &admin_cap, admin, Utc::now())
            .unwrap();

        registry.revoke(cap.id(), &admin_cap, admin, Utc::now()).unwrap();
        let first = registry.record(&cap.id()).unwrap().revoked_at;
        registry.revoke(cap.id(), &admin_cap, admin, Utc::now()).unwrap();

        assert_eq!(registry.record(&cap.id()).unwrap().revoked_at, first);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn role() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::Insurer), Just(Role::Authority)]
    }

    proptest! {
        #[test]
        fn check_passes_only_for_holder_and_role(issued in role(), required in role(), by_holder in any::<bool>()) {
            let admin = PartyId::new();
            let (mut registry, admin_cap) = CapabilityRegistry::bootstrap(admin, Utc::now());
            let holder = PartyId::new();
            let cap = registry.issue(issued, holder, &admin_cap, admin, Utc::now()).unwrap();
            let caller = if by_holder { holder } else { PartyId::new() };

            let result = registry.check(&cap, required, caller);
            prop_assert_eq!(result.is_ok(), by_holder && issued == required);
            if !by_holder {
                prop_assert!(result.unwrap_err().is_unauthorized());
            }
        }
    }
}
