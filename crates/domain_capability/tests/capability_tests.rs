//! Tests for the capability registry

use chrono::Utc;

use core_kernel::PartyId;
use domain_capability::{Capability, CapabilityError, CapabilityRegistry, Role};

struct Setup {
    registry: CapabilityRegistry,
    admin_cap: Capability,
    admin: PartyId,
}

fn setup() -> Setup {
    let admin = PartyId::new_v7();
    let (registry, admin_cap) = CapabilityRegistry::bootstrap(admin, Utc::now());
    Setup { registry, admin_cap, admin }
}

// ============================================================================
// Issue Tests
// ============================================================================

mod issue_tests {
    use super::*;

    #[test]
    fn test_admin_issues_insurer_capability() {
        let mut s = setup();
        let insurer = PartyId::new_v7();

        let cap = s
            .registry
            .issue(Role::Insurer, insurer, &s.admin_cap, s.admin, Utc::now())
            .unwrap();

        assert_eq!(cap.role(), Role::Insurer);
        assert_eq!(cap.holder(), insurer);
        assert_eq!(s.registry.issued_count(), 2);

        let record = s.registry.record(&cap.id()).unwrap();
        assert_eq!(record.issued_by, Some(s.admin_cap.id()));
        assert!(!record.is_revoked());
    }

    #[test]
    fn test_admin_issues_authority_capability() {
        let mut s = setup();
        let authority = PartyId::new_v7();

        let cap = s
            .registry
            .issue(Role::Authority, authority, &s.admin_cap, s.admin, Utc::now())
            .unwrap();

        assert!(s.registry.check(&cap, Role::Authority, authority).is_ok());
    }

    #[test]
    fn test_issue_by_non_holder_is_unauthorized() {
        let mut s = setup();
        let intruder = PartyId::new_v7();

        let err = s
            .registry
            .issue(Role::Insurer, intruder, &s.admin_cap, intruder, Utc::now())
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(s.registry.issued_count(), 1);
    }

    #[test]
    fn test_issue_with_insurer_capability_is_unauthorized() {
        let mut s = setup();
        let insurer = PartyId::new_v7();
        let insurer_cap = s
            .registry
            .issue(Role::Insurer, insurer, &s.admin_cap, s.admin, Utc::now())
            .unwrap();

        let err = s
            .registry
            .issue(Role::Authority, insurer, &insurer_cap, insurer, Utc::now())
            .unwrap_err();

        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_admin_role_cannot_be_issued() {
        let mut s = setup();

        let err = s
            .registry
            .issue(Role::Admin, PartyId::new_v7(), &s.admin_cap, s.admin, Utc::now())
            .unwrap_err();

        assert_eq!(err, CapabilityError::AdminNotIssuable);
        assert!(err.is_invalid_capability());
    }
}

// ============================================================================
// Check Tests
// ============================================================================

mod check_tests {
    use super::*;

    #[test]
    fn test_role_mismatch_is_invalid_capability() {
        let mut s = setup();
        let authority = PartyId::new_v7();
        let cap = s
            .registry
            .issue(Role::Authority, authority, &s.admin_cap, s.admin, Utc::now())
            .unwrap();

        let err = s.registry.check(&cap, Role::Insurer, authority).unwrap_err();

        assert!(matches!(
            err,
            CapabilityError::InvalidCapability {
                expected: Role::Insurer,
                actual: Role::Authority,
                ..
            }
        ));
    }

    #[test]
    fn test_presenting_someone_elses_capability_is_unauthorized() {
        let mut s = setup();
        let insurer = PartyId::new_v7();
        let cap = s
            .registry
            .issue(Role::Insurer, insurer, &s.admin_cap, s.admin, Utc::now())
            .unwrap();

        let err = s.registry.check(&cap, Role::Insurer, PartyId::new_v7()).unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_admin_check_for_other_roles_is_invalid() {
        let s = setup();
        let err = s.registry.check(&s.admin_cap, Role::Insurer, s.admin).unwrap_err();
        assert!(err.is_invalid_capability());
    }
}

// ============================================================================
// Revocation Tests
// ============================================================================

mod revocation_tests {
    use super::*;

    #[test]
    fn test_revoked_capability_fails_check() {
        let mut s = setup();
        let insurer = PartyId::new_v7();
        let cap = s
            .registry
            .issue(Role::Insurer, insurer, &s.admin_cap, s.admin, Utc::now())
            .unwrap();

        s.registry.revoke(cap.id(), &s.admin_cap, s.admin, Utc::now()).unwrap();

        assert!(s.registry.is_revoked(&cap.id()));
        assert!(s.registry.check(&cap, Role::Insurer, insurer).unwrap_err().is_unauthorized());
        assert!(s.registry.held_by(insurer).is_empty());
    }

    #[test]
    fn test_bootstrap_admin_cannot_be_revoked() {
        let mut s = setup();
        let admin_id = s.admin_cap.id();

        let err = s.registry.revoke(admin_id, &s.admin_cap, s.admin, Utc::now()).unwrap_err();

        assert_eq!(err, CapabilityError::AdminNotRevocable);
        assert!(s.registry.check(&s.admin_cap, Role::Admin, s.admin).is_ok());
    }

    #[test]
    fn test_revoke_requires_admin() {
        let mut s = setup();
        let insurer = PartyId::new_v7();
        let cap = s
            .registry
            .issue(Role::Insurer, insurer, &s.admin_cap, s.admin, Utc::now())
            .unwrap();

        let err = s.registry.revoke(cap.id(), &cap, insurer, Utc::now()).unwrap_err();

        assert!(err.is_unauthorized());
        assert!(!s.registry.is_revoked(&cap.id()));
    }

    #[test]
    fn test_revoke_unknown_capability_is_not_found() {
        let mut s = setup();
        let unknown = core_kernel::CapabilityId::new();

        let err = s.registry.revoke(unknown, &s.admin_cap, s.admin, Utc::now()).unwrap_err();
        assert_eq!(err, CapabilityError::NotFound(unknown));
    }
}

// ============================================================================
// Lookup Tests
// ============================================================================

mod lookup_tests {
    use super::*;

    #[test]
    fn test_role_and_holder_lookup() {
        let mut s = setup();
        let authority = PartyId::new_v7();
        let cap = s
            .registry
            .issue(Role::Authority, authority, &s.admin_cap, s.admin, Utc::now())
            .unwrap();

        assert_eq!(s.registry.role_of(&cap.id()), Some(Role::Authority));
        assert_eq!(s.registry.holder_of(&cap.id()), Some(authority));
        assert_eq!(s.registry.role_of(&s.registry.admin_id()), Some(Role::Admin));
        assert_eq!(s.registry.held_by(authority).len(), 1);
    }

    #[test]
    fn test_unknown_capability_lookup_is_none() {
        let s = setup();
        let unknown = core_kernel::CapabilityId::new();

        assert_eq!(s.registry.role_of(&unknown), None);
        assert_eq!(s.registry.holder_of(&unknown), None);
        assert!(!s.registry.is_revoked(&unknown));
    }
}
