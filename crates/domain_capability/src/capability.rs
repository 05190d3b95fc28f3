//! Capability tokens

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{CapabilityId, PartyId};

/// The role a capability grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System administrator; issues and revokes the other roles
    Admin,
    /// Insurer; attests claims with `validate_with_insurer`
    Insurer,
    /// Authority; attests claims with `validate_by_authority`
    Authority,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "Admin",
            Role::Insurer => "Insurer",
            Role::Authority => "Authority",
        };
        f.write_str(name)
    }
}

/// An unforgeable, role-bound authorization token
///
/// Only [`crate::CapabilityRegistry`] can mint one. The type is
/// intentionally not `Clone` and not `Deserialize`: possession of the value
/// is the proof of authority, and the registry re-checks the id, role and
/// holder against its own records whenever the token is presented.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Capability {
    id: CapabilityId,
    role: Role,
    holder: PartyId,
    issued_at: DateTime<Utc>,
}

impl Capability {
    pub(crate) fn mint(role: Role, holder: PartyId, issued_at: DateTime<Utc>) -> Self {
        Self {
            id: CapabilityId::new_v7(),
            role,
            holder,
            issued_at,
        }
    }

    /// Returns the capability id
    pub fn id(&self) -> CapabilityId {
        self.id
    }

    /// Returns the granted role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the identity the token was issued to
    pub fn holder(&self) -> PartyId {
        self.holder
    }

    /// Returns when the token was issued
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Admin.to_string(), "Admin");
        assert_eq!(Role::Insurer.to_string(), "Insurer");
        assert_eq!(Role::Authority.to_string(), "Authority");
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Authority).unwrap(), "\"authority\"");
    }

    #[test]
    fn test_minted_tokens_are_distinct() {
        let holder = PartyId::new();
        let now = Utc::now();
        let a = Capability::mint(Role::Insurer, holder, now);
        let b = Capability::mint(Role::Insurer, holder, now);
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }
}
