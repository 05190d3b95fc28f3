//! Insurance policy aggregate
//!
//! # Invariants
//!
//! - Coverage amount is positive at creation and never changes
//! - Only the holder may toggle the active flag or read coverage terms
//! - An expiration, if present, was strictly in the future at creation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Amount, PartyId, PolicyId};
use crate::error::PolicyError;
use crate::events::PolicyEvent;

/// An insurance policy owned by a single holder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsurancePolicy {
    id: PolicyId,
    holder: PartyId,
    coverage_amount: Amount,
    is_active: bool,
    expiration: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Domain events to be published
    #[serde(skip)]
    events: Vec<PolicyEvent>,
}

impl InsurancePolicy {
    /// Creates a new active policy held by `holder`
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `coverage_amount` is zero
    /// - `InvalidExpiration` if `expiration` is not strictly after `now`
    pub fn create(
        holder: PartyId,
        coverage_amount: Amount,
        expiration: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Self, PolicyError> {
        if coverage_amount.is_zero() {
            return Err(PolicyError::InvalidAmount);
        }
        if let Some(expiration) = expiration {
            if expiration <= now {
                return Err(PolicyError::InvalidExpiration { expiration, now });
            }
        }

        let id = PolicyId::new_v7();
        Ok(Self {
            id,
            holder,
            coverage_amount,
            is_active: true,
            expiration,
            created_at: now,
            updated_at: now,
            events: vec![PolicyEvent::PolicyCreated {
                policy_id: id,
                holder,
                coverage_amount,
                expiration,
                timestamp: now,
            }],
        })
    }

    /// Returns the policy ID
    pub fn id(&self) -> PolicyId {
        self.id
    }

    /// Returns the holder identity
    pub fn holder(&self) -> PartyId {
        self.holder
    }

    /// Returns the active flag; readable by anyone
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the coverage amount to the holder
    pub fn coverage_amount(&self, caller: PartyId) -> Result<Amount, PolicyError> {
        self.ensure_holder(caller)?;
        Ok(self.coverage_amount)
    }

    /// Returns the expiration to the holder
    pub fn expiration(&self, caller: PartyId) -> Result<Option<DateTime<Utc>>, PolicyError> {
        self.ensure_holder(caller)?;
        Ok(self.expiration)
    }

    /// Sets the policy active; setting an already active policy is accepted
    pub fn activate(&mut self, caller: PartyId, now: DateTime<Utc>) -> Result<(), PolicyError> {
        self.ensure_holder(caller)?;
        self.is_active = true;
        self.updated_at = now;
        self.events.push(PolicyEvent::PolicyActivated {
            policy_id: self.id,
            timestamp: now,
        });
        Ok(())
    }

    /// Sets the policy inactive; setting an already inactive policy is accepted
    pub fn deactivate(&mut self, caller: PartyId, now: DateTime<Utc>) -> Result<(), PolicyError> {
        self.ensure_holder(caller)?;
        self.is_active = false;
        self.updated_at = now;
        self.events.push(PolicyEvent::PolicyDeactivated {
            policy_id: self.id,
            timestamp: now,
        });
        Ok(())
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<PolicyEvent> {
        std::mem::take(&mut self.events)
    }

    fn ensure_holder(&self, caller: PartyId) -> Result<(), PolicyError> {
        if caller != self.holder {
            return Err(PolicyError::NotPolicyHolder {
                policy_id: self.id,
                caller,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_policy_creation() {
        let holder = PartyId::new();
        let now = Utc::now();
        let mut policy = InsurancePolicy::create(holder, Amount::new(1000), None, now).unwrap();

        assert!(policy.is_active());
        assert_eq!(policy.holder(), holder);
        assert_eq!(policy.coverage_amount(holder), Ok(Amount::new(1000)));

        let events = policy.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "PolicyCreated");
        assert!(policy.take_events().is_empty());
    }

    #[test]
    fn test_expiration_equal_to_now_is_rejected() {
        let now = Utc::now();
        let result = InsurancePolicy::create(PartyId::new(), Amount::new(1), Some(now), now);
        assert_eq!(result.unwrap_err(), PolicyError::InvalidExpiration { expiration: now, now });
    }

    #[test]
    fn test_future_expiration_is_kept() {
        let holder = PartyId::new();
        let now = Utc::now();
        let expiry = now + Duration::days(365);
        let policy = InsurancePolicy::create(holder, Amount::new(1), Some(expiry), now).unwrap();
        assert_eq!(policy.expiration(holder), Ok(Some(expiry)));
    }
}
