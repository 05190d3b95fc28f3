//! Policy store
//!
//! Keyed storage for policy records plus the ordered event journal. Every
//! operation validates before it mutates, so a failed call leaves both the
//! records and the journal untouched.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, info};

use core_kernel::{Amount, PartyId, PolicyId};
use crate::error::PolicyError;
use crate::events::PolicyEvent;
use crate::policy::InsurancePolicy;

/// In-memory store of insurance policies
#[derive(Debug)]
pub struct PolicyStore {
    policies: HashMap<PolicyId, InsurancePolicy>,
    journal: Vec<PolicyEvent>,
    record_events: bool,
}

impl Default for PolicyStore {
    fn default() -> Self {
        Self {
            policies: HashMap::new(),
            journal: Vec::new(),
            record_events: true,
        }
    }
}

impl PolicyStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that discards events instead of journaling them
    pub fn without_journal() -> Self {
        Self {
            record_events: false,
            ..Self::default()
        }
    }

    /// Creates a policy held by `caller`
    pub fn create(
        &mut self,
        caller: PartyId,
        coverage_amount: Amount,
        expiration: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<PolicyId, PolicyError> {
        let policy = InsurancePolicy::create(caller, coverage_amount, expiration, now)?;
        let policy_id = policy.id();

        info!(policy_id = %policy_id, holder = %caller, coverage = %coverage_amount, "Policy created");
        self.commit(policy);
        Ok(policy_id)
    }

    /// Sets a policy active; holder only
    pub fn activate(
        &mut self,
        policy_id: PolicyId,
        caller: PartyId,
        now: DateTime<Utc>,
    ) -> Result<(), PolicyError> {
        let policy = self.get_mut(policy_id)?;
        policy.activate(caller, now)?;
        debug!(policy_id = %policy_id, "Policy activated");
        self.drain_events(policy_id);
        Ok(())
    }

    /// Sets a policy inactive; holder only
    pub fn deactivate(
        &mut self,
        policy_id: PolicyId,
        caller: PartyId,
        now: DateTime<Utc>,
    ) -> Result<(), PolicyError> {
        let policy = self.get_mut(policy_id)?;
        policy.deactivate(caller, now)?;
        debug!(policy_id = %policy_id, "Policy deactivated");
        self.drain_events(policy_id);
        Ok(())
    }

    /// Returns the coverage amount; holder only
    pub fn coverage_amount(&self, policy_id: PolicyId, caller: PartyId) -> Result<Amount, PolicyError> {
        self.get(policy_id)?.coverage_amount(caller)
    }

    /// Returns the expiration; holder only
    pub fn expiration(
        &self,
        policy_id: PolicyId,
        caller: PartyId,
    ) -> Result<Option<DateTime<Utc>>, PolicyError> {
        self.get(policy_id)?.expiration(caller)
    }

    /// Returns whether the policy is active; public
    pub fn is_policy_active(&self, policy_id: PolicyId) -> Result<bool, PolicyError> {
        Ok(self.get(policy_id)?.is_active())
    }

    /// Returns the policy record
    pub fn get(&self, policy_id: PolicyId) -> Result<&InsurancePolicy, PolicyError> {
        self.policies
            .get(&policy_id)
            .ok_or(PolicyError::PolicyNotFound(policy_id))
    }

    /// Returns the ids of all policies held by `holder`
    pub fn held_by(&self, holder: PartyId) -> Vec<PolicyId> {
        let mut ids: Vec<PolicyId> = self
            .policies
            .values()
            .filter(|p| p.holder() == holder)
            .map(InsurancePolicy::id)
            .collect();
        ids.sort_by_key(|id| *id.as_uuid());
        ids
    }

    /// Returns the journal entries for one policy, oldest first
    pub fn events_for(&self, policy_id: PolicyId) -> Vec<&PolicyEvent> {
        self.journal
            .iter()
            .filter(|e| e.policy_id() == policy_id)
            .collect()
    }

    /// Returns the whole journal, oldest first
    pub fn journal(&self) -> &[PolicyEvent] {
        &self.journal
    }

    /// Returns the number of stored policies
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Returns true if no policy has been stored
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    fn get_mut(&mut self, policy_id: PolicyId) -> Result<&mut InsurancePolicy, PolicyError> {
        self.policies
            .get_mut(&policy_id)
            .ok_or(PolicyError::PolicyNotFound(policy_id))
    }

    fn commit(&mut self, mut policy: InsurancePolicy) {
        let events = policy.take_events();
        if self.record_events {
            self.journal.extend(events);
        }
        self.policies.insert(policy.id(), policy);
    }

    fn drain_events(&mut self, policy_id: PolicyId) {
        if let Some(policy) = self.policies.get_mut(&policy_id) {
            let events = policy.take_events();
            if self.record_events {
                self.journal.extend(events);
            }
        }
    }
}
