//! The engine facade

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use core_kernel::{Amount, CapabilityId, ClaimId, Clock, PartyId, PolicyId, SystemClock};
use domain_capability::{Capability, CapabilityRegistry, Role};
use domain_claims::{ClaimEvent, ClaimLifecycle, ClaimReference, InsuranceClaim};
use domain_ledger::{InMemoryLedger, LedgerPort};
use domain_policy::{InsurancePolicy, PolicyEvent, PolicyStore};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

/// Claim and policy lifecycle engine
///
/// Owns the capability registry, the policy store and every claim, and
/// borrows currency movements from a ledger. Each operation takes
/// `&mut self`, so operations are applied one at a time and either
/// complete or leave the engine unchanged.
#[derive(Debug)]
pub struct InsuranceEngine<L: LedgerPort = InMemoryLedger, C: Clock = SystemClock> {
    registry: CapabilityRegistry,
    policies: PolicyStore,
    claims: ClaimLifecycle,
    ledger: L,
    clock: C,
    config: EngineConfig,
}

impl InsuranceEngine {
    /// In-memory engine on the system clock with default configuration
    pub fn in_memory(admin: PartyId) -> (Self, Capability) {
        Self::bootstrap(admin, InMemoryLedger::new(), SystemClock, EngineConfig::default())
    }
}

impl<L: LedgerPort, C: Clock> InsuranceEngine<L, C> {
    /// One-time setup
    ///
    /// Returns the engine together with the sole Admin capability, held by
    /// `admin`.
    pub fn bootstrap(admin: PartyId, ledger: L, clock: C, config: EngineConfig) -> (Self, Capability) {
        let (registry, admin_capability) = CapabilityRegistry::bootstrap(admin, clock.now());
        let policies = if config.record_events {
            PolicyStore::new()
        } else {
            PolicyStore::without_journal()
        };
        let claims = ClaimLifecycle::with_rules(config.lifecycle_rules());

        info!(admin = %admin, "Engine bootstrapped");

        let engine = Self {
            registry,
            policies,
            claims,
            ledger,
            clock,
            config,
        };
        (engine, admin_capability)
    }

    // ------------------------------------------------------------------
    // Capabilities
    // ------------------------------------------------------------------

    /// Issues an Insurer or Authority capability to `target`
    #[instrument(skip(self, issuer), fields(role = %role, target = %target, caller = %caller))]
    pub fn issue_capability(
        &mut self,
        role: Role,
        target: PartyId,
        issuer: &Capability,
        caller: PartyId,
    ) -> EngineResult<Capability> {
        let now = self.clock.now();
        Ok(self.registry.issue(role, target, issuer, caller, now)?)
    }

    /// Revokes an Insurer or Authority capability
    #[instrument(skip(self, admin), fields(capability_id = %capability_id, caller = %caller))]
    pub fn revoke_capability(
        &mut self,
        capability_id: CapabilityId,
        admin: &Capability,
        caller: PartyId,
    ) -> EngineResult<()> {
        let now = self.clock.now();
        Ok(self.registry.revoke(capability_id, admin, caller, now)?)
    }

    /// Checks that `caller` holds a live capability of `required` role
    pub fn check_capability(
        &self,
        capability: &Capability,
        required: Role,
        caller: PartyId,
    ) -> EngineResult<()> {
        Ok(self.registry.check(capability, required, caller)?)
    }

    // ------------------------------------------------------------------
    // Policies
    // ------------------------------------------------------------------

    /// Creates a policy held by `caller`
    #[instrument(skip(self), fields(caller = %caller, coverage = %coverage_amount))]
    pub fn create_policy(
        &mut self,
        caller: PartyId,
        coverage_amount: Amount,
        expiration: Option<DateTime<Utc>>,
    ) -> EngineResult<PolicyId> {
        let now = self.clock.now();
        Ok(self.policies.create(caller, coverage_amount, expiration, now)?)
    }

    #[instrument(skip(self), fields(policy_id = %policy_id, caller = %caller))]
    pub fn activate_policy(&mut self, policy_id: PolicyId, caller: PartyId) -> EngineResult<()> {
        let now = self.clock.now();
        Ok(self.policies.activate(policy_id, caller, now)?)
    }

    #[instrument(skip(self), fields(policy_id = %policy_id, caller = %caller))]
    pub fn deactivate_policy(&mut self, policy_id: PolicyId, caller: PartyId) -> EngineResult<()> {
        let now = self.clock.now();
        Ok(self.policies.deactivate(policy_id, caller, now)?)
    }

    /// Coverage amount; holder only
    pub fn policy_coverage_amount(&self, policy_id: PolicyId, caller: PartyId) -> EngineResult<Amount> {
        Ok(self.policies.coverage_amount(policy_id, caller)?)
    }

    /// Expiration timestamp; holder only
    pub fn policy_expiration(
        &self,
        policy_id: PolicyId,
        caller: PartyId,
    ) -> EngineResult<Option<DateTime<Utc>>> {
        Ok(self.policies.expiration(policy_id, caller)?)
    }

    pub fn is_policy_active(&self, policy_id: PolicyId) -> EngineResult<bool> {
        Ok(self.policies.is_policy_active(policy_id)?)
    }

    pub fn policy(&self, policy_id: PolicyId) -> EngineResult<&InsurancePolicy> {
        Ok(self.policies.get(policy_id)?)
    }

    pub fn policy_events(&self, policy_id: PolicyId) -> Vec<&PolicyEvent> {
        self.policies.events_for(policy_id)
    }

    // ------------------------------------------------------------------
    // Claims
    // ------------------------------------------------------------------

    /// Opens a claim held by `caller`
    #[instrument(skip(self), fields(caller = %caller, amount = %amount))]
    pub fn create_claim(
        &mut self,
        caller: PartyId,
        insurer_id: ClaimReference,
        authority_id: ClaimReference,
        amount: Amount,
    ) -> EngineResult<ClaimId> {
        let now = self.clock.now();
        Ok(self.claims.create(caller, insurer_id, authority_id, amount, now)?)
    }

    /// Reassigns the claim's authority identifier; holder only
    #[instrument(skip(self), fields(claim_id = %claim_id, caller = %caller))]
    pub fn edit_claim_id(
        &mut self,
        claim_id: ClaimId,
        caller: PartyId,
        authority_id: ClaimReference,
    ) -> EngineResult<()> {
        let now = self.clock.now();
        Ok(self.claims.edit_claim_id(claim_id, caller, authority_id, now)?)
    }

    /// Funds the claim's escrow from `caller`'s ledger account
    ///
    /// Exactly the claim amount is debited; the rest of `offered` stays put.
    #[instrument(skip(self), fields(claim_id = %claim_id, caller = %caller, offered = %offered))]
    pub fn fund_claim(&mut self, claim_id: ClaimId, caller: PartyId, offered: Amount) -> EngineResult<Amount> {
        let now = self.clock.now();
        Ok(self.claims.fund(claim_id, caller, offered, &mut self.ledger, now)?)
    }

    /// Records the insurer's validation
    #[instrument(skip(self, capability), fields(claim_id = %claim_id, caller = %caller))]
    pub fn validate_with_insurer(
        &mut self,
        claim_id: ClaimId,
        caller: PartyId,
        capability: &Capability,
    ) -> EngineResult<()> {
        let now = self.clock.now();
        self.claims
            .validate_with_insurer(claim_id, caller, capability, &self.registry, now)
            .map_err(|e| self.refused(e))
    }

    /// Records the authority's validation
    #[instrument(skip(self, capability), fields(claim_id = %claim_id, caller = %caller))]
    pub fn validate_by_authority(
        &mut self,
        claim_id: ClaimId,
        caller: PartyId,
        capability: &Capability,
    ) -> EngineResult<()> {
        let now = self.clock.now();
        self.claims
            .validate_by_authority(claim_id, caller, capability, &self.registry, now)
            .map_err(|e| self.refused(e))
    }

    /// Pays the escrow to the holder and hands the claim over to `insurer`
    #[instrument(skip(self), fields(claim_id = %claim_id, caller = %caller, insurer = %insurer))]
    pub fn release_to_insurer(
        &mut self,
        claim_id: ClaimId,
        caller: PartyId,
        insurer: PartyId,
    ) -> EngineResult<Amount> {
        let now = self.clock.now();
        Ok(self
            .claims
            .release_to_insurer(claim_id, caller, insurer, &mut self.ledger, now)?)
    }

    /// Pays the escrow to the holder after both validations
    #[instrument(skip(self), fields(claim_id = %claim_id, caller = %caller))]
    pub fn release_to_authority(&mut self, claim_id: ClaimId, caller: PartyId) -> EngineResult<Amount> {
        let now = self.clock.now();
        Ok(self
            .claims
            .release_to_authority(claim_id, caller, &mut self.ledger, now)?)
    }

    /// Withdraws an unfunded claim
    #[instrument(skip(self), fields(claim_id = %claim_id, caller = %caller))]
    pub fn revoke_claim(&mut self, claim_id: ClaimId, caller: PartyId) -> EngineResult<()> {
        let now = self.clock.now();
        Ok(self.claims.revoke(claim_id, caller, now)?)
    }

    pub fn claim(&self, claim_id: ClaimId) -> EngineResult<&InsuranceClaim> {
        Ok(self.claims.claim(claim_id)?)
    }

    pub fn claim_events(&self, claim_id: ClaimId) -> Vec<&ClaimEvent> {
        self.claims.events_for(claim_id)
    }

    /// Units currently held across all claim escrows
    pub fn total_escrowed(&self) -> Amount {
        self.claims.total_escrowed()
    }

    /// Ledger balance of a party
    pub fn balance_of(&self, party: PartyId) -> EngineResult<Amount> {
        Ok(self.ledger.balance(party)?)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn policies(&self) -> &PolicyStore {
        &self.policies
    }

    pub fn claims(&self) -> &ClaimLifecycle {
        &self.claims
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable ledger access for hosts that move currency outside claims
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn refused(&self, error: domain_claims::ClaimError) -> EngineError {
        let error = EngineError::from(error);
        if error.is_authorization() {
            warn!(kind = %error.kind(), error = %error, "Validation refused");
        }
        error
    }
}
