//! Test Data Builders
//!
//! `TestEngineBuilder` produces an engine on a manual clock with one party
//! per role already holding its capability and a starting balance.
//! `ClaimScenarioBuilder` then stages a claim at any point of its
//! lifecycle so tests only spell out the step they are about.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use claims_engine::{EngineConfig, EngineResult, InsuranceEngine};
use core_kernel::{Amount, ClaimId, ManualClock, PartyId};
use domain_capability::{Capability, Role};
use domain_claims::ClaimReference;
use domain_ledger::{InMemoryLedger, LedgerPort};

use crate::fixtures::{AmountFixtures, ReferenceFixtures, TemporalFixtures};
use crate::generators::{Action, Actor, ClaimOp};

/// An engine together with the parties and capabilities wired into it
pub struct TestEngine<L: LedgerPort = InMemoryLedger> {
    pub engine: InsuranceEngine<L, Arc<ManualClock>>,
    pub clock: Arc<ManualClock>,
    pub admin: PartyId,
    pub admin_cap: Capability,
    pub insurer: PartyId,
    pub insurer_cap: Capability,
    pub authority: PartyId,
    pub authority_cap: Capability,
    /// Default claim holder
    pub holder: PartyId,
    /// Holds no capability
    pub stranger: PartyId,
}

/// Builder for a wired test engine
pub struct TestEngineBuilder {
    config: EngineConfig,
    start: DateTime<Utc>,
    starting_balance: Amount,
    balances: Vec<(PartyId, Amount)>,
}

impl Default for TestEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            start: TemporalFixtures::epoch(),
            starting_balance: AmountFixtures::starting_balance(),
            balances: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn edit_requires_funding(mut self, required: bool) -> Self {
        self.config.edit_requires_funding = required;
        self
    }

    pub fn without_events(mut self) -> Self {
        self.config.record_events = false;
        self
    }

    pub fn starting_at(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    /// Balance deposited for each built-in party
    pub fn with_starting_balance(mut self, amount: Amount) -> Self {
        self.starting_balance = amount;
        self
    }

    /// Deposits `amount` for an additional party
    pub fn with_balance(mut self, party: PartyId, amount: Amount) -> Self {
        self.balances.push((party, amount));
        self
    }

    /// Builds on an in-memory ledger with every party funded
    pub fn build(self) -> TestEngine {
        let starting_balance = self.starting_balance;
        let balances = self.balances.clone();
        let mut env = self.build_with_ledger(InMemoryLedger::new());

        if starting_balance.is_positive() {
            for party in [env.holder, env.insurer, env.authority, env.stranger] {
                env.deposit(party, starting_balance);
            }
        }
        for (party, amount) in balances {
            env.deposit(party, amount);
        }
        env
    }

    /// Builds on a caller-supplied ledger; no deposits are made
    pub fn build_with_ledger<L: LedgerPort>(self, ledger: L) -> TestEngine<L> {
        let clock = Arc::new(ManualClock::new(self.start));
        let admin = PartyId::new_v7();
        let (mut engine, admin_cap) =
            InsuranceEngine::bootstrap(admin, ledger, Arc::clone(&clock), self.config);

        let insurer = PartyId::new_v7();
        let authority = PartyId::new_v7();
        let insurer_cap = engine
            .issue_capability(Role::Insurer, insurer, &admin_cap, admin)
            .expect("admin issues insurer capability");
        let authority_cap = engine
            .issue_capability(Role::Authority, authority, &admin_cap, admin)
            .expect("admin issues authority capability");

        TestEngine {
            engine,
            clock,
            admin,
            admin_cap,
            insurer,
            insurer_cap,
            authority,
            authority_cap,
            holder: PartyId::new_v7(),
            stranger: PartyId::new_v7(),
        }
    }
}

impl TestEngine {
    /// Creates a new party holding `amount`
    pub fn funded_party(&mut self, amount: Amount) -> PartyId {
        let party = PartyId::new_v7();
        self.deposit(party, amount);
        party
    }

    pub fn deposit(&mut self, party: PartyId, amount: Amount) {
        self.engine
            .ledger_mut()
            .deposit(party, amount)
            .expect("deposit into test ledger");
    }

    /// Ledger balance of `party`
    pub fn balance(&self, party: PartyId) -> Amount {
        self.engine.ledger().balance(party).expect("in-memory balance")
    }

    /// Ledger supply plus everything held in escrow
    pub fn total_value(&self) -> Amount {
        let supply = self.engine.ledger().total_supply();
        supply
            .checked_add(self.engine.total_escrowed())
            .expect("test totals fit in u64")
    }
}

impl<L: LedgerPort> TestEngine<L> {
    /// Starts staging a claim
    pub fn claim(&mut self) -> ClaimScenarioBuilder<'_, L> {
        ClaimScenarioBuilder::new(self)
    }

    /// Moves logical time forward
    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    /// Resolves an actor to a party for a claim held by `holder`
    pub fn party(&self, actor: Actor, holder: PartyId) -> PartyId {
        match actor {
            Actor::Holder => holder,
            Actor::Insurer => self.insurer,
            Actor::Authority => self.authority,
            Actor::Stranger => self.stranger,
        }
    }

    /// Applies a generated operation to a claim
    pub fn apply(&mut self, claim_id: ClaimId, holder: PartyId, op: &ClaimOp) -> EngineResult<()> {
        let caller = self.party(op.actor, holder);
        let capability = match (op.actor, &op.action) {
            (Actor::Insurer, _) => &self.insurer_cap,
            (Actor::Authority, _) => &self.authority_cap,
            (_, Action::ValidateByAuthority) => &self.authority_cap,
            _ => &self.insurer_cap,
        };

        match &op.action {
            Action::Fund { offered } => self.engine.fund_claim(claim_id, caller, *offered).map(|_| ()),
            Action::ValidateWithInsurer => self.engine.validate_with_insurer(claim_id, caller, capability),
            Action::ValidateByAuthority => self.engine.validate_by_authority(claim_id, caller, capability),
            Action::EditClaimId { authority_id } => {
                self.engine
                    .edit_claim_id(claim_id, caller, ClaimReference::new(*authority_id))
            }
            Action::ReleaseToInsurer => self
                .engine
                .release_to_insurer(claim_id, caller, self.insurer)
                .map(|_| ()),
            Action::ReleaseToAuthority => self.engine.release_to_authority(claim_id, caller).map(|_| ()),
            Action::Revoke => self.engine.revoke_claim(claim_id, caller),
        }
    }
}

/// A staged claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimScenario {
    pub claim_id: ClaimId,
    pub holder: PartyId,
    pub amount: Amount,
}

/// Builder that stages a claim through creation, funding and validation
pub struct ClaimScenarioBuilder<'a, L: LedgerPort> {
    env: &'a mut TestEngine<L>,
    holder: PartyId,
    amount: Amount,
    insurer_ref: ClaimReference,
    authority_ref: ClaimReference,
    funded: bool,
    insurer_validated: bool,
    authority_validated: bool,
}

impl<'a, L: LedgerPort> ClaimScenarioBuilder<'a, L> {
    fn new(env: &'a mut TestEngine<L>) -> Self {
        let holder = env.holder;
        Self {
            env,
            holder,
            amount: AmountFixtures::claim(),
            insurer_ref: ReferenceFixtures::insurer(),
            authority_ref: ReferenceFixtures::undeclared(),
            funded: false,
            insurer_validated: false,
            authority_validated: false,
        }
    }

    pub fn held_by(mut self, holder: PartyId) -> Self {
        self.holder = holder;
        self
    }

    pub fn amount(mut self, amount: Amount) -> Self {
        self.amount = amount;
        self
    }

    /// Declares the authority identifier at creation
    pub fn declared(mut self) -> Self {
        self.authority_ref = ReferenceFixtures::authority();
        self
    }

    /// Holder funds the escrow with exactly the claim amount
    pub fn funded(mut self) -> Self {
        self.funded = true;
        self
    }

    pub fn validated_by_insurer(mut self) -> Self {
        self.insurer_validated = true;
        self
    }

    pub fn validated_by_authority(mut self) -> Self {
        self.authority_validated = true;
        self
    }

    /// Funded and validated by both parties
    pub fn ready_for_authority_release(self) -> Self {
        self.funded().validated_by_insurer().validated_by_authority()
    }

    pub fn build(self) -> ClaimScenario {
        let env = self.env;
        let claim_id = env
            .engine
            .create_claim(self.holder, self.insurer_ref, self.authority_ref, self.amount)
            .expect("create claim");

        if self.funded {
            env.engine
                .fund_claim(claim_id, self.holder, self.amount)
                .expect("fund claim");
        }
        if self.insurer_validated {
            env.engine
                .validate_with_insurer(claim_id, env.insurer, &env.insurer_cap)
                .expect("insurer validation");
        }
        if self.authority_validated {
            env.engine
                .validate_by_authority(claim_id, env.authority, &env.authority_cap)
                .expect("authority validation");
        }

        ClaimScenario {
            claim_id,
            holder: self.holder,
            amount: self.amount,
        }
    }
}
