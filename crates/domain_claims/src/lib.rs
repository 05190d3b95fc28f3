//! Claims Lifecycle Domain
//!
//! This crate implements the claim state machine and the escrow that holds
//! a claim's payout until one of the two release paths closes it.
//!
//! # Claim Lifecycle
//!
//! ```text
//!            create
//!              │
//!              ▼
//!   Open { validations, pending } ──edit_claim_id / fund / validate──┐
//!              │                        ▲                             │
//!              │                        └─────────────────────────────┘
//!              ├── release_to_insurer   (authority id declared)
//!              ├── release_to_authority (funded, both validations)
//!              └── revoke               (unfunded)
//!              ▼
//!           Closed  (terminal)
//! ```
//!
//! Escrow movements are only reachable through [`ClaimLifecycle`]
//! transitions; nothing outside this crate can touch an escrow balance.

pub mod claim;
pub mod escrow;
pub mod lifecycle;
pub mod events;
pub mod error;

pub use claim::{ClaimReference, ClaimStatus, ClosedVia, InsuranceClaim};
pub use escrow::Escrow;
pub use lifecycle::{ClaimLifecycle, LifecycleRules};
pub use events::ClaimEvent;
pub use error::{ClaimError, PendingReason};
