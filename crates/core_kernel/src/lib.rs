//! Core Kernel - Foundational types for the claims escrow engine
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Native currency amounts with checked arithmetic
//! - A clock abstraction supplying logical time
//! - Strongly-typed identifiers for parties and records
//! - Port errors surfaced by external collaborators

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Amount, MoneyError};
pub use temporal::{Clock, SystemClock, ManualClock};
pub use identifiers::{
    PartyId, PolicyId, ClaimId, CapabilityId, JournalEntryId,
};
pub use ports::{PortError, DomainPort};
pub use error::CoreError;
