//! Capability Registry Domain
//!
//! Every privileged mutation in the engine is gated by a capability: an
//! opaque token bound to a role and held by exactly one party.
//!
//! # Roles
//!
//! ```text
//! Admin ──issues──> Insurer
//!       └─issues──> Authority
//! ```
//!
//! The single Admin capability is produced by [`CapabilityRegistry::bootstrap`]
//! and cannot be re-created. Tokens can only be minted inside this crate,
//! are neither `Clone` nor deserializable, and are re-verified against the
//! registry's issued records on every check.

pub mod capability;
pub mod registry;
pub mod error;

pub use capability::{Capability, Role};
pub use registry::{CapabilityRegistry, CapabilityRecord};
pub use error::CapabilityError;
