//! Policy Store Domain
//!
//! Holds insurance policy records. A policy belongs to the party that
//! created it; only that holder may toggle it or read its coverage terms.
//!
//! # Policy Lifecycle
//!
//! ```text
//! create (holder) -> Active <-> Inactive   (toggled any number of times)
//! ```
//!
//! Policies are never deleted. An expiration timestamp, when present, is
//! validated at creation and kept for information only.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::PolicyStore;
//!
//! let mut store = PolicyStore::new();
//! let policy_id = store.create(holder, Amount::new(1000), None, now)?;
//! store.deactivate(policy_id, holder, now)?;
//! assert!(!store.is_policy_active(policy_id)?);
//! ```

pub mod policy;
pub mod store;
pub mod events;
pub mod error;

pub use policy::InsurancePolicy;
pub use store::PolicyStore;
pub use events::PolicyEvent;
pub use error::PolicyError;
