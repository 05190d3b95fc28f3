//! Claims Escrow Engine
//!
//! The single entry point for hosts. `InsuranceEngine` wires the capability
//! registry, the policy store and the claim lifecycle to a ledger and a
//! clock, and reports every failure as an [`EngineError`] whose
//! [`ErrorKind`] callers can match on.
//!
//! # Architecture
//!
//! - **engine**: one method per operation, each traced with `#[instrument]`
//! - **error**: unified error type flattened into `ErrorKind`
//! - **config**: `CLAIMS_*` environment configuration
//! - **telemetry**: tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use claims_engine::InsuranceEngine;
//! use domain_capability::Role;
//!
//! let (mut engine, admin_cap) = InsuranceEngine::in_memory(admin);
//! let insurer_cap = engine.issue_capability(Role::Insurer, insurer, &admin_cap, admin)?;
//!
//! let claim = engine.create_claim(holder, insurer_ref, authority_ref, Amount::new(500))?;
//! engine.fund_claim(claim, holder, Amount::new(500))?;
//! engine.validate_with_insurer(claim, insurer, &insurer_cap)?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod telemetry;

pub use config::{EngineConfig, LogFormat};
pub use engine::InsuranceEngine;
pub use error::{EngineError, EngineResult, ErrorKind};
pub use telemetry::init_tracing;
