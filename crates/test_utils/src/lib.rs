//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims escrow engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Fixed amounts, timestamps and claim references
//! - `builders`: A ready-wired engine and pre-staged claims
//! - `ledgers`: Ledger doubles that fail on demand
//! - `assertions`: Custom assertion helpers for engine state
//! - `generators`: Property-based operation generators

pub mod fixtures;
pub mod builders;
pub mod ledgers;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use ledgers::*;
pub use assertions::*;
pub use generators::*;
