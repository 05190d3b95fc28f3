//! Ledger Domain - Native Currency Accounts
//!
//! The claims engine never owns currency. It asks a ledger to debit a
//! funding source when escrow is funded and to credit a destination when
//! escrow is released. This crate defines that contract (`LedgerPort`) and
//! an in-memory adapter that journals every posting.
//!
//! # Posting Rules
//!
//! - A debit fails without effect if the account holds less than requested
//! - A credit fails without effect if the balance would overflow
//! - Every successful posting is appended to the journal with a reference
//!   to the record that caused it
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_ledger::{InMemoryLedger, LedgerPort, Reference};
//!
//! let mut ledger = InMemoryLedger::new();
//! ledger.deposit(payer, Amount::new(1_000))?;
//!
//! let reference = Reference::new("claim", claim_uuid);
//! ledger.debit(payer, Amount::new(500), &reference)?;
//! ledger.credit(holder, Amount::new(500), &reference)?;
//! ```

pub mod ledger;
pub mod ports;
pub mod transaction;
pub mod error;

pub use ledger::InMemoryLedger;
pub use ports::LedgerPort;
pub use transaction::{JournalEntry, PostingType, Reference};
pub use error::LedgerError;
