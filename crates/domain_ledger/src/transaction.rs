//! Journal entry and posting types
//!
//! Each debit or credit applied to the ledger leaves one journal entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{Amount, JournalEntryId, PartyId};

/// Type of posting (debit or credit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostingType {
    /// Value leaves the account
    Debit,
    /// Value enters the account
    Credit,
}

/// The record a posting was made on behalf of
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Reference type (e.g., "claim", "deposit")
    pub reference_type: String,
    /// Reference ID
    pub reference_id: Uuid,
}

impl Reference {
    /// Creates a new reference
    pub fn new(reference_type: impl Into<String>, reference_id: impl Into<Uuid>) -> Self {
        Self {
            reference_type: reference_type.into(),
            reference_id: reference_id.into(),
        }
    }
}

/// A single applied posting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub account: PartyId,
    pub amount: Amount,
    pub posting_type: PostingType,
    pub reference: Reference,
    /// Account balance after the posting
    pub balance_after: Amount,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Returns true if this entry was made for `reference_id`
    pub fn refers_to(&self, reference_id: &Uuid) -> bool {
        &self.reference.reference_id == reference_id
    }
}
