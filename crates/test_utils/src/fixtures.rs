//! Pre-built Test Fixtures
//!
//! Fixed values so that tests read the same way everywhere.

use chrono::{DateTime, Duration, TimeZone, Utc};
use once_cell::sync::Lazy;

use core_kernel::Amount;
use domain_claims::ClaimReference;

/// The instant every test clock starts at
pub static TEST_EPOCH: Lazy<DateTime<Utc>> =
    Lazy::new(|| Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap());

/// Fixture for amounts
pub struct AmountFixtures;

impl AmountFixtures {
    /// The default claim amount
    pub fn claim() -> Amount {
        Amount::new(500)
    }

    /// What every funded party starts with
    pub fn starting_balance() -> Amount {
        Amount::new(10_000)
    }

    /// A typical policy coverage amount
    pub fn coverage() -> Amount {
        Amount::new(250_000)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    pub fn epoch() -> DateTime<Utc> {
        *TEST_EPOCH
    }

    pub fn one_year_later() -> DateTime<Utc> {
        *TEST_EPOCH + Duration::days(365)
    }

    pub fn one_second_earlier() -> DateTime<Utc> {
        *TEST_EPOCH - Duration::seconds(1)
    }
}

/// Fixture for claim identifiers assigned by insurer and authority
pub struct ReferenceFixtures;

impl ReferenceFixtures {
    pub fn insurer() -> ClaimReference {
        ClaimReference::new(1001)
    }

    pub fn authority() -> ClaimReference {
        ClaimReference::new(2002)
    }

    pub fn undeclared() -> ClaimReference {
        ClaimReference::UNDECLARED
    }
}
