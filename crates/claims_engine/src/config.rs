//! Engine configuration
//!
//! Values come from `CLAIMS_*` environment variables (a `.env` file is
//! honored when present) and fall back to the defaults below.
//!
//! | Variable | Default |
//! |---|---|
//! | `CLAIMS_LOG_LEVEL` | `info` |
//! | `CLAIMS_LOG_FORMAT` | `pretty` |
//! | `CLAIMS_EDIT_REQUIRES_FUNDING` | `false` |
//! | `CLAIMS_RECORD_EVENTS` | `true` |

use anyhow::Context;
use serde::Deserialize;

use core_kernel::CoreError;
use domain_claims::LifecycleRules;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Filter directive for the tracing subscriber
    pub log_level: String,
    pub log_format: LogFormat,
    /// Reject `edit_claim_id` on claims whose escrow is not yet funded
    pub edit_requires_funding: bool,
    /// Keep an in-memory journal of claim and policy events
    pub record_events: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            edit_requires_funding: false,
            record_events: true,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from `CLAIMS_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("CLAIMS").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Reads `.env`, then the environment, then validates the result
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_env().context("failed to read CLAIMS_* configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values the type system cannot
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.log_level.trim().is_empty() {
            return Err(CoreError::configuration("log_level must not be empty"));
        }
        Ok(())
    }

    /// Transition rules handed to the claim lifecycle
    pub fn lifecycle_rules(&self) -> LifecycleRules {
        LifecycleRules {
            edit_requires_funding: self.edit_requires_funding,
            record_events: self.record_events,
        }
    }
}
