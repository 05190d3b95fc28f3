//! Ports for external collaborators
//!
//! The engine depends on a ledger it does not own. Ledger adapters report
//! infrastructure failures through `PortError`, which domain errors wrap.

use thiserror::Error;

/// Error type for port operations
#[derive(Debug, Error)]
pub enum PortError {
    /// The external system is unavailable
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// The adapter rejected the call
    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl PortError {
    /// Creates a ServiceUnavailable error
    pub fn unavailable(service: impl Into<String>) -> Self {
        PortError::ServiceUnavailable {
            service: service.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
        }
    }
}

/// Marker trait for all domain ports
///
/// Ports must be shareable across threads so hosts can place the engine
/// behind whatever synchronization they use to serialize operations.
pub trait DomainPort: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_messages() {
        assert_eq!(
            PortError::unavailable("ledger").to_string(),
            "Service unavailable: ledger"
        );
        assert!(PortError::internal("corrupt journal")
            .to_string()
            .contains("corrupt journal"));
    }
}
