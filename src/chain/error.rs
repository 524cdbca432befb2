//! Error types for the chain data access layer.

use thiserror::Error;

/// Errors surfaced by the data access layer.
///
/// Configuration and Wallet errors indicate setup or caller defects and are
/// always propagated. Rpc and Decode errors are transient or data-shaped;
/// collection reads degrade to safe defaults instead of surfacing them, and
/// write paths fold them into a failed [`crate::domain::TxOutcome`].
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing or invalid contract addresses for the active chain
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport or node failure while reading or submitting
    #[error("rpc error: {0}")]
    Rpc(String),

    /// A chain response did not match any expected shape
    #[error("decode error: {0}")]
    Decode(String),

    /// A record the caller asked for by id does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u64 },

    /// Wallet or chain client missing or unusable; caller misuse
    #[error("wallet error: {0}")]
    Wallet(String),

    /// Amount could not be converted between representations
    #[error("unit conversion error: {0}")]
    Units(String),

    /// A prerequisite transaction (e.g. token approval) reverted
    #[error("transaction failed: {0}")]
    Transaction(String),
}

impl ServiceError {
    /// True for errors that must reach the caller even on paths that
    /// otherwise degrade to defaults or result objects.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ServiceError::Configuration(_) | ServiceError::Wallet(_)
        )
    }
}

/// Result alias for data access operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(ServiceError::Configuration("no addresses".into()).is_fatal());
        assert!(ServiceError::Wallet("no account".into()).is_fatal());
        assert!(!ServiceError::Rpc("timeout".into()).is_fatal());
        assert!(!ServiceError::Decode("bad tuple".into()).is_fatal());
    }

    #[test]
    fn not_found_message() {
        let e = ServiceError::NotFound {
            entity: "policy",
            id: 7,
        };
        assert_eq!(e.to_string(), "policy not found: 7");
    }
}
