//! Errors raised by a ledger store client.

use thiserror::Error;

/// Failures reaching or using the ledger's world state.
///
/// None of these are retried by the registries; they surface as transaction failures.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    /// The runtime backing the transaction could not be reached.
    #[error("Unable to interact with world state: {0}")]
    Unavailable(String),

    /// Keys must be non-empty strings.
    #[error("Key must not be empty")]
    EmptyKey,

    /// A rich query could not be parsed or uses an unsupported operator.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}
