//! # Registry Errors
//!
//! One error enum covers both registries. Every variant is surfaced to the ledger
//! runtime as a failed transaction; none of them are retried here.

use crate::ledger::LedgerError;
use crate::registry::codec::CodecError;
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistryError {
    /// Any failure of the underlying ledger store client.
    #[error(transparent)]
    StoreUnavailable(#[from] LedgerError),

    /// Create was called for an id that already has a record.
    #[error("Cannot create world state pair with id {0}. Already exists")]
    AlreadyExists(String),

    /// Read or Update was called for an id without a record.
    #[error("No world state pair with id {0}")]
    NotFound(String),

    /// A stored record could not be decoded, or an entity could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A foreign key names a record the owning registry does not have.
    #[error("{kind} '{id}' does not exist")]
    InvalidReference { kind: String, id: String },
}
