//! Errors raised by the in-memory ledger runtime.

use crate::config::ConfigError;
use crate::contract::ContractError;
use crate::ledger::LedgerError;
use crate::registry::CodecError;
use thiserror::Error;

/// Reasons a transaction is rejected at commit time.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommitError {
    /// A key read by the transaction was changed by a transaction committed since.
    #[error("MVCC read conflict on {namespace}/{key}")]
    MvccReadConflict { namespace: String, key: String },

    #[error("Duplicate transaction id {0}")]
    DuplicateTxId(String),

    #[error("Ledger closed")]
    LedgerClosed,
}

/// Errors returned to callers of a peer.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("Contract {0} is not deployed")]
    UnknownContract(String),

    #[error("Contract {0} is already deployed")]
    AlreadyDeployed(String),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Ledger task failed: {0}")]
    Join(String),
}
