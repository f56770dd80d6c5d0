//! Errors returned by contract entry points.

use crate::registry::{CodecError, RegistryError};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ContractError {
    #[error("Unknown entry point: {0}")]
    UnknownFunction(String),

    #[error("Entry point {function} expects {expected} arguments, got {got}")]
    InvalidArguments {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
