//! Ledger store client: the contract-facing view of the world state.
//!
//! # Main Components
//!
//! - [`TransactionContext`] - Transaction-scoped get/put, query, history and invoke
//! - [`Cursor`] - Scoped result handle released on close or drop
//! - [`Selector`] - The rich query subset the registries rely on
//! - [`LedgerError`] - Store-level failures

pub mod cursor;
pub mod error;
pub mod selector;
pub mod stub;

pub use cursor::Cursor;
pub use error::LedgerError;
pub use selector::{Condition, Selector};
pub use stub::{InvokeResponse, KeyModification, KeyValue, QueryMetadata, TransactionContext};
