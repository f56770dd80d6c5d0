//! # Transaction Context
//!
//! The [`TransactionContext`] trait is everything a contract may ask of the ledger
//! while a transaction is being executed. The ledger runtime creates one context per
//! invocation and commits or discards its writes once the contract returns.

use crate::ledger::{Cursor, LedgerError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One row of a rich query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// One committed revision of a key, as replayed from its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyModification {
    pub tx_id: String,
    pub value: Vec<u8>,
    /// Commit time in nanoseconds since the Unix epoch.
    pub timestamp: i64,
    pub is_delete: bool,
}

/// Pagination details returned alongside a query cursor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryMetadata {
    pub fetched_records_count: usize,
    /// Key to pass back as `bookmark` to fetch the next page. Empty when exhausted.
    pub bookmark: String,
}

/// Reply to a nested contract invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub status: u16,
    pub message: String,
    pub payload: Vec<u8>,
}

impl InvokeResponse {
    pub const OK: u16 = 200;
    pub const ERROR: u16 = 500;

    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: Self::OK,
            message: String::new(),
            payload,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Self::ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Self::OK
    }
}

/// Transaction-scoped access to the ledger.
///
/// Writes issued through [`put_state`](TransactionContext::put_state) join the
/// enclosing transaction's write set; nothing is visible to other transactions until
/// the runtime commits. Conflicting concurrent writers are rejected at commit time by
/// the runtime, never by the caller.
#[async_trait]
pub trait TransactionContext: Send + Sync {
    /// Identifier of the enclosing transaction.
    fn tx_id(&self) -> &str;

    /// Proposal time in nanoseconds since the Unix epoch.
    fn timestamp(&self) -> i64;

    /// Point lookup of the committed value at `key`. Absence is `Ok(None)`.
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Upserts `key` within the enclosing transaction.
    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Runs a rich query. A `page_size` of zero returns every match; `bookmark`
    /// resumes after a previous page (empty to start from the beginning).
    async fn get_query_result_with_pagination(
        &self,
        query: &str,
        page_size: u32,
        bookmark: &str,
    ) -> Result<(Cursor<KeyValue>, QueryMetadata), LedgerError>;

    /// Replays every committed revision of `key`, oldest first.
    async fn get_history_for_key(&self, key: &str) -> Result<Cursor<KeyModification>, LedgerError>;

    /// Invokes another deployed contract inside this transaction.
    ///
    /// `args[0]` names the entry point. Contract-level failures come back as a
    /// non-success [`InvokeResponse`]; `Err` means the runtime itself failed.
    async fn invoke_contract(
        &self,
        target: &str,
        args: Vec<String>,
    ) -> Result<InvokeResponse, LedgerError>;
}
