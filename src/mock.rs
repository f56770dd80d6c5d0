//! # Mock Transaction Context
//!
//! `MockStub` implements [`TransactionContext`] from a queue of scripted expectations,
//! so registry and validator logic can be tested without a ledger runtime.
//!
//! ## When to use the mock vs the in-memory runtime
//!
//! | Feature | MockStub | `runtime::Peer` |
//! |---------|----------|-----------------|
//! | **State** | None, replies are scripted | Real world state and history |
//! | **Error Injection** | Easy (`return_err`) | Hard |
//! | **Use Case** | One operation, exact store calls | Contracts end to end |
//!
//! Expectations are consumed in order. A call that does not match the next expectation
//! panics, and [`MockStub::verify`] panics if any expectation was left unused.
//!
//! ```rust
//! use ledger_registry::mock::MockStub;
//! use ledger_registry::model::{ResourceType, ResourceTypeCreate};
//! use ledger_registry::registry::{Registry, RegistryError};
//! use ledger_registry::ledger::LedgerError;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut stub = MockStub::new();
//!     stub.expect_get("rt1")
//!         .return_err(LedgerError::Unavailable("peer restarting".into()));
//!
//!     let registry = Registry::<ResourceType>::new(());
//!     let params = ResourceTypeCreate { name: "Vehicle".into() };
//!     let result = registry.create(&stub, "rt1", params).await;
//!
//!     assert!(matches!(result, Err(RegistryError::StoreUnavailable(_))));
//!     stub.verify();
//! }
//! ```

use crate::ledger::{
    Cursor, InvokeResponse, KeyModification, KeyValue, LedgerError, QueryMetadata,
    TransactionContext,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected call on the mock context and the reply to give.
enum Expectation {
    Get {
        key: String,
        response: Result<Option<Vec<u8>>, LedgerError>,
    },
    Put {
        key: String,
        response: Result<(), LedgerError>,
    },
    Query {
        response: Result<(Vec<KeyValue>, String), LedgerError>,
    },
    History {
        key: String,
        response: Result<Vec<KeyModification>, LedgerError>,
    },
    Invoke {
        target: String,
        response: Result<InvokeResponse, LedgerError>,
    },
}

#[derive(Default)]
struct Recorded {
    writes: HashMap<String, Vec<u8>>,
    queries: Vec<String>,
    bookmarks: Vec<String>,
    invocations: Vec<(String, Vec<String>)>,
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// A scripted transaction context.
pub struct MockStub {
    tx_id: String,
    timestamp: i64,
    expectations: Expectations,
    recorded: Mutex<Recorded>,
    open_cursors: Arc<AtomicUsize>,
}

impl Default for MockStub {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStub {
    /// Creates a mock with no expectations.
    pub fn new() -> Self {
        Self {
            tx_id: "mock-tx".to_string(),
            timestamp: 0,
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            recorded: Mutex::new(Recorded::default()),
            open_cursors: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Expects a `get_state` of `key`.
    pub fn expect_get(&mut self, key: impl Into<String>) -> GetExpectationBuilder {
        GetExpectationBuilder {
            key: key.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `put_state` of `key`.
    pub fn expect_put(&mut self, key: impl Into<String>) -> PutExpectationBuilder {
        PutExpectationBuilder {
            key: key.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a rich query. The query text is recorded, see [`MockStub::queries`].
    pub fn expect_query(&mut self) -> QueryExpectationBuilder {
        QueryExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a history replay of `key`.
    pub fn expect_history(&mut self, key: impl Into<String>) -> HistoryExpectationBuilder {
        HistoryExpectationBuilder {
            key: key.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a nested invocation of `target`.
    pub fn expect_invoke(&mut self, target: impl Into<String>) -> InvokeExpectationBuilder {
        InvokeExpectationBuilder {
            target: target.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    /// The last value written to `key`, if any.
    pub fn written(&self, key: &str) -> Option<Vec<u8>> {
        self.recorded.lock().unwrap().writes.get(key).cloned()
    }

    /// Query strings received, in order.
    pub fn queries(&self) -> Vec<String> {
        self.recorded.lock().unwrap().queries.clone()
    }

    /// Bookmarks passed alongside each query, in order.
    pub fn bookmarks(&self) -> Vec<String> {
        self.recorded.lock().unwrap().bookmarks.clone()
    }

    /// Nested invocations received, in order.
    pub fn invocations(&self) -> Vec<(String, Vec<String>)> {
        self.recorded.lock().unwrap().invocations.clone()
    }

    /// Cursors handed out and not yet released.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    fn next_expectation(&self) -> Option<Expectation> {
        self.expectations.lock().unwrap().pop_front()
    }

    fn cursor<T: Send + 'static>(&self, rows: Vec<T>) -> Cursor<T> {
        let open = self.open_cursors.clone();
        open.fetch_add(1, Ordering::SeqCst);
        Cursor::new(rows.into_iter().map(Ok), move || {
            open.fetch_sub(1, Ordering::SeqCst);
        })
    }
}

#[async_trait]
impl TransactionContext for MockStub {
    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }

    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        match self.next_expectation() {
            Some(Expectation::Get { key: expected, response }) if expected == key => response,
            _ => panic!("Unexpected get_state({key}) or expectation mismatch"),
        }
    }

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        match self.next_expectation() {
            Some(Expectation::Put { key: expected, response }) if expected == key => {
                if response.is_ok() {
                    self.recorded
                        .lock()
                        .unwrap()
                        .writes
                        .insert(key.to_string(), value);
                }
                response
            }
            _ => panic!("Unexpected put_state({key}) or expectation mismatch"),
        }
    }

    async fn get_query_result_with_pagination(
        &self,
        query: &str,
        _page_size: u32,
        bookmark: &str,
    ) -> Result<(Cursor<KeyValue>, QueryMetadata), LedgerError> {
        {
            let mut recorded = self.recorded.lock().unwrap();
            recorded.queries.push(query.to_string());
            recorded.bookmarks.push(bookmark.to_string());
        }
        match self.next_expectation() {
            Some(Expectation::Query { response }) => {
                let (rows, bookmark) = response?;
                let metadata = QueryMetadata {
                    fetched_records_count: rows.len(),
                    bookmark,
                };
                Ok((self.cursor(rows), metadata))
            }
            _ => panic!("Unexpected query {query} or expectation mismatch"),
        }
    }

    async fn get_history_for_key(&self, key: &str) -> Result<Cursor<KeyModification>, LedgerError> {
        match self.next_expectation() {
            Some(Expectation::History { key: expected, response }) if expected == key => {
                Ok(self.cursor(response?))
            }
            _ => panic!("Unexpected get_history_for_key({key}) or expectation mismatch"),
        }
    }

    async fn invoke_contract(
        &self,
        target: &str,
        args: Vec<String>,
    ) -> Result<InvokeResponse, LedgerError> {
        self.recorded
            .lock()
            .unwrap()
            .invocations
            .push((target.to_string(), args));
        match self.next_expectation() {
            Some(Expectation::Invoke { target: expected, response }) if expected == target => {
                response
            }
            _ => panic!("Unexpected invoke_contract({target}) or expectation mismatch"),
        }
    }
}

/// Builder for `get_state` expectations.
pub struct GetExpectationBuilder {
    key: String,
    expectations: Expectations,
}

impl GetExpectationBuilder {
    pub fn return_ok(self, value: Option<Vec<u8>>) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: LedgerError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Option<Vec<u8>>, LedgerError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Get {
            key: self.key,
            response,
        });
    }
}

/// Builder for `put_state` expectations.
pub struct PutExpectationBuilder {
    key: String,
    expectations: Expectations,
}

impl PutExpectationBuilder {
    pub fn return_ok(self, value: ()) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: LedgerError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<(), LedgerError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Put {
            key: self.key,
            response,
        });
    }
}

/// Builder for query expectations.
pub struct QueryExpectationBuilder {
    expectations: Expectations,
}

impl QueryExpectationBuilder {
    /// Replies with `rows` as the final page.
    pub fn return_ok(self, rows: Vec<KeyValue>) {
        self.push(Ok((rows, String::new())));
    }

    /// Replies with `rows` and a bookmark announcing more results.
    pub fn return_page(self, rows: Vec<KeyValue>, bookmark: impl Into<String>) {
        self.push(Ok((rows, bookmark.into())));
    }

    pub fn return_err(self, error: LedgerError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<(Vec<KeyValue>, String), LedgerError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Query { response });
    }
}

/// Builder for history expectations.
pub struct HistoryExpectationBuilder {
    key: String,
    expectations: Expectations,
}

impl HistoryExpectationBuilder {
    pub fn return_ok(self, revisions: Vec<KeyModification>) {
        self.push(Ok(revisions));
    }

    pub fn return_err(self, error: LedgerError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Vec<KeyModification>, LedgerError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::History {
            key: self.key,
            response,
        });
    }
}

/// Builder for nested invocation expectations.
pub struct InvokeExpectationBuilder {
    target: String,
    expectations: Expectations,
}

impl InvokeExpectationBuilder {
    pub fn return_ok(self, response: InvokeResponse) {
        self.push(Ok(response));
    }

    pub fn return_err(self, error: LedgerError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<InvokeResponse, LedgerError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Invoke {
            target: self.target,
            response,
        });
    }
}
