//! # Memory Transaction Context
//!
//! `MemoryContext` is the [`TransactionContext`] the in-memory peer hands to a contract
//! while executing one proposal.
//!
//! - Reads go to the ledger actor and see committed state only. The version observed
//!   for each `get_state` joins the read set.
//! - Writes are buffered in the write set; the last write to a key wins.
//! - A nested `invoke_contract` runs the target contract against the same read and
//!   write sets, scoped to the target's namespace.

use crate::contract::Contract;
use crate::ledger::{
    Cursor, InvokeResponse, KeyModification, KeyValue, LedgerError, QueryMetadata, Selector,
    TransactionContext,
};
use crate::runtime::client::LedgerClient;
use crate::runtime::world_state::{ReadRecord, TxRwSet, WriteRecord};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use tracing::{debug, warn};

/// Contracts deployed on a peer, by name.
pub type Contracts = Arc<RwLock<HashMap<String, Arc<dyn Contract>>>>;

type NsKey = (String, String);

#[derive(Default)]
struct RwSet {
    reads: BTreeMap<NsKey, Option<u64>>,
    writes: BTreeMap<NsKey, Vec<u8>>,
}

/// Transaction context over the in-memory ledger.
#[derive(Clone)]
pub struct MemoryContext {
    namespace: String,
    tx_id: String,
    timestamp: i64,
    rw_set: Arc<Mutex<RwSet>>,
    ledger: LedgerClient,
    contracts: Contracts,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryContext {
    pub fn new(
        namespace: impl Into<String>,
        tx_id: impl Into<String>,
        timestamp: i64,
        ledger: LedgerClient,
        contracts: Contracts,
        open_cursors: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            tx_id: tx_id.into(),
            timestamp,
            rw_set: Arc::new(Mutex::new(RwSet::default())),
            ledger,
            contracts,
            open_cursors,
        }
    }

    /// The same transaction, scoped to another contract's namespace.
    fn nested(&self, namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            ..self.clone()
        }
    }

    /// Drains the read and write sets accumulated so far.
    pub fn take_rw_set(&self) -> Result<TxRwSet, LedgerError> {
        let rw_set = std::mem::take(&mut *self.lock()?);
        Ok(TxRwSet {
            tx_id: self.tx_id.clone(),
            timestamp: self.timestamp,
            reads: rw_set
                .reads
                .into_iter()
                .map(|((namespace, key), version)| ReadRecord {
                    namespace,
                    key,
                    version,
                })
                .collect(),
            writes: rw_set
                .writes
                .into_iter()
                .map(|((namespace, key), value)| WriteRecord {
                    namespace,
                    key,
                    value,
                })
                .collect(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, RwSet>, LedgerError> {
        self.rw_set
            .lock()
            .map_err(|_| LedgerError::Unavailable("transaction state poisoned".into()))
    }

    fn ns_key(&self, key: &str) -> NsKey {
        (self.namespace.clone(), key.to_string())
    }

    fn contract(&self, name: &str) -> Result<Option<Arc<dyn Contract>>, LedgerError> {
        let contracts = self
            .contracts
            .read()
            .map_err(|_| LedgerError::Unavailable("contract table poisoned".into()))?;
        Ok(contracts.get(name).cloned())
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
impl TransactionContext for MemoryContext {
    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }

    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }
        let stored = self.ledger.get(&self.namespace, key).await?;
        self.lock()?
            .reads
            .entry(self.ns_key(key))
            .or_insert(stored.as_ref().map(|s| s.version));
        Ok(stored.map(|s| s.value))
    }

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }
        self.lock()?.writes.insert(self.ns_key(key), value);
        Ok(())
    }

    async fn get_query_result_with_pagination(
        &self,
        query: &str,
        page_size: u32,
        bookmark: &str,
    ) -> Result<(Cursor<KeyValue>, QueryMetadata), LedgerError> {
        let selector = Selector::parse(query)?;
        let (rows, metadata) = self
            .ledger
            .query(&self.namespace, selector, page_size, bookmark)
            .await?;
        Ok((self.cursor(rows), metadata))
    }

    async fn get_history_for_key(&self, key: &str) -> Result<Cursor<KeyModification>, LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::EmptyKey);
        }
        let revisions = self.ledger.history(&self.namespace, key).await?;
        Ok(self.cursor(revisions))
    }

    async fn invoke_contract(
        &self,
        target: &str,
        args: Vec<String>,
    ) -> Result<InvokeResponse, LedgerError> {
        let Some(contract) = self.contract(target)? else {
            warn!(%target, "Invoke of undeployed contract");
            return Ok(InvokeResponse::error(format!("contract {target} is not deployed")));
        };
        let Some((function, rest)) = args.split_first() else {
            return Ok(InvokeResponse::error("missing entry point name"));
        };

        debug!(caller = %self.namespace, %target, %function, "Nested invoke");
        let nested = self.nested(target);
        match contract.invoke(&nested, function, rest).await {
            Ok(payload) => Ok(InvokeResponse::success(payload)),
            Err(e) => Ok(InvokeResponse::error(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::runtime::actor::LedgerActor;

    fn context(ledger: LedgerClient) -> MemoryContext {
        MemoryContext::new(
            "ns",
            "tx1",
            7,
            ledger,
            Arc::new(RwLock::new(HashMap::new())),
            Arc::new(AtomicUsize::new(0)),
        )
    }

    #[tokio::test]
    async fn test_writes_are_buffered_not_visible() {
        let (actor, ledger) = LedgerActor::new(&Config::default());
        let handle = tokio::spawn(actor.run());
        let ctx = context(ledger.clone());

        assert_eq!(ctx.get_state("k").await.unwrap(), None);
        ctx.put_state("k", b"{}".to_vec()).await.unwrap();
        ctx.put_state("k", b"{\"v\":2}".to_vec()).await.unwrap();
        assert_eq!(ctx.get_state("k").await.unwrap(), None);

        let rw_set = ctx.take_rw_set().unwrap();
        assert_eq!(rw_set.tx_id, "tx1");
        assert_eq!(rw_set.timestamp, 7);
        assert_eq!(rw_set.reads.len(), 1);
        assert_eq!(rw_set.reads[0].version, None);
        assert_eq!(rw_set.writes.len(), 1);
        assert_eq!(rw_set.writes[0].value, b"{\"v\":2}".to_vec());

        ledger.shutdown().await;
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_keys_are_rejected() {
        let (actor, ledger) = LedgerActor::new(&Config::default());
        let handle = tokio::spawn(actor.run());
        let ctx = context(ledger.clone());

        assert_eq!(ctx.put_state("", vec![]).await, Err(LedgerError::EmptyKey));
        assert_eq!(ctx.get_state("").await, Err(LedgerError::EmptyKey));

        ledger.shutdown().await;
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_cursors_are_counted_until_dropped() {
        let (actor, ledger) = LedgerActor::new(&Config::default());
        let handle = tokio::spawn(actor.run());
        let ctx = context(ledger.clone());

        let (cursor, metadata) = ctx
            .get_query_result_with_pagination(r#"{"selector":{"id":{"$ne":"-"}}}"#, 0, "")
            .await
            .unwrap();
        assert_eq!(metadata.fetched_records_count, 0);
        assert_eq!(ctx.open_cursors.load(Ordering::SeqCst), 1);
        drop(cursor);
        assert_eq!(ctx.open_cursors.load(Ordering::SeqCst), 0);

        assert!(matches!(
            ctx.get_query_result_with_pagination(r#"{"selector":{"id":{"$gt":1}}}"#, 0, "")
                .await,
            Err(LedgerError::InvalidQuery(_))
        ));

        ledger.shutdown().await;
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_invoking_an_undeployed_contract_is_an_error_response() {
        let (actor, ledger) = LedgerActor::new(&Config::default());
        let handle = tokio::spawn(actor.run());
        let ctx = context(ledger.clone());

        let response = ctx
            .invoke_contract("missing", vec!["Read".into(), "x".into()])
            .await
            .unwrap();
        assert!(!response.is_success());
        assert_eq!(response.status, InvokeResponse::ERROR);

        ledger.shutdown().await;
        handle.await.unwrap();
    }
}
