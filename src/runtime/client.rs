//! # Ledger Client
//!
//! Cheap, cloneable handle for sending requests to the [`LedgerActor`](super::LedgerActor).

use crate::ledger::{KeyModification, KeyValue, LedgerError, QueryMetadata, Selector};
use crate::runtime::actor::LedgerRequest;
use crate::runtime::world_state::{TxRwSet, VersionedValue};
use crate::runtime::CommitError;
use tokio::sync::{mpsc, oneshot};

fn closed() -> LedgerError {
    LedgerError::Unavailable("ledger closed".into())
}

#[derive(Clone)]
pub struct LedgerClient {
    sender: mpsc::Sender<LedgerRequest>,
}

impl LedgerClient {
    pub fn new(sender: mpsc::Sender<LedgerRequest>) -> Self {
        Self { sender }
    }

    pub async fn get(&self, namespace: &str, key: &str) -> Result<Option<VersionedValue>, LedgerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(LedgerRequest::Get {
                namespace: namespace.to_string(),
                key: key.to_string(),
                respond_to,
            })
            .await
            .map_err(|_| closed())?;
        response.await.map_err(|_| closed())
    }

    pub async fn query(
        &self,
        namespace: &str,
        selector: Selector,
        page_size: u32,
        bookmark: &str,
    ) -> Result<(Vec<KeyValue>, QueryMetadata), LedgerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(LedgerRequest::Query {
                namespace: namespace.to_string(),
                selector,
                page_size,
                bookmark: bookmark.to_string(),
                respond_to,
            })
            .await
            .map_err(|_| closed())?;
        response.await.map_err(|_| closed())
    }

    pub async fn history(&self, namespace: &str, key: &str) -> Result<Vec<KeyModification>, LedgerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(LedgerRequest::History {
                namespace: namespace.to_string(),
                key: key.to_string(),
                respond_to,
            })
            .await
            .map_err(|_| closed())?;
        response.await.map_err(|_| closed())
    }

    pub async fn commit(&self, rw_set: TxRwSet) -> Result<u64, CommitError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(LedgerRequest::Commit { rw_set, respond_to })
            .await
            .map_err(|_| CommitError::LedgerClosed)?;
        response.await.map_err(|_| CommitError::LedgerClosed)?
    }

    /// Asks the actor to stop after the requests already queued.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(LedgerRequest::Shutdown).await;
    }
}
