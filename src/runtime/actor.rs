//! # Ledger Actor
//!
//! The `LedgerActor` owns the [`WorldState`] and is the only task that touches it.
//! Reads and commits arrive as [`LedgerRequest`] messages and are processed
//! sequentially, so the state needs no lock and a commit is atomic with respect to
//! every other request.

use crate::config::Config;
use crate::ledger::{KeyModification, KeyValue, QueryMetadata, Selector};
use crate::runtime::client::LedgerClient;
use crate::runtime::world_state::{TxRwSet, VersionedValue, WorldState};
use crate::runtime::CommitError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Messages handled by the ledger actor.
#[derive(Debug)]
pub enum LedgerRequest {
    Get {
        namespace: String,
        key: String,
        respond_to: oneshot::Sender<Option<VersionedValue>>,
    },
    Query {
        namespace: String,
        selector: Selector,
        page_size: u32,
        bookmark: String,
        respond_to: oneshot::Sender<(Vec<KeyValue>, QueryMetadata)>,
    },
    History {
        namespace: String,
        key: String,
        respond_to: oneshot::Sender<Vec<KeyModification>>,
    },
    Commit {
        rw_set: TxRwSet,
        respond_to: oneshot::Sender<Result<u64, CommitError>>,
    },
    Shutdown,
}

/// The task owning the committed ledger state.
pub struct LedgerActor {
    receiver: mpsc::Receiver<LedgerRequest>,
    state: WorldState,
    query_limit: usize,
}

impl LedgerActor {
    /// Creates the actor and a client connected to it.
    ///
    /// `config.channel_capacity` bounds the request queue; callers wait when it is full.
    /// It must be non-zero, see [`Config::validate`].
    pub fn new(config: &Config) -> (Self, LedgerClient) {
        let (sender, receiver) = mpsc::channel(config.channel_capacity);
        let actor = Self {
            receiver,
            state: WorldState::new(),
            query_limit: config.query_limit,
        };
        (actor, LedgerClient::new(sender))
    }

    /// Processes requests until a `Shutdown` arrives or every client is dropped.
    pub async fn run(mut self) {
        info!("Ledger started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                LedgerRequest::Get {
                    namespace,
                    key,
                    respond_to,
                } => {
                    let item = self.state.get(&namespace, &key).cloned();
                    debug!(%namespace, %key, found = item.is_some(), "Get");
                    let _ = respond_to.send(item);
                }
                LedgerRequest::Query {
                    namespace,
                    selector,
                    page_size,
                    bookmark,
                    respond_to,
                } => {
                    let result =
                        self.state
                            .query(&namespace, &selector, page_size, &bookmark, self.query_limit);
                    debug!(%namespace, ?selector, rows = result.0.len(), "Query");
                    let _ = respond_to.send(result);
                }
                LedgerRequest::History {
                    namespace,
                    key,
                    respond_to,
                } => {
                    let revisions = self.state.history(&namespace, &key);
                    debug!(%namespace, %key, revisions = revisions.len(), "History");
                    let _ = respond_to.send(revisions);
                }
                LedgerRequest::Commit { rw_set, respond_to } => {
                    let tx_id = rw_set.tx_id.clone();
                    let writes = rw_set.writes.len();
                    let result = self.state.commit(rw_set);
                    match &result {
                        Ok(height) => info!(%tx_id, height, writes, "Committed"),
                        Err(e) => warn!(%tx_id, error = %e, "Commit rejected"),
                    }
                    let _ = respond_to.send(result);
                }
                LedgerRequest::Shutdown => break,
            }
        }

        info!(height = self.state.height(), "Shutdown");
    }
}
