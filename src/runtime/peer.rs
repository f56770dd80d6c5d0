//! # Peer
//!
//! A single in-memory peer: it owns the ledger actor task, keeps the table of deployed
//! contracts and executes proposals against them.
//!
//! A proposal runs the contract inside a fresh [`MemoryContext`] and captures its
//! read and write sets as an [`Endorsement`]. Nothing reaches the world state until the
//! endorsement is committed, and commit rejects it if any key it read has changed in
//! the meantime.
//!
//! ```ignore
//! let peer = Peer::new(&Config::default())?;
//! peer.deploy(resource_type_contract::new("resource_types"))?;
//! peer.submit("resource_types", "Create", &["rt1", "Vehicle"]).await?;
//! let json = peer.evaluate("resource_types", "Read", &["rt1"]).await?;
//! peer.shutdown().await?;
//! ```

use crate::config::Config;
use crate::contract::Contract;
use crate::ledger::LedgerError;
use crate::runtime::actor::LedgerActor;
use crate::runtime::client::LedgerClient;
use crate::runtime::context::{Contracts, MemoryContext};
use crate::runtime::world_state::TxRwSet;
use crate::runtime::PeerError;
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// The outcome of executing a proposal, not yet committed.
#[derive(Debug, Clone)]
pub struct Endorsement {
    pub tx_id: String,
    pub contract: String,
    pub function: String,
    pub payload: Vec<u8>,
    pub rw_set: TxRwSet,
}

/// Cloneable handle for submitting and evaluating transactions on a [`Peer`].
#[derive(Clone)]
pub struct Gateway {
    ledger: LedgerClient,
    contracts: Contracts,
    open_cursors: Arc<AtomicUsize>,
}

impl Gateway {
    /// Executes `function` on `contract` without committing anything.
    #[instrument(skip_all, fields(%contract, %function))]
    pub async fn propose(
        &self,
        contract: &str,
        function: &str,
        args: &[&str],
    ) -> Result<Endorsement, PeerError> {
        let target = self
            .contract(contract)?
            .ok_or_else(|| PeerError::UnknownContract(contract.to_string()))?;

        let tx_id = Uuid::new_v4().simple().to_string();
        let ctx = MemoryContext::new(
            contract,
            tx_id.clone(),
            now_nanos(),
            self.ledger.clone(),
            self.contracts.clone(),
            self.open_cursors.clone(),
        );
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();

        debug!(%tx_id, ?args, "Proposal");
        let payload = target.invoke(&ctx, function, &args).await?;
        let rw_set = ctx.take_rw_set()?;

        Ok(Endorsement {
            tx_id,
            contract: contract.to_string(),
            function: function.to_string(),
            payload,
            rw_set,
        })
    }

    /// Commits an endorsement and returns its payload.
    pub async fn commit(&self, endorsement: Endorsement) -> Result<Vec<u8>, PeerError> {
        let Endorsement {
            tx_id,
            contract,
            function,
            payload,
            rw_set,
        } = endorsement;

        match self.ledger.commit(rw_set).await {
            Ok(height) => {
                info!(%tx_id, %contract, %function, height, "Transaction committed");
                Ok(payload)
            }
            Err(e) => {
                warn!(%tx_id, %contract, %function, error = %e, "Transaction invalidated");
                Err(e.into())
            }
        }
    }

    /// Proposes and commits in one step.
    pub async fn submit(
        &self,
        contract: &str,
        function: &str,
        args: &[&str],
    ) -> Result<Vec<u8>, PeerError> {
        let endorsement = self.propose(contract, function, args).await?;
        self.commit(endorsement).await
    }

    /// Runs a query transaction. Its writes, if any, are discarded.
    pub async fn evaluate(
        &self,
        contract: &str,
        function: &str,
        args: &[&str],
    ) -> Result<Vec<u8>, PeerError> {
        let endorsement = self.propose(contract, function, args).await?;
        if !endorsement.rw_set.writes.is_empty() {
            debug!(tx_id = %endorsement.tx_id, "Discarding writes of evaluated transaction");
        }
        Ok(endorsement.payload)
    }

    /// Cursors handed out to contracts and not yet released.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    fn contract(&self, name: &str) -> Result<Option<Arc<dyn Contract>>, PeerError> {
        let contracts = self.contracts.read().map_err(poisoned)?;
        Ok(contracts.get(name).cloned())
    }
}

/// An in-memory peer with its ledger task.
pub struct Peer {
    gateway: Gateway,
    handle: JoinHandle<()>,
}

impl Peer {
    /// Spawns the ledger actor. Must be called from within a Tokio runtime.
    pub fn new(config: &Config) -> Result<Self, PeerError> {
        config.validate()?;
        let (actor, ledger) = LedgerActor::new(config);
        let handle = tokio::spawn(actor.run());

        Ok(Self {
            gateway: Gateway {
                ledger,
                contracts: Arc::new(RwLock::new(HashMap::new())),
                open_cursors: Arc::new(AtomicUsize::new(0)),
            },
            handle,
        })
    }

    /// Deploys `contract` under its own name, which is also its state namespace.
    pub fn deploy(&self, contract: impl Contract + 'static) -> Result<(), PeerError> {
        let name = contract.name().to_string();
        let mut contracts = self.gateway.contracts.write().map_err(poisoned)?;
        if contracts.contains_key(&name) {
            return Err(PeerError::AlreadyDeployed(name));
        }
        contracts.insert(name.clone(), Arc::new(contract));
        info!(contract = %name, "Contract deployed");
        Ok(())
    }

    pub fn gateway(&self) -> Gateway {
        self.gateway.clone()
    }

    /// Stops the ledger actor and waits for it to exit.
    pub async fn shutdown(self) -> Result<(), PeerError> {
        info!("Shutting down peer...");
        self.gateway.ledger.shutdown().await;
        drop(self.gateway);

        if let Err(e) = self.handle.await {
            error!("Ledger task failed: {:?}", e);
            return Err(PeerError::Join(e.to_string()));
        }
        info!("Peer shutdown complete.");
        Ok(())
    }
}

impl Deref for Peer {
    type Target = Gateway;

    fn deref(&self) -> &Gateway {
        &self.gateway
    }
}

fn poisoned<T>(_: T) -> PeerError {
    PeerError::Ledger(LedgerError::Unavailable("contract table poisoned".into()))
}

fn now_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
