//! # Registry Contract
//!
//! `RegistryContract<E>` is the dispatch layer between the ledger runtime and a
//! [`Registry<E>`]. It owns no business logic: it parses the entry point, calls the
//! engine and encodes the reply.

use crate::contract::args::ContractArgs;
use crate::contract::entry::EntryPoint;
use crate::contract::{Contract, ContractError};
use crate::ledger::TransactionContext;
use crate::registry::{codec, LedgerEntity, Registry};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// A deployable contract serving one registry.
pub struct RegistryContract<E: LedgerEntity> {
    name: String,
    registry: Registry<E>,
}

impl<E: LedgerEntity> RegistryContract<E> {
    pub fn new(name: impl Into<String>, registry: Registry<E>) -> Self {
        Self {
            name: name.into(),
            registry,
        }
    }
}

#[async_trait]
impl<E> Contract for RegistryContract<E>
where
    E: LedgerEntity,
    E::Create: ContractArgs,
    E::Update: ContractArgs,
{
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, tx, args), fields(contract = %self.name, tx_id = tx.tx_id()))]
    async fn invoke(
        &self,
        tx: &dyn TransactionContext,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError> {
        debug!(?args, "Invoke");
        let result = self.dispatch(tx, EntryPoint::<E>::parse(function, args)?).await;
        if let Err(e) = &result {
            warn!(error = %e, "Invocation failed");
        }
        result
    }
}

impl<E> RegistryContract<E>
where
    E: LedgerEntity,
    E::Create: ContractArgs,
    E::Update: ContractArgs,
{
    async fn dispatch(
        &self,
        tx: &dyn TransactionContext,
        entry: EntryPoint<E>,
    ) -> Result<Vec<u8>, ContractError> {
        match entry {
            EntryPoint::InitLedger => Ok(Vec::new()),
            EntryPoint::Create { id, params } => {
                self.registry.create(tx, &id, params).await?;
                Ok(Vec::new())
            }
            EntryPoint::Update { id, update } => {
                self.registry.update(tx, &id, update).await?;
                Ok(Vec::new())
            }
            EntryPoint::Read { id } => {
                let item = self.registry.read(tx, &id).await?;
                Ok(codec::encode(&item)?)
            }
            EntryPoint::Index => {
                let items = self.registry.index(tx).await?;
                Ok(codec::to_bytes(E::KIND, &items)?)
            }
            EntryPoint::Transactions { id } => {
                let items = self.registry.transactions(tx, &id).await?;
                Ok(codec::to_bytes(E::KIND, &items)?)
            }
        }
    }
}
