use crate::contract::ContractArgs;
use crate::registry::{codec, LedgerEntity, TransactionItem};
use crate::runtime::{Gateway, PeerError};
use std::marker::PhantomData;
use tracing::{debug, instrument};

/// Client for one deployed registry contract.
///
/// Mutations (`init_ledger`, `create`, `update`) are submitted and committed; reads
/// (`read`, `index`, `transactions`) are evaluated and never touch the ledger.
pub struct RegistryClient<E> {
    gateway: Gateway,
    contract: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for RegistryClient<E> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            contract: self.contract.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> RegistryClient<E>
where
    E: LedgerEntity,
    E::Create: ContractArgs,
    E::Update: ContractArgs,
{
    pub fn new(gateway: Gateway, contract: impl Into<String>) -> Self {
        Self {
            gateway,
            contract: contract.into(),
            _entity: PhantomData,
        }
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    #[instrument(skip(self), fields(contract = %self.contract))]
    pub async fn init_ledger(&self) -> Result<(), PeerError> {
        debug!("Sending request");
        self.gateway.submit(&self.contract, "InitLedger", &[]).await?;
        Ok(())
    }

    #[instrument(skip(self, params), fields(contract = %self.contract))]
    pub async fn create(&self, id: &str, params: E::Create) -> Result<(), PeerError> {
        debug!(?params, "Sending request");
        let args = with_id(id, params.to_args());
        self.gateway.submit(&self.contract, "Create", &as_strs(&args)).await?;
        Ok(())
    }

    #[instrument(skip(self, update), fields(contract = %self.contract))]
    pub async fn update(&self, id: &str, update: E::Update) -> Result<(), PeerError> {
        debug!(?update, "Sending request");
        let args = with_id(id, update.to_args());
        self.gateway.submit(&self.contract, "Update", &as_strs(&args)).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(contract = %self.contract))]
    pub async fn read(&self, id: &str) -> Result<E, PeerError> {
        let payload = self.gateway.evaluate(&self.contract, "Read", &[id]).await?;
        Ok(codec::decode(&payload)?)
    }

    #[instrument(skip(self), fields(contract = %self.contract))]
    pub async fn index(&self) -> Result<Vec<E>, PeerError> {
        let payload = self.gateway.evaluate(&self.contract, "Index", &[]).await?;
        Ok(codec::from_bytes(E::KIND, &payload)?)
    }

    #[instrument(skip(self), fields(contract = %self.contract))]
    pub async fn transactions(&self, id: &str) -> Result<Vec<TransactionItem<E>>, PeerError> {
        let payload = self
            .gateway
            .evaluate(&self.contract, "Transactions", &[id])
            .await?;
        Ok(codec::from_bytes(E::KIND, &payload)?)
    }
}

fn with_id(id: &str, rest: Vec<String>) -> Vec<String> {
    let mut args = Vec::with_capacity(rest.len() + 1);
    args.push(id.to_string());
    args.extend(rest);
    args
}

fn as_strs(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}
