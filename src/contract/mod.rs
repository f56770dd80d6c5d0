//! Contract surface: named entry points invoked by the ledger runtime.
//!
//! A [`Contract`] receives the function name and its string arguments together with
//! the transaction context, and returns a payload or an error. The runtime commits
//! the transaction's writes only when the invocation succeeds.

pub mod args;
pub mod entry;
pub mod error;
pub mod registry_contract;

pub use args::ContractArgs;
pub use entry::EntryPoint;
pub use error::ContractError;
pub use registry_contract::RegistryContract;

use crate::ledger::TransactionContext;
use async_trait::async_trait;

/// Something the ledger runtime can deploy and invoke by name.
#[async_trait]
pub trait Contract: Send + Sync {
    /// The deployment name, which is also the contract's state namespace.
    fn name(&self) -> &str;

    async fn invoke(
        &self,
        tx: &dyn TransactionContext,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError>;
}
