//! # LedgerEntity Trait
//!
//! The `LedgerEntity` trait is the capability set a record type needs to be managed by
//! the generic [`Registry`](crate::registry::Registry): a stored shape (serde), a key,
//! construction from create parameters, merge-patch updates and an optional
//! validation hook run before the first write.
//!
//! # Provided Methods (Hooks)
//! - [`LedgerEntity::on_create`] defaults to accepting every new record.

use crate::ledger::TransactionContext;
use crate::registry::RegistryError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Trait that any record type must implement to be managed by a `Registry`.
///
/// # Context
/// `Context` carries the dependencies the hooks need (for example a reference
/// validator). It is handed to the registry once, at construction, and passed to
/// every hook together with the transaction the hook runs in.
#[async_trait]
pub trait LedgerEntity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name used in log fields and codec errors (e.g. `"Resource"`).
    const KIND: &'static str;

    /// JSON key holding the snapshot in a history entry (e.g. `"resource"`).
    const HISTORY_FIELD: &'static str;

    /// The data required to create a new record.
    type Create: Send + Sync + Debug;

    /// A partial update. Absent fields leave the stored value untouched.
    type Update: Send + Sync + Debug;

    /// Dependencies injected into the hooks. Use `()` if none are needed.
    type Context: Send + Sync;

    /// The primary key.
    fn id(&self) -> &str;

    /// Builds a new, active record.
    fn from_create_params(id: String, params: Self::Create) -> Self;

    /// Merges `update` into the record.
    fn on_update(&mut self, update: Self::Update);

    /// Called after the record is built and before it is written.
    /// Returning an error aborts the create without writing anything.
    async fn on_create(
        &self,
        _tx: &dyn TransactionContext,
        _ctx: &Self::Context,
    ) -> Result<(), RegistryError> {
        Ok(())
    }
}
