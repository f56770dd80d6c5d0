//! LedgerEntity trait implementation for the Resource record.
//!
//! A resource's `resource_type_id` is validated through the injected
//! [`ReferenceValidator`] before the first write. Updates are not re-validated.

use crate::contract::args::{optional, or_empty};
use crate::contract::ContractArgs;
use crate::ledger::TransactionContext;
use crate::model::{Resource, ResourceCreate, ResourceUpdate};
use crate::registry::{LedgerEntity, ReferenceValidator, RegistryError};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
impl LedgerEntity for Resource {
    const KIND: &'static str = "Resource";
    const HISTORY_FIELD: &'static str = "resource";

    type Create = ResourceCreate;
    type Update = ResourceUpdate;
    type Context = Arc<dyn ReferenceValidator>;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_create_params(id: String, params: ResourceCreate) -> Self {
        Self {
            id,
            name: params.name,
            resource_type_id: params.resource_type_id,
            active: true,
        }
    }

    /// # Fields Updated
    /// - `name`
    /// - `resource_type_id` (not checked against the resource type registry)
    fn on_update(&mut self, update: ResourceUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(resource_type_id) = update.resource_type_id {
            self.resource_type_id = resource_type_id;
        }
    }

    async fn on_create(
        &self,
        tx: &dyn TransactionContext,
        validator: &Self::Context,
    ) -> Result<(), RegistryError> {
        validator.validate(tx, &self.resource_type_id).await
    }
}

impl ContractArgs for ResourceCreate {
    const ARITY: usize = 2;

    fn from_args(args: &[String]) -> Self {
        Self {
            name: args[0].clone(),
            resource_type_id: args[1].clone(),
        }
    }

    fn to_args(&self) -> Vec<String> {
        vec![self.name.clone(), self.resource_type_id.clone()]
    }
}

impl ContractArgs for ResourceUpdate {
    const ARITY: usize = 2;

    fn from_args(args: &[String]) -> Self {
        Self {
            name: optional(&args[0]),
            resource_type_id: optional(&args[1]),
        }
    }

    fn to_args(&self) -> Vec<String> {
        vec![or_empty(&self.name), or_empty(&self.resource_type_id)]
    }
}
