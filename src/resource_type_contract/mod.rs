//! Resource type registry contract.

pub mod entity;

use crate::contract::RegistryContract;
use crate::model::ResourceType;
use crate::registry::Registry;

/// Default deployment name.
pub const CONTRACT_NAME: &str = "resource_types";

/// Creates the resource type contract under `name`.
pub fn new(name: impl Into<String>) -> RegistryContract<ResourceType> {
    RegistryContract::new(name, Registry::new(()))
}
