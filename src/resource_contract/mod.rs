//! Resource registry contract, including the resource type reference check.

pub mod entity;

use crate::contract::RegistryContract;
use crate::model::Resource;
use crate::registry::{ContractReferenceValidator, ReferenceValidator, Registry};
use std::sync::Arc;

/// Default deployment name.
pub const CONTRACT_NAME: &str = "resources";

/// Creates the resource contract under `name`, validating resource type references
/// against the contract deployed as `resource_types`.
pub fn new(name: impl Into<String>, resource_types: impl Into<String>) -> RegistryContract<Resource> {
    let validator = ContractReferenceValidator::new(resource_types, "Resource type");
    with_validator(name, Arc::new(validator))
}

/// Creates the resource contract with a custom reference validator.
pub fn with_validator(
    name: impl Into<String>,
    validator: Arc<dyn ReferenceValidator>,
) -> RegistryContract<Resource> {
    RegistryContract::new(name, Registry::new(validator))
}
