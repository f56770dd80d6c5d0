use serde::{Deserialize, Serialize};

/// A category of resources, e.g. "Vehicle".
///
/// # Registry
/// This struct implements the [`LedgerEntity`](crate::registry::LedgerEntity) trait,
/// allowing it to be managed by a [`Registry`](crate::registry::Registry).
///
/// See [`impl LedgerEntity for ResourceType`](#impl-LedgerEntity-for-ResourceType) for details on:
/// - Creation parameters ([`ResourceTypeCreate`])
/// - Update parameters ([`ResourceTypeUpdate`])
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    pub id: String,
    pub name: String,
    /// Reserved for retiring a type; every type is created active.
    pub active: bool,
}

/// Payload for creating a resource type.
#[derive(Debug, Clone)]
pub struct ResourceTypeCreate {
    pub name: String,
}

/// Partial update for a resource type. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ResourceTypeUpdate {
    pub name: Option<String>,
}
