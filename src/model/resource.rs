use serde::{Deserialize, Serialize};

/// A concrete resource belonging to a [`ResourceType`](crate::model::ResourceType).
///
/// # Registry
/// This struct implements the [`LedgerEntity`](crate::registry::LedgerEntity) trait,
/// allowing it to be managed by a [`Registry`](crate::registry::Registry).
///
/// See [`impl LedgerEntity for Resource`](#impl-LedgerEntity-for-Resource) for details on:
/// - Creation parameters ([`ResourceCreate`])
/// - Update parameters ([`ResourceUpdate`])
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    /// Id of a resource type. Checked when the resource is created, not afterwards.
    pub resource_type_id: String,
    pub active: bool,
}

/// Payload for creating a resource.
#[derive(Debug, Clone)]
pub struct ResourceCreate {
    pub name: String,
    pub resource_type_id: String,
}

/// Partial update for a resource. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ResourceUpdate {
    pub name: Option<String>,
    pub resource_type_id: Option<String>,
}
