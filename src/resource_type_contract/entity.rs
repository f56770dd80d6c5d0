//! LedgerEntity trait implementation for the ResourceType record.
//!
//! Resource types have no dependencies: `Context = ()` and the default `on_create`.

use crate::contract::args::{optional, or_empty};
use crate::contract::ContractArgs;
use crate::model::{ResourceType, ResourceTypeCreate, ResourceTypeUpdate};
use crate::registry::LedgerEntity;

impl LedgerEntity for ResourceType {
    const KIND: &'static str = "ResourceType";
    const HISTORY_FIELD: &'static str = "resource_type";

    type Create = ResourceTypeCreate;
    type Update = ResourceTypeUpdate;
    type Context = ();

    fn id(&self) -> &str {
        &self.id
    }

    fn from_create_params(id: String, params: ResourceTypeCreate) -> Self {
        Self {
            id,
            name: params.name,
            active: true,
        }
    }

    fn on_update(&mut self, update: ResourceTypeUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
    }
}

impl ContractArgs for ResourceTypeCreate {
    const ARITY: usize = 1;

    fn from_args(args: &[String]) -> Self {
        Self {
            name: args[0].clone(),
        }
    }

    fn to_args(&self) -> Vec<String> {
        vec![self.name.clone()]
    }
}

impl ContractArgs for ResourceTypeUpdate {
    const ARITY: usize = 1;

    fn from_args(args: &[String]) -> Self {
        Self {
            name: optional(&args[0]),
        }
    }

    fn to_args(&self) -> Vec<String> {
        vec![or_empty(&self.name)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_argument_means_keep() {
        let update = ResourceTypeUpdate::from_args(&["".to_string()]);
        assert_eq!(update.name, None);

        let mut item = ResourceType::from_create_params(
            "rt1".into(),
            ResourceTypeCreate {
                name: "Vehicle".into(),
            },
        );
        item.on_update(update);
        assert_eq!(item.name, "Vehicle");
        assert!(item.active);
    }
}
