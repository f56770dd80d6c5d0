//! History entries.
//!
//! A [`TransactionItem`] is never stored; it is rebuilt from a key's revision log every
//! time history is requested. Its JSON form names the snapshot after the entity, e.g.
//! `{"tx_id": "..", "resource": {..}, "timestamp": 0}`.

use crate::registry::entity::LedgerEntity;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One committed revision of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionItem<E> {
    pub tx_id: String,
    pub entity: E,
    /// Nanoseconds since the Unix epoch.
    pub timestamp: i64,
}

impl<E: LedgerEntity> Serialize for TransactionItem<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("tx_id", &self.tx_id)?;
        map.serialize_entry(E::HISTORY_FIELD, &self.entity)?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        map.end()
    }
}

impl<'de, E: LedgerEntity> Deserialize<'de> for TransactionItem<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let mut take = |name: &'static str| -> Result<Value, D::Error> {
            fields
                .remove(name)
                .ok_or_else(|| de::Error::missing_field(name))
        };

        let tx_id = take("tx_id")?;
        let entity = take(E::HISTORY_FIELD)?;
        let timestamp = take("timestamp")?;

        Ok(Self {
            tx_id: serde_json::from_value(tx_id).map_err(de::Error::custom)?,
            entity: serde_json::from_value(entity).map_err(de::Error::custom)?,
            timestamp: serde_json::from_value(timestamp).map_err(de::Error::custom)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResourceType;
    use serde_json::json;

    #[test]
    fn test_snapshot_is_keyed_by_entity() {
        let item = TransactionItem {
            tx_id: "tx1".to_string(),
            entity: ResourceType {
                id: "rt1".into(),
                name: "Vehicle".into(),
                active: true,
            },
            timestamp: 42,
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({
                "tx_id": "tx1",
                "resource_type": {"id": "rt1", "name": "Vehicle", "active": true},
                "timestamp": 42
            })
        );

        let back: TransactionItem<ResourceType> = serde_json::from_value(value).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_missing_snapshot_is_rejected() {
        let result: Result<TransactionItem<ResourceType>, _> =
            serde_json::from_value(json!({"tx_id": "tx1", "timestamp": 1}));
        assert!(result.is_err());
    }
}
