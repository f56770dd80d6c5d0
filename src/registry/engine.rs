//! # Generic Registry Engine
//!
//! [`Registry<E>`] implements Create, Update, Read, Index and Transactions once for any
//! [`LedgerEntity`]. Each call runs inside the transaction handed in by the contract
//! surface; the registry itself keeps no state between calls apart from the injected
//! entity context.
//!
//! ## Operations
//!
//! * **Create**: rejects an existing key, builds the record (`active = true`), runs the
//!   `on_create` hook, writes.
//! * **Update**: rejects a missing key, decodes the stored record, merges the update,
//!   writes.
//! * **Read**: equality selector on `id` through the query facility; first match.
//! * **Index**: match-all selector; every record in store order.
//! * **Transactions**: replays the key's history, one item per committed revision.
//!
//! Query and history cursors are released on every exit path, including a decode
//! failure in the middle of an iteration.

use crate::ledger::{Selector, TransactionContext};
use crate::registry::codec;
use crate::registry::entity::LedgerEntity;
use crate::registry::item::TransactionItem;
use crate::registry::RegistryError;
use tracing::{debug, info, warn};

/// Value no record id may take; `id != SENTINEL` therefore matches every record.
pub const MATCH_ALL_SENTINEL: &str = "-";

/// The registry for one entity type.
pub struct Registry<E: LedgerEntity> {
    context: E::Context,
}

impl<E: LedgerEntity> Registry<E> {
    pub fn new(context: E::Context) -> Self {
        Self { context }
    }

    pub async fn create(
        &self,
        tx: &dyn TransactionContext,
        id: &str,
        params: E::Create,
    ) -> Result<(), RegistryError> {
        let entity_type = E::KIND;
        debug!(entity_type, %id, ?params, "Create");

        if tx.get_state(id).await?.is_some() {
            warn!(entity_type, %id, "Already exists");
            return Err(RegistryError::AlreadyExists(id.to_string()));
        }

        let item = E::from_create_params(id.to_string(), params);
        if let Err(e) = item.on_create(tx, &self.context).await {
            warn!(entity_type, %id, error = %e, "on_create failed");
            return Err(e);
        }

        tx.put_state(item.id(), codec::encode(&item)?).await?;
        info!(entity_type, id = item.id(), tx_id = tx.tx_id(), "Created");
        Ok(())
    }

    pub async fn update(
        &self,
        tx: &dyn TransactionContext,
        id: &str,
        update: E::Update,
    ) -> Result<E, RegistryError> {
        let entity_type = E::KIND;
        debug!(entity_type, %id, ?update, "Update");

        let Some(existing) = tx.get_state(id).await? else {
            warn!(entity_type, %id, "Not found");
            return Err(RegistryError::NotFound(id.to_string()));
        };

        let mut item: E = codec::decode(&existing)?;
        item.on_update(update);

        tx.put_state(id, codec::encode(&item)?).await?;
        info!(entity_type, %id, tx_id = tx.tx_id(), "Updated");
        Ok(item)
    }

    pub async fn read(&self, tx: &dyn TransactionContext, id: &str) -> Result<E, RegistryError> {
        let entity_type = E::KIND;
        let query = Selector::new().eq("id", id).to_query();
        let (mut cursor, _) = tx.get_query_result_with_pagination(&query, 0, "").await?;

        let first = cursor.next().transpose()?;
        cursor.close();

        let found = first.is_some();
        debug!(entity_type, %id, found, "Read");
        match first {
            Some(row) => Ok(codec::decode(&row.value)?),
            None => Err(RegistryError::NotFound(id.to_string())),
        }
    }

    pub async fn index(&self, tx: &dyn TransactionContext) -> Result<Vec<E>, RegistryError> {
        let query = Selector::new().ne("id", MATCH_ALL_SENTINEL).to_query();

        // A capped result set carries a bookmark; keep fetching until it comes back empty.
        let mut items = Vec::new();
        let mut bookmark = String::new();
        loop {
            let (cursor, metadata) = tx
                .get_query_result_with_pagination(&query, 0, &bookmark)
                .await?;
            for row in cursor {
                items.push(codec::decode(&row?.value)?);
            }
            if metadata.bookmark.is_empty() || metadata.bookmark == bookmark {
                break;
            }
            bookmark = metadata.bookmark;
        }

        debug!(entity_type = E::KIND, size = items.len(), "Index");
        Ok(items)
    }

    pub async fn transactions(
        &self,
        tx: &dyn TransactionContext,
        id: &str,
    ) -> Result<Vec<TransactionItem<E>>, RegistryError> {
        let cursor = tx.get_history_for_key(id).await?;

        let mut items = Vec::new();
        for modification in cursor {
            let modification = modification?;
            // no operation deletes records; a tombstone has no snapshot to decode
            if modification.is_delete {
                continue;
            }
            items.push(TransactionItem {
                entity: codec::decode(&modification.value)?,
                tx_id: modification.tx_id,
                timestamp: modification.timestamp,
            });
        }

        debug!(entity_type = E::KIND, %id, revisions = items.len(), "Transactions");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{KeyModification, KeyValue, LedgerError};
    use crate::mock::MockStub;
    use crate::model::{ResourceType, ResourceTypeCreate, ResourceTypeUpdate};

    fn vehicle() -> ResourceType {
        ResourceType {
            id: "rt1".into(),
            name: "Vehicle".into(),
            active: true,
        }
    }

    fn row(entity: &ResourceType) -> KeyValue {
        KeyValue {
            key: entity.id.clone(),
            value: codec::encode(entity).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_writes_active_record() {
        let mut stub = MockStub::new();
        stub.expect_get("rt1").return_ok(None);
        stub.expect_put("rt1").return_ok(());

        let registry = Registry::<ResourceType>::new(());
        let params = ResourceTypeCreate {
            name: "Vehicle".into(),
        };
        registry.create(&stub, "rt1", params).await.unwrap();

        stub.verify();
        let written: ResourceType = codec::decode(&stub.written("rt1").unwrap()).unwrap();
        assert_eq!(written, vehicle());
    }

    #[tokio::test]
    async fn test_create_rejects_existing_key_without_writing() {
        let mut stub = MockStub::new();
        stub.expect_get("rt1")
            .return_ok(Some(codec::encode(&vehicle()).unwrap()));

        let registry = Registry::<ResourceType>::new(());
        let params = ResourceTypeCreate { name: "Truck".into() };
        let err = registry.create(&stub, "rt1", params).await.unwrap_err();

        assert_eq!(err, RegistryError::AlreadyExists("rt1".into()));
        assert!(stub.written("rt1").is_none());
        stub.verify();
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_unavailable() {
        let mut stub = MockStub::new();
        stub.expect_get("rt1")
            .return_err(LedgerError::Unavailable("connection reset".into()));

        let registry = Registry::<ResourceType>::new(());
        let params = ResourceTypeCreate { name: "Vehicle".into() };
        let err = registry.create(&stub, "rt1", params).await.unwrap_err();

        assert!(matches!(err, RegistryError::StoreUnavailable(LedgerError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_update_missing_key_is_not_found() {
        let mut stub = MockStub::new();
        stub.expect_get("nope").return_ok(None);

        let registry = Registry::<ResourceType>::new(());
        let update = ResourceTypeUpdate { name: Some("X".into()) };
        let err = registry.update(&stub, "nope", update).await.unwrap_err();

        assert_eq!(err, RegistryError::NotFound("nope".into()));
    }

    #[tokio::test]
    async fn test_update_with_empty_fields_keeps_record() {
        let mut stub = MockStub::new();
        stub.expect_get("rt1")
            .return_ok(Some(codec::encode(&vehicle()).unwrap()));
        stub.expect_put("rt1").return_ok(());

        let registry = Registry::<ResourceType>::new(());
        let updated = registry
            .update(&stub, "rt1", ResourceTypeUpdate { name: None })
            .await
            .unwrap();

        assert_eq!(updated, vehicle());
    }

    #[tokio::test]
    async fn test_update_of_corrupt_record_is_codec_error() {
        let mut stub = MockStub::new();
        stub.expect_get("rt1").return_ok(Some(b"{broken".to_vec()));

        let registry = Registry::<ResourceType>::new(());
        let err = registry
            .update(&stub, "rt1", ResourceTypeUpdate { name: None })
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::Codec(_)));
    }

    #[tokio::test]
    async fn test_read_takes_first_match_and_closes_cursor() {
        let mut stub = MockStub::new();
        stub.expect_query().return_ok(vec![row(&vehicle())]);

        let registry = Registry::<ResourceType>::new(());
        let found = registry.read(&stub, "rt1").await.unwrap();

        assert_eq!(found, vehicle());
        assert_eq!(stub.queries(), vec![r#"{"selector":{"id":"rt1"}}"#.to_string()]);
        assert_eq!(stub.open_cursors(), 0);
    }

    #[tokio::test]
    async fn test_read_without_match_is_not_found() {
        let mut stub = MockStub::new();
        stub.expect_query().return_ok(vec![]);

        let registry = Registry::<ResourceType>::new(());
        let err = registry.read(&stub, "rt9").await.unwrap_err();

        assert_eq!(err, RegistryError::NotFound("rt9".into()));
        assert_eq!(stub.open_cursors(), 0);
    }

    #[tokio::test]
    async fn test_index_of_empty_registry_is_empty() {
        let mut stub = MockStub::new();
        stub.expect_query().return_ok(vec![]);

        let registry = Registry::<ResourceType>::new(());
        assert!(registry.index(&stub).await.unwrap().is_empty());
        assert_eq!(stub.queries(), vec![r#"{"selector":{"id":{"$ne":"-"}}}"#.to_string()]);
    }

    #[tokio::test]
    async fn test_index_follows_bookmarks_past_the_query_cap() {
        let mut stub = MockStub::new();
        let truck = ResourceType {
            id: "rt2".into(),
            name: "Truck".into(),
            active: true,
        };
        stub.expect_query().return_page(vec![row(&vehicle())], "rt1");
        stub.expect_query().return_ok(vec![row(&truck)]);

        let registry = Registry::<ResourceType>::new(());
        let items = registry.index(&stub).await.unwrap();

        assert_eq!(items, vec![vehicle(), truck]);
        assert_eq!(stub.bookmarks(), vec![String::new(), "rt1".to_string()]);
        assert_eq!(stub.open_cursors(), 0);
        stub.verify();
    }

    #[tokio::test]
    async fn test_index_decode_failure_still_releases_cursor() {
        let mut stub = MockStub::new();
        let corrupt = KeyValue {
            key: "rt2".into(),
            value: b"garbage".to_vec(),
        };
        let tail = ResourceType {
            id: "rt3".into(),
            name: "Boat".into(),
            active: true,
        };
        stub.expect_query()
            .return_ok(vec![row(&vehicle()), corrupt, row(&tail)]);

        let registry = Registry::<ResourceType>::new(());
        let err = registry.index(&stub).await.unwrap_err();

        assert!(matches!(err, RegistryError::Codec(_)));
        assert_eq!(stub.open_cursors(), 0);
    }

    #[tokio::test]
    async fn test_transactions_pairs_snapshots_with_tx_metadata() {
        let renamed = ResourceType {
            name: "Car".into(),
            ..vehicle()
        };
        let mut stub = MockStub::new();
        stub.expect_history("rt1").return_ok(vec![
            KeyModification {
                tx_id: "tx-a".into(),
                value: codec::encode(&vehicle()).unwrap(),
                timestamp: 10,
                is_delete: false,
            },
            KeyModification {
                tx_id: "tx-b".into(),
                value: codec::encode(&renamed).unwrap(),
                timestamp: 20,
                is_delete: false,
            },
        ]);

        let registry = Registry::<ResourceType>::new(());
        let items = registry.transactions(&stub, "rt1").await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].tx_id, "tx-a");
        assert_eq!(items[0].entity, vehicle());
        assert_eq!(items[1].timestamp, 20);
        assert_eq!(items[1].entity.name, "Car");
        assert_eq!(stub.open_cursors(), 0);
    }

    #[tokio::test]
    async fn test_transactions_of_unknown_key_is_empty() {
        let mut stub = MockStub::new();
        stub.expect_history("ghost").return_ok(vec![]);

        let registry = Registry::<ResourceType>::new(());
        assert!(registry.transactions(&stub, "ghost").await.unwrap().is_empty());
    }
}
