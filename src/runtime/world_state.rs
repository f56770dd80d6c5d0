//! # World State
//!
//! Committed state of every deployed contract. Each contract writes into its own
//! namespace; each key keeps its current value, the version (commit height) that wrote
//! it, and its full revision history.
//!
//! Commits are validated optimistically: a transaction carries the version of every key
//! it read, and is rejected if any of those keys has been rewritten since.

use crate::ledger::{KeyModification, KeyValue, QueryMetadata, Selector};
use crate::runtime::CommitError;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;

/// A committed value and the commit height that wrote it.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedValue {
    pub value: Vec<u8>,
    pub version: u64,
}

/// A key read during execution and the version observed (`None` if absent).
#[derive(Debug, Clone, PartialEq)]
pub struct ReadRecord {
    pub namespace: String,
    pub key: String,
    pub version: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    pub namespace: String,
    pub key: String,
    pub value: Vec<u8>,
}

/// Everything the ledger needs to validate and apply one transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TxRwSet {
    pub tx_id: String,
    pub timestamp: i64,
    pub reads: Vec<ReadRecord>,
    pub writes: Vec<WriteRecord>,
}

#[derive(Debug, Default)]
pub struct WorldState {
    namespaces: HashMap<String, BTreeMap<String, VersionedValue>>,
    history: HashMap<(String, String), Vec<KeyModification>>,
    committed: HashSet<String>,
    height: u64,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed transactions.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Number of live keys in `namespace`.
    pub fn len(&self, namespace: &str) -> usize {
        self.namespaces.get(namespace).map_or(0, BTreeMap::len)
    }

    pub fn get(&self, namespace: &str, key: &str) -> Option<&VersionedValue> {
        self.namespaces.get(namespace)?.get(key)
    }

    /// Records matching `selector` in key order, resuming after `bookmark`.
    ///
    /// `page_size == 0` returns every match up to `limit`. The returned bookmark is the
    /// last key of the page when more matches remain, and empty otherwise. Values that
    /// are not JSON documents never match.
    pub fn query(
        &self,
        namespace: &str,
        selector: &Selector,
        page_size: u32,
        bookmark: &str,
        limit: usize,
    ) -> (Vec<KeyValue>, QueryMetadata) {
        let Some(records) = self.namespaces.get(namespace) else {
            return (Vec::new(), QueryMetadata::default());
        };

        let start = if bookmark.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(bookmark)
        };

        let mut matches = records
            .range::<str, _>((start, Bound::Unbounded))
            .filter(|(_, stored)| {
                serde_json::from_slice::<Value>(&stored.value)
                    .is_ok_and(|document| selector.matches(&document))
            })
            .map(|(key, stored)| KeyValue {
                key: key.clone(),
                value: stored.value.clone(),
            });

        let page = match page_size {
            0 => limit,
            n => (n as usize).min(limit),
        };
        let rows: Vec<KeyValue> = matches.by_ref().take(page).collect();

        let bookmark = match (matches.next(), rows.last()) {
            (Some(_), Some(last)) => last.key.clone(),
            _ => String::new(),
        };
        let metadata = QueryMetadata {
            fetched_records_count: rows.len(),
            bookmark,
        };
        (rows, metadata)
    }

    /// Every committed revision of `key`, oldest first.
    pub fn history(&self, namespace: &str, key: &str) -> Vec<KeyModification> {
        self.history
            .get(&(namespace.to_string(), key.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Validates the read set and applies the write set atomically.
    ///
    /// Returns the new commit height.
    pub fn commit(&mut self, rw_set: TxRwSet) -> Result<u64, CommitError> {
        if self.committed.contains(&rw_set.tx_id) {
            return Err(CommitError::DuplicateTxId(rw_set.tx_id));
        }

        for read in &rw_set.reads {
            let current = self
                .get(&read.namespace, &read.key)
                .map(|stored| stored.version);
            if current != read.version {
                return Err(CommitError::MvccReadConflict {
                    namespace: read.namespace.clone(),
                    key: read.key.clone(),
                });
            }
        }

        self.height += 1;
        for write in rw_set.writes {
            self.history
                .entry((write.namespace.clone(), write.key.clone()))
                .or_default()
                .push(KeyModification {
                    tx_id: rw_set.tx_id.clone(),
                    value: write.value.clone(),
                    timestamp: rw_set.timestamp,
                    is_delete: false,
                });
            self.namespaces.entry(write.namespace).or_default().insert(
                write.key,
                VersionedValue {
                    value: write.value,
                    version: self.height,
                },
            );
        }
        self.committed.insert(rw_set.tx_id);

        Ok(self.height)
    }
}
