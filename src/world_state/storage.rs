/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Interface to the storage engine holding the world state.
//!
//! The runtime only issues logical reads and hands over complete change sets. Durability and
//! replication belong to the implementor. [MemoryStorage] is an in-memory implementation.

use std::collections::BTreeMap;

pub type Key = Vec<u8>;
pub type Value = Vec<u8>;

/// Storage collaborator of the world state.
pub trait WorldStateStorage: Send + Sync {
    fn get(&self, key: &[u8]) -> Option<Value>;

    /// All entries whose key starts with `prefix`, ascending by key.
    fn scan_prefix(&self, prefix: &[u8]) -> Vec<(Key, Value)>;

    /// Apply every change of the set, or none of them.
    fn apply(&mut self, changes: StateChanges);
}

/// Ordered set of pending writes. `None` marks a deletion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateChanges(BTreeMap<Key, Option<Value>>);

impl StateChanges {
    pub fn put(&mut self, key: Key, value: Value) {
        self.0.insert(key, Some(value));
    }

    pub fn delete(&mut self, key: Key) {
        self.0.insert(key, None);
    }

    /// `Some(None)` if the key is deleted in this set, `None` if the set does not touch it.
    pub fn get(&self, key: &[u8]) -> Option<Option<&Value>> {
        self.0.get(key).map(Option::as_ref)
    }

    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a [u8],
    ) -> impl Iterator<Item = (&'a Key, &'a Option<Value>)> + 'a {
        self.0
            .range(prefix.to_vec()..)
            .take_while(move |(key, _)| key.starts_with(prefix))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl IntoIterator for StateChanges {
    type Item = (Key, Option<Value>);
    type IntoIter = std::collections::btree_map::IntoIter<Key, Option<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    inner: BTreeMap<Key, Value>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl WorldStateStorage for MemoryStorage {
    fn get(&self, key: &[u8]) -> Option<Value> {
        self.inner.get(key).cloned()
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Vec<(Key, Value)> {
        self.inner
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn apply(&mut self, changes: StateChanges) {
        for (key, value) in changes {
            match value {
                Some(value) => {
                    self.inner.insert(key, value);
                }
                None => {
                    self.inner.remove(&key);
                }
            }
        }
    }
}
