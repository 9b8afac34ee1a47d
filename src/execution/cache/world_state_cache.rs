/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines a struct that serves as a cache layer on top of World State.
//!
//! There are two data caches:
//! - `reads` (first-hand data obtained from world state)
//! - `writes` (the data pended to commit to world state)
//!
//! In Read Operation, `writes` is accessed first. If data is not found, search `reads`. If it fails in both Sets,
//! then finally World State is accessed. The result will then be cached to `reads`. Prefix scans merge the
//! committed entries with the pending `writes` under the same prefix.
//!
//! At the end of state transition, if it succeeds, `writes` is handed over as the change set of the
//! transaction. Otherwise, `writes` is discarded without any changes to World State.

use std::{cell::RefCell, collections::BTreeMap, collections::HashMap};

use crate::world_state::{
    Key, StateChanges, StateRead, StateWrite, Value, WorldState, WorldStateStorage,
};

/// Working copy of the world state for one transaction.
pub(crate) struct WorldStateCache<'a, S> {
    /// World State services as the data source
    pub ws: &'a WorldState<S>,
    /// writes stores key-value pairs for Write operations. It stores the data that is pending to store into world state
    writes: StateChanges,
    /// reads stores key-value pairs from Read operations. It is de facto the original data read from world state.
    reads: RefCell<HashMap<Key, Option<Value>>>,
}

impl<'a, S> WorldStateCache<'a, S>
where
    S: WorldStateStorage,
{
    pub fn new(ws: &'a WorldState<S>) -> Self {
        Self {
            ws,
            writes: StateChanges::default(),
            reads: RefCell::new(HashMap::new()),
        }
    }

    /// reverts changes to read-write set
    pub fn revert(&mut self) {
        self.reads.borrow_mut().clear();
        self.writes.clear();
    }

    pub fn has_changes(&self) -> bool {
        !self.writes.is_empty()
    }

    pub fn into_changes(self) -> StateChanges {
        self.writes
    }
}

impl<'a, S> StateRead for WorldStateCache<'a, S>
where
    S: WorldStateStorage,
{
    fn get(&self, key: &[u8]) -> Option<Value> {
        // 1. Return the value that was written earlier in the transaction ('read-your-write' semantics)
        if let Some(value) = self.writes.get(key) {
            return value.cloned();
        }

        // 2. Return the value that was read eariler in the transaction
        if let Some(value) = self.reads.borrow().get(key) {
            return value.clone();
        }

        // 3. Get the value from world state
        let value = self.ws.get(key);

        // 4. Cache to reads
        self.reads.borrow_mut().insert(key.to_vec(), value.clone());
        value
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Vec<(Key, Value)> {
        let mut merged: BTreeMap<Key, Value> = self.ws.scan_prefix(prefix).into_iter().collect();
        for (key, value) in self.writes.with_prefix(prefix) {
            match value {
                Some(value) => merged.insert(key.clone(), value.clone()),
                None => merged.remove(key),
            };
        }
        merged.into_iter().collect()
    }
}

impl<'a, S> StateWrite for WorldStateCache<'a, S>
where
    S: WorldStateStorage,
{
    fn put(&mut self, key: Key, value: Value) {
        self.writes.put(key, value);
    }

    fn delete(&mut self, key: Key) {
        self.writes.delete(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_state::MemoryStorage;

    fn world_state() -> WorldState<MemoryStorage> {
        let mut ws = WorldState::new(MemoryStorage::new());
        let mut changes = StateChanges::default();
        changes.put(b"p1".to_vec(), vec![1]);
        changes.put(b"p2".to_vec(), vec![2]);
        ws.commit(changes);
        ws
    }

    #[test]
    fn read_your_writes() {
        let ws = world_state();
        let mut cache = WorldStateCache::new(&ws);
        assert_eq!(cache.get(b"p1"), Some(vec![1]));

        cache.put(b"p1".to_vec(), vec![9]);
        cache.delete(b"p2".to_vec());
        assert_eq!(cache.get(b"p1"), Some(vec![9]));
        assert_eq!(cache.get(b"p2"), None);

        // committed state is untouched until the change set is applied
        assert_eq!(ws.get(b"p1"), Some(vec![1]));
        assert_eq!(ws.get(b"p2"), Some(vec![2]));
    }

    #[test]
    fn scan_merges_pending_writes() {
        let ws = world_state();
        let mut cache = WorldStateCache::new(&ws);
        cache.put(b"p0".to_vec(), vec![0]);
        cache.delete(b"p2".to_vec());
        cache.put(b"q1".to_vec(), vec![5]);

        assert_eq!(
            cache.scan_prefix(b"p"),
            vec![(b"p0".to_vec(), vec![0]), (b"p1".to_vec(), vec![1])]
        );
    }

    #[test]
    fn revert_discards_everything() {
        let ws = world_state();
        let mut cache = WorldStateCache::new(&ws);
        cache.put(b"p1".to_vec(), vec![9]);
        assert!(cache.has_changes());

        cache.revert();
        assert!(!cache.has_changes());
        assert_eq!(cache.get(b"p1"), Some(vec![1]));
        assert!(cache.into_changes().is_empty());
    }
}
