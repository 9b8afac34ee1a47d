/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Per-account signatory set and quorum threshold.
//!
//! Keys are matched with [keys::equals] only. Adding a key that is already present is an
//! idempotent success here; rejecting duplicates is a precondition of the AddSignatory command.

use std::collections::BTreeSet;

use crate::{
    error::{CommandError, Entity},
    keys::{self, PublicKey},
    types::AccountId,
    world_state::{key_layout, StateRead, StateWrite},
};

/// Signatories of the account, in canonical byte order.
pub fn signatories<R: StateRead + ?Sized>(state: &R, account: &AccountId) -> Vec<PublicKey> {
    let prefix = key_layout::signatory_prefix(account);
    state
        .scan_prefix(&prefix)
        .into_iter()
        .filter_map(|(key, _)| PublicKey::from_bytes(&key[prefix.len()..]).ok())
        .collect()
}

pub fn contains<R: StateRead + ?Sized>(state: &R, account: &AccountId, key: &PublicKey) -> bool {
    signatories(state, account)
        .iter()
        .any(|signatory| keys::equals(signatory, key))
}

/// Insert `key` if absent.
pub fn add<W: StateWrite + ?Sized>(
    state: &mut W,
    account: &AccountId,
    key: &PublicKey,
) -> Result<(), CommandError> {
    if !state.account_exists(account) {
        return Err(CommandError::NotFound(Entity::Account));
    }
    if !contains(state, account, key) {
        state.put(key_layout::signatory(account, key), Vec::new());
    }
    Ok(())
}

/// Remove `key`. The remaining signatories must still be able to reach quorum.
pub fn remove<W: StateWrite + ?Sized>(
    state: &mut W,
    account: &AccountId,
    key: &PublicKey,
) -> Result<(), CommandError> {
    let quorum = state
        .quorum(account)
        .ok_or(CommandError::NotFound(Entity::Account))?;
    let current = signatories(state, account);
    let stored = current
        .iter()
        .find(|signatory| keys::equals(signatory, key))
        .ok_or(CommandError::NotFound(Entity::Signatory))?;

    if current.len() - 1 < quorum as usize {
        return Err(CommandError::QuorumViolation);
    }
    state.delete(key_layout::signatory(account, stored));
    Ok(())
}

/// Set the quorum to `quorum`, which must lie in `1..=|signatories|`.
pub fn set_quorum<W: StateWrite + ?Sized>(
    state: &mut W,
    account: &AccountId,
    quorum: u32,
) -> Result<(), CommandError> {
    if !state.account_exists(account) {
        return Err(CommandError::NotFound(Entity::Account));
    }
    let count = signatories(state, account).len();
    if quorum < 1 || quorum as usize > count {
        return Err(CommandError::QuorumViolation);
    }
    state.set_account(account, quorum);
    Ok(())
}

/// True iff at least `quorum` distinct keys of `effective_signatories` are signatories of `account`.
pub fn verify_quorum<R: StateRead + ?Sized>(
    state: &R,
    account: &AccountId,
    effective_signatories: &[PublicKey],
) -> bool {
    let Some(quorum) = state.quorum(account) else {
        return false;
    };
    let registered = signatories(state, account);
    let distinct: BTreeSet<&PublicKey> = effective_signatories.iter().collect();
    let matched = distinct
        .into_iter()
        .filter(|key| registered.iter().any(|signatory| keys::equals(signatory, key)))
        .count();
    matched >= quorum as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_state::{MemoryStorage, WorldState};
    use crate::execution::cache::WorldStateCache;

    const KEY_X: [u8; 32] = [1u8; 32];
    const KEY_K: &str = "0a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20212223242526272829";

    fn account() -> AccountId {
        AccountId::new("user", "test")
    }

    fn world_state() -> WorldState<MemoryStorage> {
        let mut ws = WorldState::new(MemoryStorage::new());
        let mut cache = WorldStateCache::new(&ws);
        cache.set_account(&account(), 1);
        add(&mut cache, &account(), &PublicKey::from(KEY_X)).unwrap();
        let changes = cache.into_changes();
        ws.commit(changes);
        ws
    }

    #[test]
    fn add_is_idempotent_across_case() {
        let ws = world_state();
        let mut cache = WorldStateCache::new(&ws);
        let lower = keys::canonicalize(KEY_K).unwrap();
        let upper = keys::canonicalize(&KEY_K.to_uppercase()).unwrap();

        add(&mut cache, &account(), &lower).unwrap();
        add(&mut cache, &account(), &upper).unwrap();
        assert_eq!(signatories(&cache, &account()).len(), 2);
        assert!(contains(&cache, &account(), &upper));
    }

    #[test]
    fn add_to_missing_account() {
        let ws = world_state();
        let mut cache = WorldStateCache::new(&ws);
        assert_eq!(
            add(&mut cache, &AccountId::new("nobody", "test"), &PublicKey::from(KEY_X)),
            Err(CommandError::NotFound(Entity::Account))
        );
    }

    #[test]
    fn remove_with_other_case() {
        let ws = world_state();
        let mut cache = WorldStateCache::new(&ws);
        let upper = keys::canonicalize(&KEY_K.to_uppercase()).unwrap();
        let lower = keys::canonicalize(KEY_K).unwrap();
        add(&mut cache, &account(), &upper).unwrap();

        remove(&mut cache, &account(), &lower).unwrap();
        assert!(!contains(&cache, &account(), &upper));
        assert_eq!(
            remove(&mut cache, &account(), &lower),
            Err(CommandError::NotFound(Entity::Signatory))
        );
    }

    #[test]
    fn remove_below_quorum_leaves_state_unchanged() {
        let ws = world_state();
        let mut cache = WorldStateCache::new(&ws);
        assert_eq!(
            remove(&mut cache, &account(), &PublicKey::from(KEY_X)),
            Err(CommandError::QuorumViolation)
        );
        assert!(!cache.has_changes());
        assert_eq!(signatories(&cache, &account()), vec![PublicKey::from(KEY_X)]);
    }

    #[test]
    fn quorum_bounds() {
        let ws = world_state();
        let mut cache = WorldStateCache::new(&ws);
        assert_eq!(set_quorum(&mut cache, &account(), 0), Err(CommandError::QuorumViolation));
        assert_eq!(set_quorum(&mut cache, &account(), 2), Err(CommandError::QuorumViolation));

        add(&mut cache, &account(), &PublicKey::from([2u8; 32])).unwrap();
        set_quorum(&mut cache, &account(), 2).unwrap();
        assert_eq!(cache.quorum(&account()), Some(2));
    }

    #[test]
    fn verify_quorum_counts_distinct_matching_keys() {
        let ws = world_state();
        let mut cache = WorldStateCache::new(&ws);
        let key_y = PublicKey::from([2u8; 32]);
        add(&mut cache, &account(), &key_y).unwrap();
        set_quorum(&mut cache, &account(), 2).unwrap();

        let x = PublicKey::from(KEY_X);
        let stranger = PublicKey::from([3u8; 32]);
        assert!(!verify_quorum(&cache, &account(), &[x, x]));
        assert!(!verify_quorum(&cache, &account(), &[x, stranger]));
        assert!(verify_quorum(&cache, &account(), &[x, key_y]));
        assert!(!verify_quorum(&cache, &AccountId::new("nobody", "test"), &[x]));
    }
}
