/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! World state: the committed ledger state over an abstract [storage](WorldStateStorage).
//!
//! Typed access to accounts, roles, domains, peers and grants is shared by every view of the
//! state through [StateRead] and [StateWrite]. [WorldState] reads committed data only. The
//! execution cache implements the same traits on top of it with pending writes layered over.

pub mod key_layout;

pub mod storage;
pub use storage::{Key, MemoryStorage, StateChanges, Value, WorldStateStorage};

use std::collections::BTreeSet;

use crate::{
    keys::PublicKey,
    types::{AccountId, GrantablePermission, Hash, Peer, Permission},
};

/// Read access to a view of the world state.
pub trait StateRead {
    fn get(&self, key: &[u8]) -> Option<Value>;

    /// Entries under `prefix`, ascending by key.
    fn scan_prefix(&self, prefix: &[u8]) -> Vec<(Key, Value)>;

    fn account_exists(&self, id: &AccountId) -> bool {
        self.get(&key_layout::account(id)).is_some()
    }

    fn quorum(&self, id: &AccountId) -> Option<u32> {
        self.get(&key_layout::account(id))
            .and_then(|value| <[u8; 4]>::try_from(value).ok())
            .map(u32::from_be_bytes)
    }

    fn account_roles(&self, id: &AccountId) -> Vec<String> {
        let prefix = key_layout::account_role_prefix(id);
        self.scan_prefix(&prefix)
            .into_iter()
            .filter_map(|(key, _)| {
                key_layout::segments_after(&key, &prefix)
                    .first()
                    .and_then(|role| String::from_utf8(role.to_vec()).ok())
            })
            .collect()
    }

    fn has_account_role(&self, id: &AccountId, role_id: &str) -> bool {
        self.get(&key_layout::account_role(id, role_id)).is_some()
    }

    fn role_permissions(&self, role_id: &str) -> Option<BTreeSet<Permission>> {
        self.get(&key_layout::role(role_id))
            .map(|codes| codes.into_iter().filter_map(Permission::from_code).collect())
    }

    /// Union of the permissions of every role attached to the account.
    fn account_permissions(&self, id: &AccountId) -> BTreeSet<Permission> {
        self.account_roles(id)
            .iter()
            .filter_map(|role| self.role_permissions(role))
            .flatten()
            .collect()
    }

    /// True if the account holds `permission` or `Root` through any of its roles.
    fn has_permission(&self, id: &AccountId, permission: Permission) -> bool {
        let permissions = self.account_permissions(id);
        permissions.contains(&Permission::Root) || permissions.contains(&permission)
    }

    /// True if `account` granted `permission` over itself to `permittee`.
    fn has_grantable(
        &self,
        permittee: &AccountId,
        account: &AccountId,
        permission: GrantablePermission,
    ) -> bool {
        self.get(&key_layout::grantable(permittee, account, permission))
            .is_some()
    }

    fn domain_default_role(&self, domain_id: &str) -> Option<String> {
        self.get(&key_layout::domain(domain_id))
            .and_then(|role| String::from_utf8(role).ok())
    }

    fn peers(&self) -> Vec<Peer> {
        let prefix = key_layout::peer_prefix();
        self.scan_prefix(&prefix)
            .into_iter()
            .filter_map(|(key, address)| {
                let public_key = PublicKey::from_bytes(&key[prefix.len()..]).ok()?;
                let address = String::from_utf8(address).ok()?;
                Some(Peer { address, public_key })
            })
            .collect()
    }

    fn is_committed(&self, hash: &Hash) -> bool {
        self.get(&key_layout::committed_tx(hash)).is_some()
    }
}

/// Write access to a view of the world state. Writes are never partial: a view either
/// hands over all of them as one [StateChanges] or drops them.
pub trait StateWrite: StateRead {
    fn put(&mut self, key: Key, value: Value);

    fn delete(&mut self, key: Key);

    fn set_account(&mut self, id: &AccountId, quorum: u32) {
        self.put(key_layout::account(id), quorum.to_be_bytes().to_vec());
    }

    fn append_account_role(&mut self, id: &AccountId, role_id: &str) {
        self.put(key_layout::account_role(id, role_id), Vec::new());
    }

    fn detach_account_role(&mut self, id: &AccountId, role_id: &str) {
        self.delete(key_layout::account_role(id, role_id));
    }

    fn set_role(&mut self, role_id: &str, permissions: &BTreeSet<Permission>) {
        self.put(
            key_layout::role(role_id),
            permissions.iter().map(|p| p.code()).collect(),
        );
    }

    fn set_domain(&mut self, domain_id: &str, default_role: &str) {
        self.put(key_layout::domain(domain_id), default_role.as_bytes().to_vec());
    }

    fn set_peer(&mut self, peer: &Peer) {
        self.put(
            key_layout::peer(&peer.public_key),
            peer.address.as_bytes().to_vec(),
        );
    }

    fn remove_peer(&mut self, public_key: &PublicKey) {
        self.delete(key_layout::peer(public_key));
    }

    fn grant(&mut self, permittee: &AccountId, account: &AccountId, permission: GrantablePermission) {
        self.put(key_layout::grantable(permittee, account, permission), Vec::new());
    }

    fn revoke(&mut self, permittee: &AccountId, account: &AccountId, permission: GrantablePermission) {
        self.delete(key_layout::grantable(permittee, account, permission));
    }

    fn mark_committed(&mut self, hash: &Hash) {
        self.put(key_layout::committed_tx(hash), Vec::new());
    }
}

/// Committed world state. Only [WorldState::commit] changes it.
#[derive(Clone, Debug, Default)]
pub struct WorldState<S> {
    storage: S,
}

impl<S: WorldStateStorage> WorldState<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Atomically apply a complete change set.
    pub fn commit(&mut self, changes: StateChanges) {
        if !changes.is_empty() {
            self.storage.apply(changes);
        }
    }
}

impl<S: WorldStateStorage> StateRead for WorldState<S> {
    fn get(&self, key: &[u8]) -> Option<Value> {
        self.storage.get(key)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Vec<(Key, Value)> {
        self.storage.scan_prefix(prefix)
    }
}
