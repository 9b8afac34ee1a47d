/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Initial world state of a network.
//!
//! The genesis state is written without permission checks, since no account exists yet that could
//! hold any. Entries are applied as roles, then domains, accounts and peers, regardless of the order
//! in which they were added to the builder.

use std::collections::BTreeSet;

use crate::{
    execution::cache::WorldStateCache,
    keys::PublicKey,
    stores::signatory,
    types::{AccountId, Peer, Permission},
    world_state::{StateWrite, WorldState, WorldStateStorage},
};

struct GenesisAccount {
    account_id: AccountId,
    public_keys: Vec<PublicKey>,
    roles: Vec<String>,
}

/// Builder of the genesis [WorldState].
#[derive(Default)]
pub struct GenesisBuilder {
    roles: Vec<(String, BTreeSet<Permission>)>,
    domains: Vec<(String, String)>,
    accounts: Vec<GenesisAccount>,
    peers: Vec<Peer>,
}

impl GenesisBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(
        mut self,
        role_id: impl Into<String>,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        self.roles
            .push((role_id.into(), permissions.into_iter().collect()));
        self
    }

    pub fn domain(mut self, domain_id: impl Into<String>, default_role: impl Into<String>) -> Self {
        self.domains.push((domain_id.into(), default_role.into()));
        self
    }

    /// Account with quorum 1, `public_key` as its signatory and the given roles.
    pub fn account<I>(mut self, account_id: AccountId, public_key: PublicKey, roles: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.accounts.push(GenesisAccount {
            account_id,
            public_keys: vec![public_key],
            roles: roles.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Additional signatory of an account added before.
    pub fn signatory(mut self, account_id: &AccountId, public_key: PublicKey) -> Self {
        if let Some(account) = self
            .accounts
            .iter_mut()
            .find(|account| &account.account_id == account_id)
        {
            account.public_keys.push(public_key);
        }
        self
    }

    pub fn peer(mut self, address: impl Into<String>, public_key: PublicKey) -> Self {
        self.peers.push(Peer {
            address: address.into(),
            public_key,
        });
        self
    }

    /// Write the genesis entries into `storage` and return the committed world state.
    pub fn build<S: WorldStateStorage>(self, storage: S) -> WorldState<S> {
        let mut ws = WorldState::new(storage);
        let mut cache = WorldStateCache::new(&ws);

        for (role_id, permissions) in &self.roles {
            cache.set_role(role_id, permissions);
        }
        for (domain_id, default_role) in &self.domains {
            cache.set_domain(domain_id, default_role);
        }
        for account in &self.accounts {
            cache.set_account(&account.account_id, 1);
            for public_key in &account.public_keys {
                // the account was set right above
                let _ = signatory::add(&mut cache, &account.account_id, public_key);
            }
            for role_id in &account.roles {
                cache.append_account_role(&account.account_id, role_id);
            }
        }
        for peer in &self.peers {
            cache.set_peer(peer);
        }

        let changes = cache.into_changes();
        tracing::info!(
            target: "ledger_runtime::ledger",
            accounts = self.accounts.len(),
            peers = self.peers.len(),
            "genesis state built"
        );
        ws.commit(changes);
        ws
    }
}
