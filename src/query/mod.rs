/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Read-only queries over committed world state.
//!
//! A query names its requester. Every query first checks that the requester exists and holds a
//! read permission covering the target, in one of three scopes:
//! - `My`: the requester reads its own account.
//! - `Domain`: the requester reads accounts of its own domain.
//! - `All`: the requester reads any account.
//!
//! Only afterwards is the target resolved, so a query without permission cannot probe which
//! accounts exist. Queries never mutate state.

pub mod account_detail;
pub use account_detail::{AccountDetailResponse, GetAccountDetailInput, PaginationMeta};

use crate::{
    error::{Entity, QueryError},
    keys::PublicKey,
    stores::signatory,
    types::{AccountId, Peer, Permission},
    world_state::StateRead,
};

/// A decoded query with the identity of its requester.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub creator_account_id: AccountId,
    pub payload: QueryPayload,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryPayload {
    GetAccountDetail(GetAccountDetailInput),
    GetSignatories { account_id: AccountId },
    GetAccount { account_id: AccountId },
    GetPeers,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryResponse {
    AccountDetail(AccountDetailResponse),
    Signatories(Vec<PublicKey>),
    Account(AccountResponse),
    Peers(Vec<Peer>),
}

/// Quorum and roles of an account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountResponse {
    pub account_id: AccountId,
    pub quorum: u32,
    pub roles: Vec<String>,
}

/// Read permissions of one kind of data, by scope.
#[derive(Clone, Copy)]
pub(crate) struct ReadScopes {
    pub my: Permission,
    pub domain: Permission,
    pub all: Permission,
}

const SIGNATORIES: ReadScopes = ReadScopes {
    my: Permission::GetMySignatories,
    domain: Permission::GetDomainSignatories,
    all: Permission::GetAllSignatories,
};

const ACCOUNTS: ReadScopes = ReadScopes {
    my: Permission::GetMyAccount,
    domain: Permission::GetDomainAccounts,
    all: Permission::GetAllAccounts,
};

/// True if `requester` may read data of `target` under `scopes`.
pub(crate) fn can_read<R: StateRead + ?Sized>(
    state: &R,
    requester: &AccountId,
    target: &AccountId,
    scopes: ReadScopes,
) -> bool {
    state.has_permission(requester, scopes.all)
        || (requester.domain == target.domain && state.has_permission(requester, scopes.domain))
        || (requester == target && state.has_permission(requester, scopes.my))
}

/// Answer `query` against `state`.
pub fn execute_query<R: StateRead + ?Sized>(
    state: &R,
    query: &Query,
) -> Result<QueryResponse, QueryError> {
    let requester = &query.creator_account_id;
    if !state.account_exists(requester) {
        return Err(QueryError::NoPermission);
    }

    let result = match &query.payload {
        QueryPayload::GetAccountDetail(input) => {
            account_detail::get_account_detail(state, requester, input)
                .map(QueryResponse::AccountDetail)
        }
        QueryPayload::GetSignatories { account_id } => {
            get_signatories(state, requester, account_id).map(QueryResponse::Signatories)
        }
        QueryPayload::GetAccount { account_id } => {
            get_account(state, requester, account_id).map(QueryResponse::Account)
        }
        QueryPayload::GetPeers => get_peers(state, requester).map(QueryResponse::Peers),
    };

    if let Err(error) = &result {
        tracing::debug!(
            target: "ledger_runtime::query",
            requester = %requester,
            %error,
            "query failed"
        );
    }
    result
}

fn get_signatories<R: StateRead + ?Sized>(
    state: &R,
    requester: &AccountId,
    account_id: &AccountId,
) -> Result<Vec<PublicKey>, QueryError> {
    if !can_read(state, requester, account_id, SIGNATORIES) {
        return Err(QueryError::NoPermission);
    }
    if !state.account_exists(account_id) {
        return Err(QueryError::NotFound(Entity::Account));
    }
    Ok(signatory::signatories(state, account_id))
}

fn get_account<R: StateRead + ?Sized>(
    state: &R,
    requester: &AccountId,
    account_id: &AccountId,
) -> Result<AccountResponse, QueryError> {
    if !can_read(state, requester, account_id, ACCOUNTS) {
        return Err(QueryError::NoPermission);
    }
    let quorum = state
        .quorum(account_id)
        .ok_or(QueryError::NotFound(Entity::Account))?;
    Ok(AccountResponse {
        account_id: account_id.clone(),
        quorum,
        roles: state.account_roles(account_id),
    })
}

fn get_peers<R: StateRead + ?Sized>(
    state: &R,
    requester: &AccountId,
) -> Result<Vec<Peer>, QueryError> {
    if !state.has_permission(requester, Permission::GetPeers) {
        return Err(QueryError::NoPermission);
    }
    Ok(state.peers())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        genesis::GenesisBuilder,
        world_state::{MemoryStorage, WorldState},
    };

    const KEY_A: [u8; 32] = [1u8; 32];
    const KEY_B: [u8; 32] = [2u8; 32];
    const KEY_C: [u8; 32] = [3u8; 32];

    fn admin() -> AccountId {
        AccountId::new("admin", "test")
    }

    fn user() -> AccountId {
        AccountId::new("user", "test")
    }

    fn stranger() -> AccountId {
        AccountId::new("stranger", "other")
    }

    fn world_state() -> WorldState<MemoryStorage> {
        GenesisBuilder::new()
            .role(
                "admin",
                [
                    Permission::GetAllSignatories,
                    Permission::GetAllAccounts,
                    Permission::GetPeers,
                ],
            )
            .role("user", [Permission::GetMyAccount, Permission::GetDomainSignatories])
            .domain("test", "user")
            .domain("other", "user")
            .account(admin(), PublicKey::from(KEY_A), ["admin"])
            .account(user(), PublicKey::from(KEY_B), ["user"])
            .account(stranger(), PublicKey::from(KEY_C), ["user"])
            .peer("127.0.0.1:10001", PublicKey::from(KEY_A))
            .build(MemoryStorage::new())
    }

    fn query(creator: AccountId, payload: QueryPayload) -> Query {
        Query {
            creator_account_id: creator,
            payload,
        }
    }

    #[test]
    fn signatories_by_scope() {
        let ws = world_state();
        let response = execute_query(
            &ws,
            &query(user(), QueryPayload::GetSignatories { account_id: admin() }),
        );
        assert_eq!(response, Ok(QueryResponse::Signatories(vec![PublicKey::from(KEY_A)])));

        let response = execute_query(
            &ws,
            &query(stranger(), QueryPayload::GetSignatories { account_id: admin() }),
        );
        assert_eq!(response, Err(QueryError::NoPermission));

        let response = execute_query(
            &ws,
            &query(admin(), QueryPayload::GetSignatories { account_id: stranger() }),
        );
        assert_eq!(response, Ok(QueryResponse::Signatories(vec![PublicKey::from(KEY_C)])));
    }

    #[test]
    fn account_of_self_only() {
        let ws = world_state();
        let response = execute_query(&ws, &query(user(), QueryPayload::GetAccount { account_id: user() }));
        assert_eq!(
            response,
            Ok(QueryResponse::Account(AccountResponse {
                account_id: user(),
                quorum: 1,
                roles: vec!["user".to_string()],
            }))
        );
        let response = execute_query(&ws, &query(user(), QueryPayload::GetAccount { account_id: admin() }));
        assert_eq!(response, Err(QueryError::NoPermission));
    }

    #[test]
    fn missing_target_after_permission() {
        let ws = world_state();
        let ghost = AccountId::new("ghost", "test");
        let response = execute_query(&ws, &query(admin(), QueryPayload::GetAccount { account_id: ghost.clone() }));
        assert_eq!(response, Err(QueryError::NotFound(Entity::Account)));
        let response = execute_query(&ws, &query(user(), QueryPayload::GetAccount { account_id: ghost }));
        assert_eq!(response, Err(QueryError::NoPermission));
    }

    #[test]
    fn unknown_requester() {
        let ws = world_state();
        let response = execute_query(&ws, &query(AccountId::new("ghost", "test"), QueryPayload::GetPeers));
        assert_eq!(response, Err(QueryError::NoPermission));
    }

    #[test]
    fn peers() {
        let ws = world_state();
        let response = execute_query(&ws, &query(admin(), QueryPayload::GetPeers));
        assert_eq!(
            response,
            Ok(QueryResponse::Peers(vec![Peer {
                address: "127.0.0.1:10001".to_string(),
                public_key: PublicKey::from(KEY_A),
            }]))
        );
        assert_eq!(
            execute_query(&ws, &query(user(), QueryPayload::GetPeers)),
            Err(QueryError::NoPermission)
        );
    }
}
