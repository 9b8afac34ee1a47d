/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Implements execution of the commands that create accounts and domains and write account details.

use crate::{
    error::{CommandError, Entity},
    execution::{
        abort::{abort, abort_on_err},
        state::ExecutionState,
    },
    keys,
    stores::{detail, signatory},
    types::{
        AccountId, CreateAccountInput, CreateDomainInput, Permission, SetAccountDetailInput,
    },
    world_state::{StateRead, StateWrite, WorldStateStorage},
};

use super::permission;

/// Create Account
///
/// Execution of [crate::types::Command::CreateAccount]. The account starts with quorum 1, the
/// given key as its only signatory and the default role of its domain.
pub(crate) fn create_account<S>(
    actor: &AccountId,
    state: &mut ExecutionState<S>,
    input: CreateAccountInput,
) -> Result<(), CommandError>
where
    S: WorldStateStorage,
{
    let CreateAccountInput {
        account_name,
        domain_id,
        public_key,
    } = input;

    if !state.ctx.has_permission(actor, Permission::CreateAccount) {
        abort!(state, CommandError::NoPermission)
    }

    let Some(default_role) = state.ctx.domain_default_role(&domain_id) else {
        abort!(state, CommandError::NotFound(Entity::Domain))
    };
    let account_id = AccountId::new(account_name, domain_id);
    if state.ctx.account_exists(&account_id) {
        abort!(state, CommandError::AlreadyExists(Entity::Account))
    }
    let public_key = abort_on_err!(state, keys::canonicalize(&public_key).map_err(CommandError::from));

    state.ctx.set_account(&account_id, 1);
    abort_on_err!(state, signatory::add(&mut state.ctx, &account_id, &public_key));
    state.ctx.append_account_role(&account_id, &default_role);
    Ok(())
}

/// Create Domain
///
/// Execution of [crate::types::Command::CreateDomain]
pub(crate) fn create_domain<S>(
    actor: &AccountId,
    state: &mut ExecutionState<S>,
    input: CreateDomainInput,
) -> Result<(), CommandError>
where
    S: WorldStateStorage,
{
    let CreateDomainInput {
        domain_id,
        default_role,
    } = input;

    if !state.ctx.has_permission(actor, Permission::CreateDomain) {
        abort!(state, CommandError::NoPermission)
    }
    if state.ctx.role_permissions(&default_role).is_none() {
        abort!(state, CommandError::NotFound(Entity::Role))
    }
    if state.ctx.domain_default_role(&domain_id).is_some() {
        abort!(state, CommandError::AlreadyExists(Entity::Domain))
    }

    state.ctx.set_domain(&domain_id, &default_role);
    Ok(())
}

/// Set Account Detail
///
/// Execution of [crate::types::Command::SetAccountDetail]. The actor is recorded as the writer, so
/// different writers keep independent values under the same key.
pub(crate) fn set_account_detail<S>(
    actor: &AccountId,
    state: &mut ExecutionState<S>,
    input: SetAccountDetailInput,
) -> Result<(), CommandError>
where
    S: WorldStateStorage,
{
    let SetAccountDetailInput {
        account_id,
        key,
        value,
    } = input;

    if !permission::can_set_detail(&state.ctx, actor, &account_id) {
        abort!(state, CommandError::NoPermission)
    }
    if !state.ctx.account_exists(&account_id) {
        abort!(state, CommandError::NotFound(Entity::Account))
    }

    detail::set(&mut state.ctx, &account_id, actor, &key, &value);
    Ok(())
}
