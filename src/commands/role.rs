/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Implements execution of the commands that manage roles and grantable permissions.
//!
//! An account can never hand out more than it holds: creating or appending a role requires the
//! actor to hold every permission of that role, and granting requires the matching `Grant*` permission.

use std::collections::BTreeSet;

use crate::{
    error::{CommandError, Entity},
    execution::{abort::abort, state::ExecutionState},
    types::{
        AccountId, AppendRoleInput, CreateRoleInput, DetachRoleInput, GrantPermissionInput,
        Permission, RevokePermissionInput,
    },
    world_state::{StateRead, StateWrite, WorldStateStorage},
};

use super::permission;

/// Create Role
///
/// Execution of [crate::types::Command::CreateRole]
pub(crate) fn create_role<S>(
    actor: &AccountId,
    state: &mut ExecutionState<S>,
    input: CreateRoleInput,
) -> Result<(), CommandError>
where
    S: WorldStateStorage,
{
    let CreateRoleInput {
        role_id,
        permissions,
    } = input;

    if !state.ctx.has_permission(actor, Permission::CreateRole)
        || !permission::holds_all(&state.ctx, actor, &permissions)
    {
        abort!(state, CommandError::NoPermission)
    }
    if state.ctx.role_permissions(&role_id).is_some() {
        abort!(state, CommandError::AlreadyExists(Entity::Role))
    }

    let permissions: BTreeSet<Permission> = permissions.into_iter().collect();
    state.ctx.set_role(&role_id, &permissions);
    Ok(())
}

/// Append Role
///
/// Execution of [crate::types::Command::AppendRole]
pub(crate) fn append_role<S>(
    actor: &AccountId,
    state: &mut ExecutionState<S>,
    input: AppendRoleInput,
) -> Result<(), CommandError>
where
    S: WorldStateStorage,
{
    let AppendRoleInput {
        account_id,
        role_id,
    } = input;

    if !state.ctx.has_permission(actor, Permission::AppendRole) {
        abort!(state, CommandError::NoPermission)
    }
    if !state.ctx.account_exists(&account_id) {
        abort!(state, CommandError::NotFound(Entity::Account))
    }
    let Some(role_permissions) = state.ctx.role_permissions(&role_id) else {
        abort!(state, CommandError::NotFound(Entity::Role))
    };
    if !permission::holds_all(&state.ctx, actor, &role_permissions) {
        abort!(state, CommandError::NoPermission)
    }
    if state.ctx.has_account_role(&account_id, &role_id) {
        abort!(state, CommandError::AlreadyExists(Entity::Role))
    }

    state.ctx.append_account_role(&account_id, &role_id);
    Ok(())
}

/// Detach Role
///
/// Execution of [crate::types::Command::DetachRole]
pub(crate) fn detach_role<S>(
    actor: &AccountId,
    state: &mut ExecutionState<S>,
    input: DetachRoleInput,
) -> Result<(), CommandError>
where
    S: WorldStateStorage,
{
    let DetachRoleInput {
        account_id,
        role_id,
    } = input;

    if !state.ctx.has_permission(actor, Permission::DetachRole) {
        abort!(state, CommandError::NoPermission)
    }
    if !state.ctx.account_exists(&account_id) {
        abort!(state, CommandError::NotFound(Entity::Account))
    }
    if !state.ctx.has_account_role(&account_id, &role_id) {
        abort!(state, CommandError::NotFound(Entity::Role))
    }

    state.ctx.detach_account_role(&account_id, &role_id);
    Ok(())
}

/// Grant Permission
///
/// Execution of [crate::types::Command::GrantPermission]. The actor lets `account_id` act on the
/// actor's own account.
pub(crate) fn grant_permission<S>(
    actor: &AccountId,
    state: &mut ExecutionState<S>,
    input: GrantPermissionInput,
) -> Result<(), CommandError>
where
    S: WorldStateStorage,
{
    let GrantPermissionInput {
        account_id,
        permission,
    } = input;

    if !state
        .ctx
        .has_permission(actor, permission.required_role_permission())
    {
        abort!(state, CommandError::NoPermission)
    }
    if !state.ctx.account_exists(&account_id) {
        abort!(state, CommandError::NotFound(Entity::Account))
    }
    if state.ctx.has_grantable(&account_id, actor, permission) {
        abort!(state, CommandError::AlreadyExists(Entity::GrantedPermission))
    }

    state.ctx.grant(&account_id, actor, permission);
    Ok(())
}

/// Revoke Permission
///
/// Execution of [crate::types::Command::RevokePermission]. Only a grant the actor made can be revoked.
pub(crate) fn revoke_permission<S>(
    actor: &AccountId,
    state: &mut ExecutionState<S>,
    input: RevokePermissionInput,
) -> Result<(), CommandError>
where
    S: WorldStateStorage,
{
    let RevokePermissionInput {
        account_id,
        permission,
    } = input;

    if !state.ctx.has_grantable(&account_id, actor, permission) {
        abort!(state, CommandError::NotFound(Entity::GrantedPermission))
    }

    state.ctx.revoke(&account_id, actor, permission);
    Ok(())
}
