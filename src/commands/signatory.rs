/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Implements execution of the commands that change signatories and quorum of an account.

use crate::{
    error::CommandError,
    execution::{
        abort::{abort, abort_on_err},
        state::ExecutionState,
    },
    keys,
    stores::signatory,
    types::{
        AccountId, AddSignatoryInput, GrantablePermission, Permission, RemoveSignatoryInput,
        SetQuorumInput,
    },
    world_state::WorldStateStorage,
};

use super::permission;

/// Add Signatory
///
/// Execution of [crate::types::Command::AddSignatory]. A key that canonically equals an existing
/// signatory is rejected with [CommandError::DuplicateKey], whatever letter case it was submitted in.
pub(crate) fn add_signatory<S>(
    actor: &AccountId,
    state: &mut ExecutionState<S>,
    input: AddSignatoryInput,
) -> Result<(), CommandError>
where
    S: WorldStateStorage,
{
    let AddSignatoryInput {
        account_id,
        public_key,
    } = input;

    if !permission::can_act_on(
        &state.ctx,
        actor,
        &account_id,
        Permission::AddSignatory,
        GrantablePermission::AddMySignatory,
    ) {
        abort!(state, CommandError::NoPermission)
    }

    let public_key = abort_on_err!(state, keys::canonicalize(&public_key).map_err(CommandError::from));
    if signatory::contains(&state.ctx, &account_id, &public_key) {
        abort!(state, CommandError::DuplicateKey)
    }

    abort_on_err!(state, signatory::add(&mut state.ctx, &account_id, &public_key));
    Ok(())
}

/// Remove Signatory
///
/// Execution of [crate::types::Command::RemoveSignatory]
pub(crate) fn remove_signatory<S>(
    actor: &AccountId,
    state: &mut ExecutionState<S>,
    input: RemoveSignatoryInput,
) -> Result<(), CommandError>
where
    S: WorldStateStorage,
{
    let RemoveSignatoryInput {
        account_id,
        public_key,
    } = input;

    if !permission::can_act_on(
        &state.ctx,
        actor,
        &account_id,
        Permission::RemoveSignatory,
        GrantablePermission::RemoveMySignatory,
    ) {
        abort!(state, CommandError::NoPermission)
    }

    let public_key = abort_on_err!(state, keys::canonicalize(&public_key).map_err(CommandError::from));
    abort_on_err!(state, signatory::remove(&mut state.ctx, &account_id, &public_key));
    Ok(())
}

/// Set Quorum
///
/// Execution of [crate::types::Command::SetQuorum]
pub(crate) fn set_quorum<S>(
    actor: &AccountId,
    state: &mut ExecutionState<S>,
    input: SetQuorumInput,
) -> Result<(), CommandError>
where
    S: WorldStateStorage,
{
    let SetQuorumInput { account_id, quorum } = input;

    if !permission::can_act_on(
        &state.ctx,
        actor,
        &account_id,
        Permission::SetQuorum,
        GrantablePermission::SetMyQuorum,
    ) {
        abort!(state, CommandError::NoPermission)
    }

    abort_on_err!(state, signatory::set_quorum(&mut state.ctx, &account_id, quorum));
    Ok(())
}
