/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Implements execution of the commands that change the peer list.

use crate::{
    error::{CommandError, Entity},
    execution::{
        abort::{abort, abort_on_err},
        state::ExecutionState,
    },
    keys,
    types::{AccountId, AddPeerInput, Peer, Permission, RemovePeerInput},
    world_state::{StateRead, StateWrite, WorldStateStorage},
};

/// Add Peer
///
/// Execution of [crate::types::Command::AddPeer]. Peer keys are unique under canonical comparison.
pub(crate) fn add_peer<S>(
    actor: &AccountId,
    state: &mut ExecutionState<S>,
    input: AddPeerInput,
) -> Result<(), CommandError>
where
    S: WorldStateStorage,
{
    let AddPeerInput {
        address,
        public_key,
    } = input;

    if !state.ctx.has_permission(actor, Permission::AddPeer) {
        abort!(state, CommandError::NoPermission)
    }

    let public_key = abort_on_err!(state, keys::canonicalize(&public_key).map_err(CommandError::from));
    if state
        .ctx
        .peers()
        .iter()
        .any(|peer| keys::equals(&peer.public_key, &public_key))
    {
        abort!(state, CommandError::DuplicateKey)
    }

    state.ctx.set_peer(&Peer {
        address,
        public_key,
    });
    Ok(())
}

/// Remove Peer
///
/// Execution of [crate::types::Command::RemovePeer]
pub(crate) fn remove_peer<S>(
    actor: &AccountId,
    state: &mut ExecutionState<S>,
    input: RemovePeerInput,
) -> Result<(), CommandError>
where
    S: WorldStateStorage,
{
    if !state.ctx.has_permission(actor, Permission::RemovePeer) {
        abort!(state, CommandError::NoPermission)
    }

    let public_key = abort_on_err!(state, keys::canonicalize(&input.public_key).map_err(CommandError::from));
    let peers = state.ctx.peers();
    let Some(peer) = peers
        .iter()
        .find(|peer| keys::equals(&peer.public_key, &public_key))
    else {
        abort!(state, CommandError::NotFound(Entity::Peer))
    };
    if peers.len() == 1 {
        abort!(state, CommandError::LastPeer)
    }

    state.ctx.remove_peer(&peer.public_key);
    Ok(())
}
