/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

use crate::{
    error::CommandError,
    execution::state::ExecutionState,
    types::{AccountId, Command, CommandKind},
    world_state::WorldStateStorage,
};

use super::{account, peer, role, signatory};

pub(crate) trait Executable {
    fn execute<S>(
        self,
        state: &mut ExecutionState<S>,
        command_index: usize,
    ) -> Result<(), CommandError>
    where
        S: WorldStateStorage;
}

impl Executable for Command {
    fn execute<S>(
        self,
        state: &mut ExecutionState<S>,
        command_index: usize,
    ) -> Result<(), CommandError>
    where
        S: WorldStateStorage,
    {
        let tx = state.tx;
        let actor = &tx.creator_account_id;
        let command_kind = CommandKind::from(&self);

        let result = execute(state, actor, self);

        match &result {
            Ok(()) => tracing::trace!(
                target: "ledger_runtime::command",
                command_index,
                ?command_kind,
                "command applied"
            ),
            Err(error) => tracing::debug!(
                target: "ledger_runtime::command",
                command_index,
                ?command_kind,
                %error,
                "command failed"
            ),
        }
        result
    }
}

fn execute<S>(
    state: &mut ExecutionState<S>,
    actor: &AccountId,
    command: Command,
) -> Result<(), CommandError>
where
    S: WorldStateStorage,
{
    match command {
        Command::AddSignatory(input) => signatory::add_signatory(actor, state, input),
        Command::RemoveSignatory(input) => signatory::remove_signatory(actor, state, input),
        Command::SetQuorum(input) => signatory::set_quorum(actor, state, input),
        Command::CreateAccount(input) => account::create_account(actor, state, input),
        Command::CreateDomain(input) => account::create_domain(actor, state, input),
        Command::SetAccountDetail(input) => account::set_account_detail(actor, state, input),
        Command::AddPeer(input) => peer::add_peer(actor, state, input),
        Command::RemovePeer(input) => peer::remove_peer(actor, state, input),
        Command::CreateRole(input) => role::create_role(actor, state, input),
        Command::AppendRole(input) => role::append_role(actor, state, input),
        Command::DetachRole(input) => role::detach_role(actor, state, input),
        Command::GrantPermission(input) => role::grant_permission(actor, state, input),
        Command::RevokePermission(input) => role::revoke_permission(actor, state, input),
    }
}
