/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Implementation of the execution process of one transaction. The process starts from the Stateless
//! phase, then goes into the Signature phase, and finally executes the Commands in order.
//!
//! Each phase either lets the transaction advance to its next [Stage] or rejects it with a
//! [RejectReason]. Commands run against a [working copy](super::cache::WorldStateCache) of the world
//! state. The first failing command aborts the transaction and discards every change made by the
//! commands before it. If all commands succeed, the transaction hash is recorded for replay protection
//! and the complete change set is returned for commit.

use crate::{
    commands::executable::Executable,
    error::RejectReason,
    transition::{Runtime, TransitionResult},
    types::{BlockParams, Hash, Transaction},
    world_state::{StateWrite, WorldState, WorldStateStorage},
};

use super::{
    lifecycle::{Lifecycle, Stage},
    phase,
    state::ExecutionState,
};

/// Backbone logic of Transaction Execution
pub(crate) fn execute_transaction<S>(
    runtime: &Runtime,
    ws: &WorldState<S>,
    tx: &Transaction,
    bd: &BlockParams,
) -> TransitionResult
where
    S: WorldStateStorage,
{
    let hash = tx.hash();
    let mut lifecycle = Lifecycle::new();

    // Phase: Stateless
    if let Err(error) = phase::stateless(runtime, tx, bd, ws) {
        return reject(hash, lifecycle, error.into());
    }
    lifecycle.advance(Stage::StatelessChecked);
    tracing::debug!(target: "ledger_runtime::transition", tx = %hex::encode(hash), "stateless valid");

    // Phase: Signature
    if let Err(reason) = phase::signature(ws, tx) {
        return reject(hash, lifecycle, reason);
    }
    lifecycle.advance(Stage::SignatureChecked);
    tracing::debug!(target: "ledger_runtime::transition", tx = %hex::encode(hash), "enough signatures");

    // Phase: Command(s)
    lifecycle.advance(Stage::Executing);
    let mut state = ExecutionState::new(tx, ws);
    for (command_index, command) in tx.commands.iter().cloned().enumerate() {
        if let Err(error) = command.execute(&mut state, command_index) {
            return reject(
                hash,
                lifecycle,
                RejectReason::StatefulInvalid {
                    command_index,
                    error,
                },
            );
        }
    }

    state.ctx.mark_committed(&hash);
    lifecycle.executed();
    tracing::debug!(
        target: "ledger_runtime::transition",
        tx = %hex::encode(hash),
        height = bd.height,
        "stateful valid"
    );

    TransitionResult::new(hash, lifecycle, Some(state.finalize()), None)
}

fn reject(hash: Hash, mut lifecycle: Lifecycle, reason: RejectReason) -> TransitionResult {
    tracing::debug!(
        target: "ledger_runtime::transition",
        tx = %hex::encode(hash),
        stage = ?lifecycle.stage(),
        %reason,
        "transaction rejected"
    );
    lifecycle.reject(&reason);
    TransitionResult::new(hash, lifecycle, None, Some(reason))
}
